use crate::{Handle, Result, Transfer, TransferOutput};

/// Runs `handle` through `transfer`, retrying failed attempts.
///
/// Every failure is retried immediately: there is no backoff and no
/// distinction between transient and permanent causes. At most
/// `max_retries` extra attempts are made, so `0` means exactly one. Once the
/// budget is spent the last failure is returned unchanged.
///
/// The handle is consumed; an attached output file is closed on return.
pub async fn execute<T: Transfer>(
    transfer: &T,
    mut handle: Handle,
    max_retries: usize,
) -> Result<TransferOutput> {
    let mut attempt = 0usize;
    loop {
        match transfer.perform(&mut handle).await {
            Ok(output) => return Ok(output),
            Err(err) => {
                if attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;

                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, max_retries, error = %err, "retrying transfer");
            }
        }
    }
}
