use std::borrow::Cow;
use std::future::Future;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::{FetchError, Handle, Result, ReturnMode};

/// Result of one successful transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferOutput {
    /// Response payload, returned in [`ReturnMode::Content`].
    Content(Vec<u8>),
    /// The transfer succeeded; returned in [`ReturnMode::Success`].
    Completed,
}

impl TransferOutput {
    pub fn content(&self) -> Option<&[u8]> {
        match self {
            Self::Content(bytes) => Some(bytes.as_slice()),
            Self::Completed => None,
        }
    }

    pub fn into_content(self) -> Option<Vec<u8>> {
        match self {
            Self::Content(bytes) => Some(bytes),
            Self::Completed => None,
        }
    }

    /// Payload decoded as UTF-8, lossily.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.content().map(String::from_utf8_lossy)
    }
}

/// Performs one network exchange for a configured handle.
///
/// An `Err` is the transfer's failure indicator; the executor retries on it.
pub trait Transfer {
    fn perform(&self, handle: &mut Handle) -> impl Future<Output = Result<TransferOutput>> + Send;
}

/// [`Transfer`] backed by `reqwest`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpTransfer;

impl Transfer for HttpTransfer {
    async fn perform(&self, handle: &mut Handle) -> Result<TransferOutput> {
        if let Some(output) = handle.output_mut() {
            output.reset().await?;
        }

        let mut request = handle
            .client()
            .request(handle.method().clone(), handle.url().clone());
        if let Some(agent) = handle.user_agent() {
            request = request.header(USER_AGENT, agent.clone());
        }
        if let Some((user, password)) = handle.credentials() {
            request = request.basic_auth(user, password);
        }
        if let Some(body) = handle.body() {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_owned());
        }

        let mut response = request.send().await.map_err(FetchError::Transport)?;
        let status = response.status();

        if handle.fail_on_error() && (status.is_client_error() || status.is_server_error()) {
            let body = response.text().await.map_err(FetchError::Transport)?;
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let head = handle.include_headers().then(|| format_head(&response));
        let return_mode = handle.return_mode();

        if let Some(output) = handle.output_mut() {
            if let Some(head) = head {
                output.write(head.as_bytes()).await?;
            }
            while let Some(chunk) = response.chunk().await.map_err(FetchError::Transport)? {
                output.write(&chunk).await?;
            }
            output.finish().await?;
            return Ok(TransferOutput::Completed);
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        match return_mode {
            ReturnMode::Content => {
                let mut payload = head.map(String::into_bytes).unwrap_or_default();
                payload.extend_from_slice(&body);
                Ok(TransferOutput::Content(payload))
            }
            ReturnMode::Success => Ok(TransferOutput::Completed),
        }
    }
}

/// Status line and headers in wire layout, terminated by a blank line.
fn format_head(response: &reqwest::Response) -> String {
    let mut head = format!("{:?} {}\r\n", response.version(), response.status());
    for (name, value) in response.headers() {
        head.push_str(name.as_str());
        head.push_str(": ");
        head.push_str(&String::from_utf8_lossy(value.as_bytes()));
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    head
}
