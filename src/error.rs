use std::path::PathBuf;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// An option was refused while building a request handle.
    #[error("option '{option}' rejected: {reason}")]
    ConfigRejected {
        /// Name of the offending option.
        option: String,
        /// Why the option could not be applied.
        reason: String,
    },
    /// The destination file could not be opened for writing.
    #[error("cannot open '{}' for writing: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// HTTP status >= 400 while `fail-on-error` is set.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Writing the response body to the output file failed.
    #[error("cannot write response to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn rejected(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigRejected {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
