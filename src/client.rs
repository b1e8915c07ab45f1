use std::path::Path;

use crate::{
    execute, FetchOptions, Fields, Handle, HttpTransfer, OutputFile, RequestConfig, Result,
    Transfer, TransferOutput,
};

/// Entry points for the common request shapes.
///
/// Each call builds a fresh [`RequestConfig`], turns it into a [`Handle`]
/// and runs it through [`execute`] with the configured retry budget.
#[derive(Clone, Debug, Default)]
pub struct Fetcher<T = HttpTransfer> {
    transfer: T,
    options: FetchOptions,
}

impl Fetcher {
    /// Creates a fetcher backed by `reqwest` with default options.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Transfer> Fetcher<T> {
    /// Creates a fetcher that performs transfers with `transfer`.
    pub fn with_transfer(transfer: T) -> Self {
        Self {
            transfer,
            options: FetchOptions::default(),
        }
    }

    /// Applies retry and timeout options.
    pub fn with_options(mut self, opts: FetchOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Reads `url`.
    ///
    /// Without `dest` the response body is returned as
    /// [`TransferOutput::Content`]. With `dest` the file is opened for
    /// writing first, the body is written to it and the result is
    /// [`TransferOutput::Completed`].
    pub async fn fetch(&self, url: &str, dest: Option<&Path>) -> Result<TransferOutput> {
        self.run(url, RequestConfig::defaults(url), dest).await
    }

    /// Posts form `fields` to `url`; otherwise behaves like [`Fetcher::fetch`].
    pub async fn submit(
        &self,
        url: &str,
        fields: impl Into<Fields>,
        dest: Option<&Path>,
    ) -> Result<TransferOutput> {
        let config = RequestConfig::defaults(url).fields(fields);
        self.run(url, config, dest).await
    }

    /// Executes an arbitrary configuration against `url`.
    ///
    /// Missing defaults are filled in; unsupported options fail before any
    /// network traffic.
    pub async fn perform(&self, url: &str, config: RequestConfig) -> Result<TransferOutput> {
        let handle = self.handle(url, config)?;
        execute(&self.transfer, handle, self.options.max_retries).await
    }

    /// Builds the handle that [`Fetcher::perform`] would execute.
    pub fn handle(&self, url: &str, config: RequestConfig) -> Result<Handle> {
        let config = match self.options.timeout_ms {
            Some(timeout_ms) => {
                config.merge_defaults(RequestConfig::new().timeout_ms(timeout_ms))
            }
            None => config,
        };
        Handle::new(url, Some(config))
    }

    async fn run(
        &self,
        url: &str,
        config: RequestConfig,
        dest: Option<&Path>,
    ) -> Result<TransferOutput> {
        let config = match dest {
            Some(path) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %path.display(), "writing response to file");

                config.output_file(OutputFile::create(path).await?)
            }
            None => config,
        };
        self.perform(url, config).await
    }
}

/// Reads `url` with a default [`Fetcher`].
pub async fn fetch(url: &str, dest: Option<&Path>) -> Result<TransferOutput> {
    Fetcher::new().fetch(url, dest).await
}

/// Posts form `fields` to `url` with a default [`Fetcher`].
pub async fn submit(
    url: &str,
    fields: impl Into<Fields>,
    dest: Option<&Path>,
) -> Result<TransferOutput> {
    Fetcher::new().submit(url, fields, dest).await
}
