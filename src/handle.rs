use std::fmt;
use std::time::Duration;

use reqwest::{header::HeaderValue, Method, Url};

use crate::{FetchError, OptionKey, OptionValue, OutputFile, RequestConfig, Result};

/// What a completed transfer hands back to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnMode {
    /// The response body (and echoed headers, if requested).
    Content,
    /// Only whether the transfer succeeded.
    Success,
}

/// A validated request, ready for a [`Transfer`](crate::Transfer).
///
/// Built from a [`RequestConfig`] by [`Handle::new`]. The handle owns the
/// output file, if any, so the file is closed when the handle is dropped.
pub struct Handle {
    http: reqwest::Client,
    url: Url,
    method: Method,
    body: Option<String>,
    credentials: Option<(String, Option<String>)>,
    include_headers: bool,
    return_mode: ReturnMode,
    fail_on_error: bool,
    timeout: Option<Duration>,
    verify_peer: bool,
    verify_host: bool,
    user_agent: Option<HeaderValue>,
    output: Option<OutputFile>,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("url", &self.url.as_str())
            .field("method", &self.method)
            .field("body", &self.body)
            .field(
                "credentials",
                &self.credentials.as_ref().map(|(user, _)| (user, "<redacted>")),
            )
            .field("include_headers", &self.include_headers)
            .field("return_mode", &self.return_mode)
            .field("fail_on_error", &self.fail_on_error)
            .field("timeout", &self.timeout)
            .field("verify_peer", &self.verify_peer)
            .field("verify_host", &self.verify_host)
            .field("output", &self.output)
            .finish()
    }
}

#[derive(Default)]
struct Settings {
    url: Option<String>,
    include_headers: bool,
    return_transfer: bool,
    post: Option<bool>,
    post_fields: Option<String>,
    userpwd: Option<String>,
    output: Option<OutputFile>,
    skip_peer_verify: bool,
    skip_host_verify: bool,
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
    fail_on_error: bool,
}

impl Settings {
    fn apply(&mut self, name: String, value: OptionValue) -> Result<()> {
        let Some(key) = OptionKey::from_name(&name) else {
            return Err(FetchError::rejected(name, "unsupported option"));
        };

        match (key, value) {
            (OptionKey::Header, OptionValue::Bool(on)) => self.include_headers = on,
            (OptionKey::ReturnTransfer, OptionValue::Bool(on)) => self.return_transfer = on,
            (OptionKey::Url, OptionValue::Text(url)) => self.url = Some(url),
            (OptionKey::Post, OptionValue::Bool(on)) => self.post = Some(on),
            (OptionKey::PostFields, OptionValue::Text(body)) => self.post_fields = Some(body),
            (OptionKey::UserPwd, OptionValue::Text(userpwd)) => self.userpwd = Some(userpwd),
            (OptionKey::File, OptionValue::File(file)) => self.output = Some(file),
            (OptionKey::SslVerifyPeer, OptionValue::Bool(on)) => self.skip_peer_verify = !on,
            (OptionKey::SslVerifyHost, OptionValue::Bool(on)) => self.skip_host_verify = !on,
            (OptionKey::TimeoutMs, OptionValue::Integer(ms)) => {
                let ms = u64::try_from(ms).map_err(|_| {
                    FetchError::rejected(key.as_str(), "timeout must not be negative")
                })?;
                self.timeout_ms = Some(ms);
            }
            (OptionKey::UserAgent, OptionValue::Text(agent)) => self.user_agent = Some(agent),
            (OptionKey::FailOnError, OptionValue::Bool(on)) => self.fail_on_error = on,
            (key, value) => {
                return Err(FetchError::rejected(
                    key.as_str(),
                    format!("expected {}, got {}", expected_kind(key), value.kind()),
                ));
            }
        }
        Ok(())
    }
}

fn expected_kind(key: OptionKey) -> &'static str {
    match key {
        OptionKey::Url | OptionKey::PostFields | OptionKey::UserPwd | OptionKey::UserAgent => {
            "text"
        }
        OptionKey::TimeoutMs => "integer",
        OptionKey::File => "file",
        _ => "bool",
    }
}

impl Handle {
    /// Builds a handle for `url`, filling any gaps in `config` with defaults.
    ///
    /// Fails with [`FetchError::ConfigRejected`] on an unknown option, a
    /// value of the wrong type, an unparsable URL or user agent, or an HTTP
    /// client that cannot be built from the TLS and timeout options.
    ///
    /// When an output file is attached the return mode is always
    /// [`ReturnMode::Success`], whatever `return-transfer` says.
    pub fn new(url: impl Into<String>, config: Option<RequestConfig>) -> Result<Self> {
        let mut settings = Settings::default();
        for (name, value) in RequestConfig::prepare(url, config).into_entries() {
            settings.apply(name, value)?;
        }

        let raw_url = settings
            .url
            .ok_or_else(|| FetchError::rejected(OptionKey::Url.as_str(), "missing"))?;
        let url = Url::parse(&raw_url)
            .map_err(|err| FetchError::rejected(OptionKey::Url.as_str(), err.to_string()))?;

        let user_agent = settings
            .user_agent
            .map(|agent| {
                HeaderValue::from_str(&agent).map_err(|err| {
                    FetchError::rejected(OptionKey::UserAgent.as_str(), err.to_string())
                })
            })
            .transpose()?;

        // 0 disables the timeout.
        let timeout = settings
            .timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        let mut builder = reqwest::Client::builder();
        if settings.skip_peer_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if settings.skip_host_verify {
            builder = builder.danger_accept_invalid_hostnames(true);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| FetchError::rejected("client", err.to_string()))?;

        let post = settings.post.unwrap_or(settings.post_fields.is_some());
        let (method, body) = if post {
            (Method::POST, Some(settings.post_fields.unwrap_or_default()))
        } else {
            (Method::GET, None)
        };

        let credentials = settings.userpwd.map(|userpwd| match userpwd.split_once(':') {
            Some((user, password)) => (user.to_owned(), Some(password.to_owned())),
            None => (userpwd.clone(), None),
        });

        let return_mode = if settings.output.is_none() && settings.return_transfer {
            ReturnMode::Content
        } else {
            ReturnMode::Success
        };

        let handle = Self {
            http,
            url,
            method,
            body,
            credentials,
            include_headers: settings.include_headers,
            return_mode,
            fail_on_error: settings.fail_on_error,
            timeout,
            verify_peer: !settings.skip_peer_verify,
            verify_host: !settings.skip_host_verify,
            user_agent,
            output: settings.output,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(?handle, "built request handle");

        Ok(handle)
    }

    /// Client carrying the TLS and timeout settings of this handle.
    pub fn client(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Form-urlencoded body of a POST request.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// User name and optional password for basic auth.
    pub fn credentials(&self) -> Option<(&str, Option<&str>)> {
        self.credentials
            .as_ref()
            .map(|(user, password)| (user.as_str(), password.as_deref()))
    }

    pub fn include_headers(&self) -> bool {
        self.include_headers
    }

    pub fn return_mode(&self) -> ReturnMode {
        self.return_mode
    }

    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether the server certificate is checked.
    pub fn verify_peer(&self) -> bool {
        self.verify_peer
    }

    /// Whether the certificate must match the host name.
    pub fn verify_host(&self) -> bool {
        self.verify_host
    }

    pub fn user_agent(&self) -> Option<&HeaderValue> {
        self.user_agent.as_ref()
    }

    pub fn output(&self) -> Option<&OutputFile> {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> Option<&mut OutputFile> {
        self.output.as_mut()
    }
}
