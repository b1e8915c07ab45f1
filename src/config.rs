use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::{Fields, OptionValue, OutputFile};

/// Options understood by [`Handle::new`](crate::Handle::new).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    /// Echo the status line and response headers into the output.
    Header,
    /// Return the body to the caller instead of a success flag.
    ReturnTransfer,
    Url,
    Post,
    PostFields,
    /// Basic-auth credentials as `user:pass`.
    UserPwd,
    File,
    SslVerifyPeer,
    SslVerifyHost,
    TimeoutMs,
    UserAgent,
    /// Treat HTTP status >= 400 as a failed transfer.
    FailOnError,
}

impl OptionKey {
    pub const ALL: [OptionKey; 12] = [
        Self::Header,
        Self::ReturnTransfer,
        Self::Url,
        Self::Post,
        Self::PostFields,
        Self::UserPwd,
        Self::File,
        Self::SslVerifyPeer,
        Self::SslVerifyHost,
        Self::TimeoutMs,
        Self::UserAgent,
        Self::FailOnError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::ReturnTransfer => "return-transfer",
            Self::Url => "url",
            Self::Post => "post",
            Self::PostFields => "post-fields",
            Self::UserPwd => "userpwd",
            Self::File => "file",
            Self::SslVerifyPeer => "ssl-verify-peer",
            Self::SslVerifyHost => "ssl-verify-host",
            Self::TimeoutMs => "timeout-ms",
            Self::UserAgent => "user-agent",
            Self::FailOnError => "fail-on-error",
        }
    }

    /// Looks up a key by its option name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for OptionKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<OptionKey> for String {
    fn from(key: OptionKey) -> Self {
        key.as_str().to_owned()
    }
}

/// Option map for one request.
///
/// Builders consume the configuration and hand it back, so calls chain:
///
/// ```
/// use quickfetch::RequestConfig;
///
/// let config = RequestConfig::new()
///     .fields([("k", "v")])
///     .credentials("user", "secret")
///     .insecure_tls();
/// assert_eq!(config.len(), 5);
/// ```
///
/// None of the builders check that the resulting combination makes sense;
/// [`Handle::new`](crate::Handle::new) validates keys and value types.
#[derive(Debug, Default)]
pub struct RequestConfig {
    entries: BTreeMap<String, OptionValue>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three defaults: no header echo, return content, target `url`.
    pub fn defaults(url: impl Into<String>) -> Self {
        Self::new()
            .set(OptionKey::Header, false)
            .set(OptionKey::ReturnTransfer, true)
            .set(OptionKey::Url, url.into())
    }

    /// Produces a configuration ready for the handle constructor.
    ///
    /// Without a base the defaults are used as-is. With a base, keys already
    /// present in it are kept and the defaults only fill the gaps.
    pub fn prepare(url: impl Into<String>, base: Option<RequestConfig>) -> Self {
        let defaults = Self::defaults(url);
        match base {
            Some(base) => base.merge_defaults(defaults),
            None => defaults,
        }
    }

    /// Additive merge: every key of `self` wins, `defaults` fill the rest.
    pub fn merge_defaults(mut self, defaults: RequestConfig) -> Self {
        for (key, value) in defaults.entries {
            self.entries.entry(key).or_insert(value);
        }
        self
    }

    /// Sets any option, overwriting a previous value.
    ///
    /// Unknown names are stored too and rejected later by the handle.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Encodes `fields` as the POST body and switches to POST.
    pub fn fields(self, fields: impl Into<Fields>) -> Self {
        let body = fields.into().encode();
        self.set(OptionKey::Post, true)
            .set(OptionKey::PostFields, body)
    }

    /// Attaches basic-auth credentials.
    pub fn credentials(self, user: &str, password: &str) -> Self {
        self.set(OptionKey::UserPwd, format!("{user}:{password}"))
    }

    /// Writes the body to `file`; the request then yields a success flag.
    pub fn output_file(self, file: OutputFile) -> Self {
        self.set(OptionKey::File, file)
            .set(OptionKey::ReturnTransfer, false)
    }

    pub fn boolean_return(self) -> Self {
        self.set(OptionKey::ReturnTransfer, false)
    }

    pub fn return_content(self) -> Self {
        self.set(OptionKey::ReturnTransfer, true)
    }

    /// Disables certificate and host name verification.
    pub fn insecure_tls(self) -> Self {
        self.set(OptionKey::SslVerifyPeer, false)
            .set(OptionKey::SslVerifyHost, false)
    }

    pub fn include_headers(self, include: bool) -> Self {
        self.set(OptionKey::Header, include)
    }

    /// Whole-request timeout; `0` means no timeout.
    pub fn timeout_ms(self, timeout_ms: u64) -> Self {
        let value = i64::try_from(timeout_ms).unwrap_or(i64::MAX);
        self.set(OptionKey::TimeoutMs, value)
    }

    pub fn user_agent(self, agent: impl Into<String>) -> Self {
        self.set(OptionKey::UserAgent, agent.into())
    }

    pub fn fail_on_error(self, fail: bool) -> Self {
        self.set(OptionKey::FailOnError, fail)
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&OptionValue> {
        self.entries.get(key.as_ref())
    }

    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> btree_map::IntoIter<String, OptionValue> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::{OptionKey, OptionValue, OutputFile, RequestConfig};

    fn flag(config: &RequestConfig, key: OptionKey) -> Option<bool> {
        config.get(key.as_str()).and_then(OptionValue::as_bool)
    }

    fn text(config: &RequestConfig, key: OptionKey) -> Option<&str> {
        config.get(key.as_str()).and_then(OptionValue::as_text)
    }

    #[test]
    fn defaults_install_three_keys() {
        let config = RequestConfig::prepare("http://example.test/a", None);
        assert_eq!(config.len(), 3);
        assert_eq!(flag(&config, OptionKey::Header), Some(false));
        assert_eq!(flag(&config, OptionKey::ReturnTransfer), Some(true));
        assert_eq!(text(&config, OptionKey::Url), Some("http://example.test/a"));
    }

    #[test]
    fn base_keys_win_and_defaults_fill_gaps() {
        let base = RequestConfig::new()
            .set(OptionKey::Header, true)
            .set(OptionKey::Url, "http://override.test/")
            .set(OptionKey::UserAgent, "agent/1");
        let config = RequestConfig::prepare("http://example.test/a", Some(base));

        assert_eq!(config.len(), 4);
        assert_eq!(flag(&config, OptionKey::Header), Some(true));
        assert_eq!(text(&config, OptionKey::Url), Some("http://override.test/"));
        assert_eq!(text(&config, OptionKey::UserAgent), Some("agent/1"));
        assert_eq!(flag(&config, OptionKey::ReturnTransfer), Some(true));
    }

    #[test]
    fn merge_preserves_overrides_and_fills_every_missing_default() {
        let defaults = RequestConfig::new()
            .set("a", 1_i64)
            .set("b", 2_i64)
            .set("c", 3_i64);
        let overrides = RequestConfig::new().set("b", 20_i64).set("d", 40_i64);
        let merged = overrides.merge_defaults(defaults);

        let values: Vec<(&str, Option<i64>)> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|key| (key, merged.get(key).and_then(OptionValue::as_integer)))
            .collect();
        assert_eq!(
            values,
            vec![("a", Some(1)), ("b", Some(20)), ("c", Some(3)), ("d", Some(40))]
        );
    }

    #[test]
    fn merge_with_empty_base_equals_defaults() {
        let merged = RequestConfig::new().merge_defaults(RequestConfig::defaults("u"));
        assert_eq!(merged.len(), 3);
        assert_eq!(text(&merged, OptionKey::Url), Some("u"));
    }

    #[test]
    fn fields_builder_encodes_and_switches_to_post() {
        let config = RequestConfig::defaults("http://example.test/a").fields([("k", "v")]);
        assert_eq!(flag(&config, OptionKey::Post), Some(true));
        assert_eq!(text(&config, OptionKey::PostFields), Some("k=v"));
    }

    #[test]
    fn credentials_builder_joins_with_colon() {
        let config = RequestConfig::new().credentials("alice", "s3:cret");
        assert_eq!(text(&config, OptionKey::UserPwd), Some("alice:s3:cret"));
    }

    #[test]
    fn insecure_tls_turns_off_both_checks() {
        let config = RequestConfig::new().insecure_tls();
        assert_eq!(flag(&config, OptionKey::SslVerifyPeer), Some(false));
        assert_eq!(flag(&config, OptionKey::SslVerifyHost), Some(false));
    }

    #[test]
    fn later_builder_overwrites_earlier_one() {
        let config = RequestConfig::new().boolean_return().return_content();
        assert_eq!(flag(&config, OptionKey::ReturnTransfer), Some(true));
        let config = config.boolean_return();
        assert_eq!(flag(&config, OptionKey::ReturnTransfer), Some(false));
    }

    #[tokio::test]
    async fn output_file_flips_return_mode_after_explicit_content_request() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let file = OutputFile::create(dir.path().join("out.dat"))
            .await
            .expect("file must open");

        let config = RequestConfig::defaults("http://example.test/a")
            .return_content()
            .output_file(file);

        assert_eq!(flag(&config, OptionKey::ReturnTransfer), Some(false));
        assert!(matches!(
            config.get(OptionKey::File.as_str()),
            Some(OptionValue::File(_))
        ));
    }

    #[test]
    fn key_names_round_trip() {
        for key in OptionKey::ALL {
            assert_eq!(OptionKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(OptionKey::from_name("unsupported-key"), None);
    }
}
