/// Retry and timeout settings shared by every request of a [`Fetcher`](crate::Fetcher).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FetchOptions {
    /// Maximum number of retries after the initial attempt.
    ///
    /// Retries are immediate and unconditional; see [`execute`](crate::execute).
    pub max_retries: usize,
    /// Whole-request timeout in milliseconds, used unless the request sets
    /// its own `timeout-ms`. `Some(0)` means no timeout.
    pub timeout_ms: Option<u64>,
}

impl FetchOptions {
    /// Reads options from the environment.
    ///
    /// Reads:
    /// - `QUICKFETCH_MAX_RETRIES` — retries after the first attempt
    /// - `QUICKFETCH_TIMEOUT_MS` — request timeout in milliseconds
    ///
    /// Unset variables keep their defaults. A set but unparsable value is an
    /// error.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut options = Self::default();
        if let Some(raw) = lookup("QUICKFETCH_MAX_RETRIES") {
            options.max_retries = raw
                .trim()
                .parse()
                .map_err(|err| format!("invalid QUICKFETCH_MAX_RETRIES '{raw}': {err}"))?;
        }
        if let Some(raw) = lookup("QUICKFETCH_TIMEOUT_MS") {
            let timeout_ms = raw
                .trim()
                .parse()
                .map_err(|err| format!("invalid QUICKFETCH_TIMEOUT_MS '{raw}': {err}"))?;
            options.timeout_ms = Some(timeout_ms);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::FetchOptions;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_mean_one_attempt_and_no_timeout() {
        let options = FetchOptions::default();
        assert_eq!(options.max_retries, 0);
        assert_eq!(options.timeout_ms, None);
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let options = FetchOptions::from_lookup(lookup(&[])).expect("must parse");
        assert_eq!(options, FetchOptions::default());
    }

    #[test]
    fn reads_both_variables() {
        let options = FetchOptions::from_lookup(lookup(&[
            ("QUICKFETCH_MAX_RETRIES", " 3 "),
            ("QUICKFETCH_TIMEOUT_MS", "1500"),
        ]))
        .expect("must parse");
        assert_eq!(
            options,
            FetchOptions {
                max_retries: 3,
                timeout_ms: Some(1500),
            }
        );
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let err = FetchOptions::from_lookup(lookup(&[("QUICKFETCH_MAX_RETRIES", "many")]))
            .expect_err("must fail");
        assert!(err.contains("QUICKFETCH_MAX_RETRIES"));
    }
}
