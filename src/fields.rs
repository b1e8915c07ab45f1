use std::collections::{BTreeMap, HashMap};

use url::form_urlencoded;

/// POST fields for a form submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fields {
    /// Body that is already `application/x-www-form-urlencoded`.
    Encoded(String),
    /// Key/value pairs, encoded in order.
    Pairs(Vec<(String, String)>),
}

impl Fields {
    /// Builds fields from key/value pairs.
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Pairs(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Returns the form-urlencoded body (`key=value&key=value`).
    ///
    /// Pre-encoded fields are returned unchanged.
    pub fn encode(&self) -> String {
        match self {
            Self::Encoded(body) => body.clone(),
            Self::Pairs(pairs) => form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish(),
        }
    }
}

impl From<String> for Fields {
    fn from(body: String) -> Self {
        Self::Encoded(body)
    }
}

impl From<&str> for Fields {
    fn from(body: &str) -> Self {
        Self::Encoded(body.to_owned())
    }
}

impl<K, V> From<Vec<(K, V)>> for Fields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::pairs(pairs)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::pairs(pairs)
    }
}

impl<K, V> From<BTreeMap<K, V>> for Fields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::pairs(map)
    }
}

// Iteration order of a HashMap is unspecified; sort for a stable body.
impl<K, V, S> From<HashMap<K, V, S>> for Fields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        let mut pairs: Vec<(String, String)> = map
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        pairs.sort();
        Self::Pairs(pairs)
    }
}
