/// Query-parameter container that drops absent values.
///
/// Pairs pushed with a `None` value are discarded at build time, so a
/// parameter set whose values are all absent produces a URL with no query
/// string at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Builds an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair when `value` is present; drops it otherwise.
    pub fn push(mut self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.pairs.push((name.into(), value.to_string()));
        }
        self
    }

    /// True when no pair survived, meaning no query string is serialized.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(crate) fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl From<()> for Query {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K, V, const N: usize> From<[(K, Option<V>); N]> for Query
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: [(K, Option<V>); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |query, (name, value)| query.push(name, value))
    }
}
