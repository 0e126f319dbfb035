use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A store filter as produced by the language model.
///
/// The shape is deliberately open: field names and operators are whatever the
/// model emitted. The only guarantee is that the top level is a JSON object.
/// The catalog store decides what the filter actually matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(Map<String, Value>);

impl FilterSpec {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The match-everything filter.
    pub fn all() -> Self {
        Self(Map::new())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Top-level keys, including logical operators such as `$or`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for FilterSpec {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = serde_json::to_string(&self.0).map_err(|_| std::fmt::Error)?;
        f.write_str(&rendered)
    }
}
