//! Upstream query parameters with a canonical, order-independent form.

use std::collections::BTreeMap;

/// Parameter set for one upstream event query.
///
/// Values are stored in rendered form so that two parameter sets that are
/// equal as key/value pairs canonicalize identically no matter the order in
/// which they were assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamQuery {
    params: BTreeMap<String, String>,
}

impl UpstreamQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value for the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Canonical serialization: JSON object with keys in sorted order.
    ///
    /// Serializing a string-to-string map cannot fail, so the fallback is
    /// unreachable in practice.
    pub fn canonical(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_is_insertion_order_independent() {
        let mut first = UpstreamQuery::new();
        first.set("starttime", "2026-08-01");
        first.set("minmagnitude", 2.5);
        first.set("format", "geojson");

        let mut second = UpstreamQuery::new();
        second.set("format", "geojson");
        second.set("starttime", "2026-08-01");
        second.set("minmagnitude", 2.5);

        assert_eq!(first, second);
        assert_eq!(first.canonical(), second.canonical());
    }

    #[test]
    fn canonical_form_sorts_keys() {
        let mut query = UpstreamQuery::new();
        query.set("longitude", "-122.4194");
        query.set("latitude", "37.7749");

        assert_eq!(
            query.canonical(),
            r#"{"latitude":"37.7749","longitude":"-122.4194"}"#
        );
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut query = UpstreamQuery::new();
        query.set("minmagnitude", 2.0);
        query.set("minmagnitude", 4.5);

        assert_eq!(query.get("minmagnitude"), Some("4.5"));
    }
}
