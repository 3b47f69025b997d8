use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One flat result object as returned by the API, keyed by dotted field name
/// (e.g. `latest.student.size`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value under `key` unless it is missing or JSON `null`.
    pub fn non_null(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Returns the string value under `key`, if it is a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::RawRecord;

    #[test]
    fn non_null_skips_null_values() {
        let record: RawRecord = [
            ("school.name", json!("Example College")),
            ("school.city", json!(null)),
        ]
        .into_iter()
        .collect();

        assert!(record.non_null("school.name").is_some());
        assert!(record.contains_key("school.city"));
        assert!(record.non_null("school.city").is_none());
        assert!(record.non_null("school.state").is_none());
        assert_eq!(record.str_field("school.name"), Some("Example College"));
    }
}
