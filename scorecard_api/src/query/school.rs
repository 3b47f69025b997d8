use std::collections::BTreeMap;

use url::form_urlencoded::Serializer;
use url::Url;

use super::Query;

/// Query against the `/schools` endpoint: filter pairs plus the list of
/// fields to return.
///
/// Filters are kept sorted by key, so the order in which they are added
/// never changes the canonical form. Fields keep the order they were given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchoolQuery {
    pub filters: BTreeMap<String, String>,
    pub fields: Vec<String>,
}

impl Query for SchoolQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.filters.iter() {
            url.query_pairs_mut().append_pair(key, value);
        }
        if !self.fields.is_empty() {
            url.query_pairs_mut()
                .append_pair("fields", &self.fields.join(","));
        }
        url
    }

    /// Form-encoded filters, then `#` and the encoded field list. Encoding
    /// escapes `&`, `=` and `#`, so distinct queries never share a form.
    fn canonical(&self) -> String {
        let mut filters = Serializer::new(String::new());
        for (key, value) in self.filters.iter() {
            filters.append_pair(key, value);
        }
        let mut canonical = filters.finish();
        if !self.fields.is_empty() {
            canonical.push('#');
            canonical.push_str(
                &Serializer::new(String::new())
                    .append_pair("fields", &self.fields.join(","))
                    .finish(),
            );
        }
        canonical
    }
}

impl SchoolQuery {
    /// Adds a filter, replacing any previous value for the same key.
    pub fn with_filter(mut self, key: &str, value: impl ToString) -> Self {
        self.filters.insert(key.to_string(), value.to_string());
        self
    }
    pub fn with_filters<K, V>(mut self, filters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.filters
            .extend(filters.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.fields.push(field.to_string());
        self
    }
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Returns the value of a filter, if set.
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }
}
