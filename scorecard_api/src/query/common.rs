//! Shared query infrastructure: the [`Query`] trait and [`Paging`] parameters.

use url::Url;

/// Trait implemented by query builders. Provides URL serialization and the
/// canonical form used to identify a query independently of paging.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;

    /// Deterministic textual form of the query. Two queries describing the
    /// same request produce the same string.
    fn canonical(&self) -> String;
}

/// Page size and page cursor. Kept apart from the query itself so that every
/// page of one query shares a single canonical form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paging {
    /// Results per page. `None` uses the API default.
    pub per_page: Option<u32>,
    /// Zero-based page index. `None` requests the API's first page.
    pub page: Option<u32>,
}

impl Paging {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            page: None,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Appends the paging parameters to the URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(per_page) = self.per_page {
            url.query_pairs_mut()
                .append_pair("per_page", &per_page.to_string());
        }
        if let Some(page) = self.page {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string());
        }
        url
    }
}
