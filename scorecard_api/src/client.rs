//! HTTP client for the College Scorecard `/schools` API.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::{
    query::{Paging, Query, SchoolQuery},
    types::SchoolsResponse,
    Error,
};

/// Production API root, without the version segment.
pub const DEFAULT_BASE_URL: &str = "https://api.data.gov/ed/collegescorecard";

/// Page size requested on every call unless overridden.
pub const DEFAULT_PER_PAGE: u32 = 50;

const SCHOOLS_PATH: &str = "/v1/schools";

/// Request timeout for Scorecard API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the College Scorecard API.
///
/// Holds the API key for its whole lifetime and appends it to every request.
/// The key is never written to logs.
pub struct Client {
    http: reqwest::Client,
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    api_key: String,
    per_page: u32,
}

impl Client {
    /// Creates a new client pointing at the production Scorecard API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Overrides the page size sent with each request.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    fn get_url(&self, query: &impl Query, page: Option<u32>) -> Result<Url, Error> {
        let mut url = Url::parse(format!("{}{}", &self.base_api_url, SCHOOLS_PATH).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::RequestFailed
            })?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        let mut paging = Paging::new(self.per_page);
        paging.page = page;
        let url = paging.add_to_url(&url);
        let url = query.add_to_url(&url);
        Ok(url)
    }

    /// Fetches one page of schools matching the given query.
    ///
    /// `page: None` omits the cursor, which the API answers with its first page.
    /// A non-success status, an unparseable body, or a top-level `error` key
    /// in the body are all errors.
    pub async fn get_schools(
        &self,
        query: &SchoolQuery,
        page: Option<u32>,
    ) -> Result<SchoolsResponse, Error> {
        let url = self.get_url(query, page)?;
        tracing::debug!("GET {} [{}] page={:?}", SCHOOLS_PATH, query.canonical(), page);

        let resp = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e.without_url());
            Error::RequestFailed
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e.without_url());
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::InvalidResponse(e.to_string())
        })?;

        if let Some(err) = value.get("error") {
            let message = error_message(err);
            tracing::error!("API returned an error: {}", message);
            return Err(Error::Api { message });
        }

        serde_json::from_value::<SchoolsResponse>(value).map_err(|e| {
            tracing::error!("Unexpected response shape: {}", e);
            Error::InvalidResponse(e.to_string())
        })
    }
}

/// The API nests a `message` inside the error object; fall back to the raw JSON.
fn error_message(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => err.to_string(),
        },
        other => other.to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
