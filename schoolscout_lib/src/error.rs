//! Error types for the library layer.

/// Errors produced by the library layer, wrapping upstream API errors and
/// adding cache, record conversion, formatting, and lookup failures.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// An error from the underlying API client.
    #[error("API error: {0}")]
    Api(#[from] scorecard_api::Error),
    /// Writing or clearing the on-disk cache failed.
    #[error("Cache error: {0}")]
    Cache(String),
    /// A record field had a type the pipeline cannot use.
    #[error("Invalid record for {name}: {reason}")]
    InvalidRecord { name: String, reason: String },
    /// A locale code with no categorical label.
    #[error("Invalid locale code: {0}")]
    InvalidLocaleCode(i64),
    /// Strict projection found a mapped field missing from the record.
    #[error("Missing field: {0}")]
    MissingField(String),
    /// A name lookup matched zero or several schools.
    #[error("{name} not found. found {candidates:?} instead")]
    RecordNotFound {
        name: String,
        candidates: Vec<String>,
    },
    /// Settings or credentials could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScoutError {
    /// True for transport failures, non-success statuses, and API error payloads.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}
