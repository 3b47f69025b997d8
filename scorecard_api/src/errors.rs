//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API answered with an explicit `error` payload.
    #[error("API returned an error: {message}")]
    Api { message: String },
    /// The body was not the expected JSON shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
