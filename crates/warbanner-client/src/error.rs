//! Client-side error type.

/// Errors surfaced by the client library.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure: connection refused, timeout, malformed
    /// response. Transient by nature — the sync loop retries these.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an `{"error": ...}` body. A present
    /// `error` field means failure regardless of the HTTP status code.
    #[error("server error: {0}")]
    Api(String),

    /// The character payload could not be parsed or is missing fields.
    #[error("invalid character data: {0}")]
    Character(String),

    /// Reading or writing the device-local identity file failed.
    #[error("identity store: {0}")]
    Identity(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
