//! Error types for the API client.

/// Errors that can occur when talking to the Bangumi API.
///
/// Every variant carries the underlying cause so callers can report it.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The base URL and path did not form a valid URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The HTTP client could not be constructed (e.g. invalid header value).
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// The request did not complete (connection error or timeout).
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// The API returned a non-success status with a body snippet.
    #[error("request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// The body was not the JSON shape we expected.
    #[error("failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl TransportError {
    /// HTTP status code, when the failure was a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request hit the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}
