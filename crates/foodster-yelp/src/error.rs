use thiserror::Error;

/// Why an HTTP exchange with Yelp did not produce a usable body.
#[derive(Debug, Error)]
pub enum FetchCause {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },
}

impl FetchCause {
    /// The HTTP status, when the failure came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchCause::Transport(e) => e.status().map(|s| s.as_u16()),
            FetchCause::Status { status, .. } => Some(*status),
        }
    }
}

/// Errors returned by the Yelp business API client.
#[derive(Debug, Error)]
pub enum YelpError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// `GET /businesses/search` failed before a body could be decoded.
    #[error("restaurant search failed: {0}")]
    SearchFailed(#[source] FetchCause),

    /// `GET /businesses/{id}` failed before a body could be decoded.
    #[error("restaurant detail fetch failed for {id}: {cause}")]
    DetailFetchFailed {
        id: String,
        #[source]
        cause: FetchCause,
    },

    /// The response body did not match the expected JSON shape.
    #[error("JSON deserialization error for {context}: {source}")]
    DecodeFailed {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
