//! Arrivals client error types.

/// Errors from fetching an arrivals board.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No upstream base URL was configured. Checked before any request.
    #[error("arrivals API base URL is not configured")]
    NotConfigured,

    /// The configured base URL could not be used to build a request URL.
    #[error("invalid arrivals API base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// Mock board files could not be read.
    #[error("mock data error: {message}")]
    MockData { message: String },

    /// Response body did not match the arrivals shape.
    #[error("JSON parse error: {message}")]
    Decode {
        message: String,
        body: Option<String>,
    },
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The board cannot fetch until its configuration is fixed.
    Configuration,
    /// The network or the upstream server failed.
    Transport,
    /// The upstream answered with something that is not an arrivals board.
    Decode,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::NotConfigured
            | FetchError::InvalidBaseUrl { .. }
            | FetchError::MockData { .. } => FetchErrorKind::Configuration,
            FetchError::Http(e) if e.is_decode() => FetchErrorKind::Decode,
            FetchError::Http(_) | FetchError::Status { .. } => FetchErrorKind::Transport,
            FetchError::Decode { .. } => FetchErrorKind::Decode,
        }
    }

    /// Build a decode error, keeping a bounded excerpt of the offending body.
    pub(crate) fn decode(err: serde_json::Error, body: &str) -> Self {
        FetchError::Decode {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}
