//! Station directory error types.

/// Errors that can occur when fetching raw stations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The directory could not be reached (connection failure, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The directory responded with a non-success status.
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The directory responded successfully but the payload was unusable.
    #[error("malformed upstream payload: {message}")]
    Malformed {
        message: String,
        body: Option<String>,
    },

    /// The source could not be set up or read (bad API key format, missing
    /// mock data directory).
    #[error("station source unavailable: {message}")]
    Unavailable { message: String },
}

impl FetchError {
    /// Whether repeating the same request might succeed.
    ///
    /// Transport failures, rate limiting and server-side errors are
    /// retryable; bad keys and malformed payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Upstream { status, .. } => *status == 429 || *status >= 500,
            FetchError::Malformed { .. } | FetchError::Unavailable { .. } => false,
        }
    }
}
