//! Error types for market data retrieval

use thiserror::Error;

/// Market data retrieval errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Provider answered with a non-success HTTP status
    #[error("marketstack API returned status {status}")]
    Status { status: u16 },

    /// Provider answered 200 with an error object in the body
    #[error("marketstack API error {code}: {message}")]
    Api { code: String, message: String },

    /// Request quota exhausted on the provider side
    #[error("rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// A row could not be converted into a domain price
    #[error("malformed {field} in row for {symbol}: {value}")]
    MalformedRow {
        symbol: String,
        field: &'static str,
        value: String,
    },

    /// Network or HTTP error
    #[error("requesting marketstack API: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON decoding error
    #[error("decoding marketstack response: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl MarketError {
    /// Whether a fresh attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status } => *status == 429 || *status >= 500,
            Self::RateLimitExceeded { .. } => true,
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Result type alias for market data operations
pub type Result<T> = std::result::Result<T, MarketError>;
