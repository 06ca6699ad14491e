//! Error types for the service layer

use stockrank_market::MarketError;
use stockrank_store::StoreError;
use thiserror::Error;

/// Service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("querying symbols: {0}")]
    Symbols(#[source] StoreError),

    /// Loading one symbol's history failed; the whole analysis is abandoned
    #[error("querying {symbol}: {source}")]
    History {
        symbol: String,
        #[source]
        source: StoreError,
    },

    #[error("invalid date range {from}..={to}")]
    InvalidRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("fetching prices: {0}")]
    Fetch(#[from] MarketError),
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
