//! Error types for stockrank-core

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for stockrank-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for domain validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A history must contain at least one bar
    #[error("price history is empty")]
    EmptyHistory,

    /// Bars must be strictly ascending by date
    #[error("bar dated {current} is not after previous bar dated {previous}")]
    UnorderedHistory {
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// Close prices must be finite and non-negative, volumes non-negative
    #[error("bar dated {date} has an invalid {field}")]
    InvalidValue { date: NaiveDate, field: &'static str },
}
