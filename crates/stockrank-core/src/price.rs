//! Provider rows as fetched and persisted

use crate::bar::PriceBar;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// End-of-day price row for one symbol on one trading date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EodPrice {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub adj_close: f64,
    pub exchange: String,
}

/// Intraday price row for one symbol at one interval timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradayPrice {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub interval: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub exchange: String,
}

impl EodPrice {
    /// Project to the close/volume bar the ranking engine reads
    pub fn to_bar(&self) -> PriceBar {
        PriceBar::new(self.date, self.close, self.volume)
    }
}
