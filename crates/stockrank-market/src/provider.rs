//! Provider abstraction over market data sources

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use stockrank_core::{EodPrice, IntradayPrice};

/// Source of end-of-day and intraday price rows
///
/// Both ranges are inclusive. Rows come back in no particular order; callers
/// that need ordering sort after storing.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbols` between `from` and `to`
    async fn fetch_eod(
        &self,
        symbols: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<EodPrice>>;

    /// Intraday bars for `symbols` between `from` and `to`
    async fn fetch_intraday(
        &self,
        symbols: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<IntradayPrice>>;
}
