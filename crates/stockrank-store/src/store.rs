use crate::error::Result;
use async_trait::async_trait;
use stockrank_core::{EodPrice, IntradayPrice, PriceBar};

/// Persistence seam shared by the fetch jobs and the analysis service
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Create tables if missing; safe to call on every start
    async fn migrate(&self) -> Result<()>;

    /// Insert or replace the row for `(symbol, date)`
    async fn upsert_eod(&self, price: &EodPrice) -> Result<()>;

    /// Insert or replace the row for `(symbol, timestamp, interval)`
    async fn upsert_intraday(&self, price: &IntradayPrice) -> Result<()>;

    /// Distinct symbols with at least one EOD row, ascending
    async fn symbols(&self) -> Result<Vec<String>>;

    /// Close/volume bars for `symbol`, oldest first
    async fn eod_history(&self, symbol: &str) -> Result<Vec<PriceBar>>;
}
