//! Fetch jobs and their daily schedule
//!
//! A job pulls one date range from the [`MarketDataProvider`] and upserts
//! every row into the [`PriceStore`]. A failed fetch fails the run; a failed
//! row is logged and counted, and the rest of the batch is still stored.
//!
//! [`MarketDataProvider`]: stockrank_market::MarketDataProvider
//! [`PriceStore`]: stockrank_store::PriceStore

mod eod;
mod intraday;
pub mod scheduler;

pub use eod::EodJob;
pub use intraday::IntradayJob;
pub use scheduler::{next_run_after, spawn_daily};

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Outcome of one job run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Rows returned by the provider
    pub fetched: usize,
    /// Rows upserted successfully
    pub stored: usize,
    /// Rows the store rejected
    pub failed: usize,
}

impl JobReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched {}, stored {}, failed {}",
            self.fetched, self.stored, self.failed
        )
    }
}

/// A unit of scheduled work
#[async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Run once for the current trading day
    async fn run(&self) -> Result<JobReport>;
}
