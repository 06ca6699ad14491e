use super::{Job, JobReport};
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use stockrank_core::last_trading_day;
use stockrank_market::MarketDataProvider;
use stockrank_store::PriceStore;
use tracing::{info, warn};

/// Fetches end-of-day bars for the configured symbols
pub struct EodJob {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn PriceStore>,
    symbols: Vec<String>,
}

impl EodJob {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn PriceStore>,
        symbols: Vec<String>,
    ) -> Self {
        Self {
            provider,
            store,
            symbols,
        }
    }

    /// Fetch the most recent trading day as of today
    pub async fn run(&self) -> Result<JobReport> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Fetch the most recent trading day as of `today`
    pub async fn run_on(&self, today: NaiveDate) -> Result<JobReport> {
        let day = last_trading_day(today);
        info!(%day, symbols = self.symbols.len(), "EOD job: starting fetch");
        let report = self.fetch_and_store(day, day).await?;
        info!(%report, "EOD job: completed");
        Ok(report)
    }

    /// Fetch and store every trading day in `from..=to`
    pub async fn backfill(&self, from: NaiveDate, to: NaiveDate) -> Result<JobReport> {
        if from > to {
            return Err(ServiceError::InvalidRange { from, to });
        }
        info!(%from, %to, "EOD backfill: starting fetch");
        let report = self.fetch_and_store(from, to).await?;
        info!(%report, "EOD backfill: completed");
        Ok(report)
    }

    async fn fetch_and_store(&self, from: NaiveDate, to: NaiveDate) -> Result<JobReport> {
        let prices = self.provider.fetch_eod(&self.symbols, from, to).await?;

        let mut report = JobReport {
            fetched: prices.len(),
            ..JobReport::default()
        };
        for price in &prices {
            match self.store.upsert_eod(price).await {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(symbol = %price.symbol, date = %price.date, error = %e, "EOD upsert failed");
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl Job for EodJob {
    fn name(&self) -> &'static str {
        "eod"
    }

    async fn run(&self) -> Result<JobReport> {
        EodJob::run(self).await
    }
}
