use super::{Job, JobReport};
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use stockrank_core::last_trading_day;
use stockrank_market::MarketDataProvider;
use stockrank_store::PriceStore;
use tracing::{info, warn};

/// Fetches intraday bars for the configured symbols
pub struct IntradayJob {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn PriceStore>,
    symbols: Vec<String>,
}

impl IntradayJob {
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

    pub async fn run(&self) -> Result<JobReport> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Fetch the bars of the most recent trading day as of `today`
    pub async fn run_on(&self, today: NaiveDate) -> Result<JobReport> {
        let day = last_trading_day(today);
        info!(%day, symbols = self.symbols.len(), "intraday job: starting fetch");
        let report = self.fetch_and_store(day, day).await?;
        info!(%report, "intraday job: completed");
        Ok(report)
    }

    pub async fn backfill(&self, from: NaiveDate, to: NaiveDate) -> Result<JobReport> {
        if from > to {
            return Err(ServiceError::InvalidRange { from, to });
        }
        info!(%from, %to, "intraday backfill: starting fetch");
        let report = self.fetch_and_store(from, to).await?;
        info!(%report, "intraday backfill: completed");
        Ok(report)
    }

    async fn fetch_and_store(&self, from: NaiveDate, to: NaiveDate) -> Result<JobReport> {
        let prices = self.provider.fetch_intraday(&self.symbols, from, to).await?;

        let mut report = JobReport {
            fetched: prices.len(),
            ..JobReport::default()
        };
        for price in &prices {
            match self.store.upsert_intraday(price).await {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        symbol = %price.symbol,
                        timestamp = %price.timestamp,
                        error = %e,
                        "intraday upsert failed"
                    );
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl Job for IntradayJob {
    fn name(&self) -> &'static str {
        "intraday"
    }

    async fn run(&self) -> Result<JobReport> {
        IntradayJob::run(self).await
    }
}
