//! Ranking over stored prices

use crate::error::{Result, ServiceError};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use stockrank_core::PriceHistory;
use stockrank_engine::AnalysisResult;
use stockrank_store::PriceStore;
use tracing::{debug, info, warn};

/// Loads every stored history and ranks the batch
#[derive(Clone)]
pub struct AnalysisService {
    store: Arc<dyn PriceStore>,
}

impl AnalysisService {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self { store }
    }

    /// Rank all stored symbols, dated today
    pub async fn analyze(&self) -> Result<AnalysisResult> {
        self.analyze_on(Local::now().date_naive()).await
    }

    /// Rank all stored symbols, dated `date`
    pub async fn analyze_on(&self, date: NaiveDate) -> Result<AnalysisResult> {
        let histories = self.load_histories().await?;
        let result = stockrank_engine::analyze_on(&histories, date);

        info!(
            symbols = result.len(),
            leader = result.rankings.first().map(|s| s.symbol.as_str()),
            "analysis complete"
        );
        Ok(result)
    }

    /// Histories for every symbol with at least one bar; symbols whose bars
    /// fail validation are left out
    pub async fn load_histories(&self) -> Result<BTreeMap<String, PriceHistory>> {
        let symbols = self.store.symbols().await.map_err(ServiceError::Symbols)?;

        let mut histories = BTreeMap::new();
        for symbol in symbols {
            let bars = self
                .store
                .eod_history(&symbol)
                .await
                .map_err(|source| ServiceError::History {
                    symbol: symbol.clone(),
                    source,
                })?;

            if bars.is_empty() {
                debug!(%symbol, "no bars, skipping");
                continue;
            }

            match PriceHistory::new(bars) {
                Ok(history) => {
                    histories.insert(symbol, history);
                }
                Err(e) => warn!(%symbol, error = %e, "invalid stored history, skipping"),
            }
        }

        Ok(histories)
    }
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockStore;
    use stockrank_core::{EodPrice, PriceBar};
    use stockrank_store::{MemoryPriceStore, StoreError};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn eod(symbol: &str, d: u32, close: f64, volume: i64) -> EodPrice {
        EodPrice {
            symbol: symbol.to_string(),
            date: day(d),
            open: close,
            high: close,
            low: close,
            close,
            volume,
            adj_close: close,
            exchange: "XNAS".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ranks_stored_symbols() {
        let store = MemoryPriceStore::new();
        for row in [
            eod("UP", 6, 100.0, 10),
            eod("UP", 7, 110.0, 20),
            eod("DOWN", 6, 100.0, 10),
            eod("DOWN", 7, 90.0, 10),
        ] {
            store.upsert_eod(&row).await.unwrap();
        }

        let service = AnalysisService::new(Arc::new(store));
        let result = service.analyze_on(day(8)).await.unwrap();

        assert_eq!(result.date, day(8));
        assert_eq!(result.rankings[0].symbol, "UP");
        assert_eq!(result.rankings[1].symbol, "DOWN");
        assert_eq!(result.rankings[1].rank, 2);
    }

    #[tokio::test]
    async fn test_empty_store_gives_empty_rankings() {
        let service = AnalysisService::new(Arc::new(MemoryPriceStore::new()));
        let result = service.analyze_on(day(8)).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_symbols_without_bars_are_skipped() {
        let mut store = MockStore::new();
        store
            .expect_symbols()
            .returning(|| Ok(vec!["AAPL".to_string(), "GHOST".to_string()]));
        store.expect_eod_history().returning(|symbol| {
            if symbol == "AAPL" {
                Ok(vec![PriceBar::new(day(6), 10.0, 5), PriceBar::new(day(7), 11.0, 6)])
            } else {
                Ok(Vec::new())
            }
        });

        let service = AnalysisService::new(Arc::new(store));
        let result = service.analyze_on(day(8)).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(result.get("GHOST").is_none());
    }

    #[tokio::test]
    async fn test_history_failure_names_symbol() {
        let mut store = MockStore::new();
        store
            .expect_symbols()
            .returning(|| Ok(vec!["AAPL".to_string(), "MSFT".to_string()]));
        store.expect_eod_history().returning(|symbol| {
            if symbol == "MSFT" {
                Err(StoreError::Database(sqlx_error()))
            } else {
                Ok(vec![PriceBar::new(day(6), 10.0, 5)])
            }
        });

        let service = AnalysisService::new(Arc::new(store));
        let err = service.analyze_on(day(8)).await.unwrap_err();

        assert!(matches!(&err, ServiceError::History { symbol, .. } if symbol == "MSFT"));
        assert!(err.to_string().starts_with("querying MSFT: "));
    }

    #[tokio::test]
    async fn test_invalid_history_is_skipped() {
        let mut store = MockStore::new();
        store
            .expect_symbols()
            .returning(|| Ok(vec!["AAPL".to_string(), "BAD".to_string(), "MSFT".to_string()]));
        store.expect_eod_history().returning(|symbol| match symbol {
            "BAD" => Ok(vec![PriceBar::new(day(6), -1.0, 5), PriceBar::new(day(7), 2.0, 5)]),
            "AAPL" => Ok(vec![PriceBar::new(day(6), 10.0, 5), PriceBar::new(day(7), 12.0, 6)]),
            _ => Ok(vec![PriceBar::new(day(6), 10.0, 5), PriceBar::new(day(7), 9.0, 4)]),
        });

        let service = AnalysisService::new(Arc::new(store));
        let result = service.analyze_on(day(8)).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.get("BAD").is_none());
        assert_eq!(result.rankings[0].symbol, "AAPL");
    }

    fn sqlx_error() -> stockrank_store::sqlx::Error {
        stockrank_store::sqlx::Error::PoolTimedOut
    }
}
