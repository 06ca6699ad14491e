//! In-process price store
//!
//! Same keys and ordering as the Postgres tables, held in `BTreeMap`s. Used
//! by tests and by `serve --in-memory` for local runs without a database.

use crate::error::Result;
use crate::store::PriceStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use stockrank_core::{EodPrice, IntradayPrice, PriceBar};
use tokio::sync::RwLock;

type EodKey = (String, NaiveDate);
type IntradayKey = (String, DateTime<Utc>, String);

#[derive(Debug, Default)]
struct Tables {
    eod: BTreeMap<EodKey, EodPrice>,
    intraday: BTreeMap<IntradayKey, IntradayPrice>,
}

/// Thread-safe in-memory price store; clones share the same tables
#[derive(Debug, Clone, Default)]
pub struct MemoryPriceStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored EOD rows
    pub async fn eod_len(&self) -> usize {
        self.tables.read().await.eod.len()
    }

    /// Number of stored intraday rows
    pub async fn intraday_len(&self) -> usize {
        self.tables.read().await.intraday.len()
    }

    /// Stored EOD row for `(symbol, date)`
    pub async fn eod_row(&self, symbol: &str, date: NaiveDate) -> Option<EodPrice> {
        self.tables
            .read()
            .await
            .eod
            .get(&(symbol.to_string(), date))
            .cloned()
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn upsert_eod(&self, price: &EodPrice) -> Result<()> {
        let key = (price.symbol.clone(), price.date);
        self.tables.write().await.eod.insert(key, price.clone());
        Ok(())
    }

    async fn upsert_intraday(&self, price: &IntradayPrice) -> Result<()> {
        let key = (price.symbol.clone(), price.timestamp, price.interval.clone());
        self.tables.write().await.intraday.insert(key, price.clone());
        Ok(())
    }

    async fn symbols(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().await;
        let mut symbols: Vec<String> = tables.eod.keys().map(|(s, _)| s.clone()).collect();
        // Keys sort by symbol first, so duplicates are adjacent
        symbols.dedup();
        Ok(symbols)
    }

    async fn eod_history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let tables = self.tables.read().await;
        Ok(tables
            .eod
            .values()
            .filter(|row| row.symbol == symbol)
            .map(EodPrice::to_bar)
            .collect())
    }
}
