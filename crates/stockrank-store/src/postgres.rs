//! Postgres-backed price store

use crate::error::{Result, StoreError};
use crate::schema;
use crate::store::PriceStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use stockrank_core::{EodPrice, IntradayPrice, PriceBar};
use tracing::{debug, info};
use url::Url;

/// Pool size used by [`PgPriceStore::connect`]
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, FromRow)]
struct HistoryRow {
    date: NaiveDate,
    close: f64,
    volume: i64,
}

/// Price store on a shared `PgPool`
#[derive(Debug, Clone)]
pub struct PgPriceStore {
    pool: PgPool,
}

/// Require TLS unless the URL already chooses an `sslmode`
pub fn normalize_database_url(raw: &str) -> Result<String> {
    let mut url = Url::parse(raw)?;
    if !url.query_pairs().any(|(key, _)| key == "sslmode") {
        url.query_pairs_mut().append_pair("sslmode", "require");
    }
    Ok(url.into())
}

impl PgPriceStore {
    /// Connect and verify the connection
    pub async fn connect(database_url: &str) -> Result<Self> {
        let url = normalize_database_url(database_url)?;
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&url)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        info!("connected to database");

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl PriceStore for PgPriceStore {
    async fn migrate(&self) -> Result<()> {
        for &(table, statement) in schema::MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|source| StoreError::Migration { table, source })?;
            debug!(table, "migration applied");
        }
        info!("database migrated");
        Ok(())
    }

    async fn upsert_eod(&self, price: &EodPrice) -> Result<()> {
        sqlx::query(schema::UPSERT_EOD)
            .bind(&price.symbol)
            .bind(price.date)
            .bind(price.open)
            .bind(price.high)
            .bind(price.low)
            .bind(price.close)
            .bind(price.volume)
            .bind(price.adj_close)
            .bind(&price.exchange)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_intraday(&self, price: &IntradayPrice) -> Result<()> {
        sqlx::query(schema::UPSERT_INTRADAY)
            .bind(&price.symbol)
            .bind(price.timestamp)
            .bind(&price.interval)
            .bind(price.open)
            .bind(price.high)
            .bind(price.low)
            .bind(price.close)
            .bind(price.volume)
            .bind(&price.exchange)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn symbols(&self) -> Result<Vec<String>> {
        let symbols: Vec<(String,)> = sqlx::query_as(schema::SELECT_SYMBOLS)
            .fetch_all(&self.pool)
            .await?;
        Ok(symbols.into_iter().map(|(s,)| s).collect())
    }

    async fn eod_history(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(schema::SELECT_EOD_HISTORY)
            .bind(symbol)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| PriceBar::new(r.date, r.close, r.volume))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sslmode_appended_when_missing() {
        let url = normalize_database_url("postgres://user:pw@db.example.com:5432/prices").unwrap();
        assert_eq!(url, "postgres://user:pw@db.example.com:5432/prices?sslmode=require");
    }

    #[test]
    fn test_sslmode_appended_after_existing_query() {
        let url = normalize_database_url("postgres://db.example.com/prices?application_name=rank")
            .unwrap();
        assert_eq!(
            url,
            "postgres://db.example.com/prices?application_name=rank&sslmode=require"
        );
    }

    #[test]
    fn test_explicit_sslmode_kept() {
        let raw = "postgres://localhost/prices?sslmode=disable";
        assert_eq!(normalize_database_url(raw).unwrap(), raw);
    }

    #[test]
    fn test_unparseable_url_rejected() {
        assert!(matches!(
            normalize_database_url("not a url"),
            Err(StoreError::InvalidUrl(_))
        ));
    }
}
