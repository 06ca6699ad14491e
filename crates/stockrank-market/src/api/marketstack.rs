//! Marketstack API client

use crate::cache::{CacheKey, ResponseCache};
use crate::config::MarketstackConfig;
use crate::error::{MarketError, Result};
use crate::provider::MarketDataProvider;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use stockrank_core::{EodPrice, IntradayPrice};
use tracing::{debug, info, warn};

const PROVIDER: &str = "Marketstack";
const EOD_ENDPOINT: &str = "eod";
const INTRADAY_ENDPOINT: &str = "intraday";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Marketstack API client
#[derive(Debug, Clone)]
pub struct MarketstackClient {
    client: Client,
    config: MarketstackConfig,
    rate_limiter: SharedRateLimiter,
    retry: RetryPolicy,
    cache: ResponseCache,
}

/// One page of any list endpoint
#[derive(Debug, Deserialize)]
struct Page<R> {
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default = "Vec::new")]
    data: Vec<R>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct Pagination {
    #[serde(default)]
    total: u64,
}

/// Error object Marketstack returns in place of `data`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct EodRow {
    symbol: String,
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
    adj_close: Option<f64>,
    #[serde(default)]
    exchange: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IntradayRow {
    symbol: String,
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
    #[serde(default)]
    exchange: Option<String>,
}

impl EodRow {
    fn into_price(self) -> Result<EodPrice> {
        // Marketstack sends "2024-05-10T00:00:00+0000"; only the day matters
        let day = self.date.get(..10).unwrap_or(&self.date);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| MarketError::MalformedRow {
            symbol: self.symbol.clone(),
            field: "date",
            value: self.date.clone(),
        })?;
        let close = self.close.ok_or_else(|| MarketError::MalformedRow {
            symbol: self.symbol.clone(),
            field: "close",
            value: format!("null on {date}"),
        })?;

        Ok(EodPrice {
            date,
            open: self.open.unwrap_or_default(),
            high: self.high.unwrap_or_default(),
            low: self.low.unwrap_or_default(),
            close,
            volume: self.volume.unwrap_or_default() as i64,
            adj_close: self.adj_close.unwrap_or_default(),
            exchange: self.exchange.unwrap_or_default(),
            symbol: self.symbol,
        })
    }
}

impl IntradayRow {
    fn into_price(self, interval: &str) -> Result<IntradayPrice> {
        let timestamp = parse_timestamp(&self.date).ok_or_else(|| MarketError::MalformedRow {
            symbol: self.symbol.clone(),
            field: "date",
            value: self.date.clone(),
        })?;
        let close = self.close.ok_or_else(|| MarketError::MalformedRow {
            symbol: self.symbol.clone(),
            field: "close",
            value: format!("null on {}", self.date),
        })?;

        Ok(IntradayPrice {
            timestamp,
            interval: interval.to_string(),
            open: self.open.unwrap_or_default(),
            high: self.high.unwrap_or_default(),
            low: self.low.unwrap_or_default(),
            close,
            volume: self.volume.unwrap_or_default() as i64,
            exchange: self.exchange.unwrap_or_default(),
            symbol: self.symbol,
        })
    }
}

/// Converted rows; malformed ones are logged and dropped
fn keep_valid<T>(converted: impl IntoIterator<Item = Result<T>>) -> Vec<T> {
    converted
        .into_iter()
        .filter_map(|row| match row {
            Ok(price) => Some(price),
            Err(MarketError::MalformedRow { symbol, field, value }) => {
                warn!(%symbol, field, %value, "skipping malformed row");
                None
            }
            Err(e) => {
                warn!(error = %e, "skipping row");
                None
            }
        })
        .collect()
}

/// Accepts RFC 3339 and the colon-less offset Marketstack emits
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

impl MarketstackClient {
    /// Create a client from a validated configuration
    pub fn new(config: MarketstackConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder().timeout(config.request_timeout).build()?;
        let quota = Quota::per_minute(
            NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            retry: config.retry_policy(),
            cache: ResponseCache::new(config.cache_ttl),
            config,
        })
    }

    /// Create from `MARKETSTACK_API_KEY` with default settings
    pub fn from_env() -> Result<Self> {
        let config = MarketstackConfig::builder().with_env_api_key().build()?;
        Self::new(config)
    }

    /// Replace the retry policy derived from the configuration
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn config(&self) -> &MarketstackConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch every row of `endpoint` for `symbols`, batching and paginating
    async fn fetch_rows<R>(
        &self,
        endpoint: &'static str,
        symbols: &[String],
        from: NaiveDate,
        to: NaiveDate,
        extra: &[(&'static str, String)],
    ) -> Result<Vec<R>>
    where
        R: DeserializeOwned + Send,
    {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let batches: Vec<String> = symbols
            .chunks(self.config.max_symbols_per_request)
            .map(|chunk| chunk.join(","))
            .collect();
        debug!(endpoint, batches = batches.len(), %from, %to, "fetching symbol batches");

        let pages: Vec<Vec<R>> = stream::iter(batches)
            .map(|joined| self.fetch_all_pages(endpoint, joined, from, to, extra))
            .buffer_unordered(self.config.max_concurrent_requests)
            .try_collect()
            .await?;

        Ok(pages.into_iter().flatten().collect())
    }

    /// Follow offset pagination for one symbol batch
    async fn fetch_all_pages<R>(
        &self,
        endpoint: &'static str,
        symbols: String,
        from: NaiveDate,
        to: NaiveDate,
        extra: &[(&'static str, String)],
    ) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let mut rows = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let mut params: Vec<(&'static str, String)> = vec![
                ("symbols", symbols.clone()),
                ("date_from", from.format("%Y-%m-%d").to_string()),
                ("date_to", to.format("%Y-%m-%d").to_string()),
                ("limit", self.config.page_limit.to_string()),
                ("offset", offset.to_string()),
            ];
            params.extend(extra.iter().cloned());

            let page: Page<R> = self.fetch_page(endpoint, &params).await?;
            let received = page.data.len() as u64;
            rows.extend(page.data);

            // Advance by rows received, not by the echoed offset
            let Some(pagination) = page.pagination else {
                break;
            };
            offset += received;
            if received == 0 || offset >= pagination.total {
                break;
            }
        }

        Ok(rows)
    }

    /// One page, from cache when fresh
    async fn fetch_page<R>(&self, endpoint: &'static str, params: &[(&'static str, String)]) -> Result<Page<R>>
    where
        R: DeserializeOwned,
    {
        let key = CacheKey::new(endpoint, params.iter().map(|(name, value)| (*name, value.as_str())));
        if let Some(body) = self.cache.get(&key).await {
            return Ok(serde_json::from_value(body)?);
        }

        let body = self
            .retry
            .execute(endpoint, || self.request(endpoint, params))
            .await?;
        let page = serde_json::from_value(body.clone())?;
        self.cache.insert(key, body).await;

        Ok(page)
    }

    async fn request(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<serde_json::Value> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/{endpoint}", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("access_key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimitExceeded {
                provider: PROVIDER.to_string(),
            });
        }
        if status != StatusCode::OK {
            return Err(MarketError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        if body.get("error").is_some() {
            let ErrorBody { error } = serde_json::from_value(body)?;
            if error.code == "rate_limit_reached" {
                return Err(MarketError::RateLimitExceeded {
                    provider: PROVIDER.to_string(),
                });
            }
            return Err(MarketError::Api {
                code: error.code,
                message: error.message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl MarketDataProvider for MarketstackClient {
    async fn fetch_eod(
        &self,
        symbols: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<EodPrice>> {
        let rows: Vec<EodRow> = self.fetch_rows(EOD_ENDPOINT, symbols, from, to, &[]).await?;
        let prices = keep_valid(rows.into_iter().map(EodRow::into_price));

        info!(symbols = symbols.len(), rows = prices.len(), %from, %to, "fetched EOD prices");
        Ok(prices)
    }

    async fn fetch_intraday(
        &self,
        symbols: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<IntradayPrice>> {
        let interval = self.config.intraday_interval.as_str();
        let extra = [("interval", interval.to_string())];
        let rows: Vec<IntradayRow> = self
            .fetch_rows(INTRADAY_ENDPOINT, symbols, from, to, &extra)
            .await?;
        let prices = keep_valid(rows.into_iter().map(|row| row.into_price(interval)));

        info!(symbols = symbols.len(), rows = prices.len(), %from, %to, interval, "fetched intraday prices");
        Ok(prices)
    }
}
