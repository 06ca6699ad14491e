//! Market data client for stockrank
//!
//! This crate fetches end-of-day and intraday price bars from the
//! [Marketstack](https://marketstack.com) HTTP API. It includes:
//!
//! - A [`MarketDataProvider`] trait, the seam the jobs depend on
//! - [`MarketstackClient`], the HTTP implementation, which
//!   - splits large symbol lists into batches fetched concurrently
//!   - follows offset pagination until every row is read
//!   - waits on a per-minute request quota
//!   - retries transient failures with exponential backoff
//!   - caches decoded pages for a configurable TTL
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use stockrank_market::{MarketDataProvider, MarketstackClient, MarketstackConfig};
//!
//! # async fn example() -> stockrank_market::Result<()> {
//! let config = MarketstackConfig::builder()
//!     .api_key("your-access-key")
//!     .build()?;
//! let client = MarketstackClient::new(config)?;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
//! let prices = client
//!     .fetch_eod(&["AAPL".to_string(), "MSFT".to_string()], day, day)
//!     .await?;
//! println!("fetched {} rows", prices.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod retry;

pub use api::MarketstackClient;
pub use cache::{CacheKey, ResponseCache};
pub use config::{MarketstackConfig, MarketstackConfigBuilder};
pub use error::{MarketError, Result};
pub use provider::MarketDataProvider;
pub use retry::RetryPolicy;
