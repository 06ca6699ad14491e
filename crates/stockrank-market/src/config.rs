//! Configuration for the Marketstack client

use crate::error::{MarketError, Result};
use crate::retry::RetryPolicy;
use std::time::Duration;

/// Default API root; the free plan only serves plain HTTP
pub const DEFAULT_BASE_URL: &str = "http://api.marketstack.com/v1";

/// Largest page Marketstack will return
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Most symbols Marketstack accepts in one request
pub const MAX_SYMBOLS_PER_REQUEST: usize = 100;

/// Configuration for the Marketstack client
#[derive(Debug, Clone)]
pub struct MarketstackConfig {
    /// Access key sent as `access_key`
    pub api_key: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Rows requested per page
    pub page_limit: u32,

    /// Symbols joined into one request
    pub max_symbols_per_request: usize,

    /// Symbol batches in flight at once
    pub max_concurrent_requests: usize,

    /// Client-side request quota
    pub requests_per_minute: u32,

    /// Attempts per request, including the first
    pub max_attempts: u32,

    /// Initial backoff between attempts, doubled each retry
    pub retry_backoff_base: Duration,

    /// How long decoded pages stay cached; zero disables caching
    pub cache_ttl: Duration,

    /// Bar interval requested from the intraday endpoint
    pub intraday_interval: String,
}

impl Default for MarketstackConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            page_limit: MAX_PAGE_LIMIT,
            max_symbols_per_request: MAX_SYMBOLS_PER_REQUEST,
            max_concurrent_requests: 4,
            requests_per_minute: 60,
            max_attempts: 3,
            retry_backoff_base: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(300),
            intraday_interval: "10min".to_string(),
        }
    }
}

impl MarketstackConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketstackConfigBuilder {
        MarketstackConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(MarketError::Config(
                "Marketstack access key is required".to_string(),
            ));
        }

        reqwest::Url::parse(&self.base_url)
            .map_err(|e| MarketError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;

        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            return Err(MarketError::Config(format!(
                "page_limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        if self.max_symbols_per_request == 0 || self.max_symbols_per_request > MAX_SYMBOLS_PER_REQUEST
        {
            return Err(MarketError::Config(format!(
                "max_symbols_per_request must be between 1 and {MAX_SYMBOLS_PER_REQUEST}"
            )));
        }

        if self.max_concurrent_requests == 0 {
            return Err(MarketError::Config(
                "max_concurrent_requests must be greater than 0".to_string(),
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(MarketError::Config(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(MarketError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.intraday_interval.trim().is_empty() {
            return Err(MarketError::Config(
                "intraday_interval must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Retry policy derived from the attempt count and backoff base
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            self.retry_backoff_base,
            self.retry_backoff_base * 30,
            2.0,
        )
    }
}

/// Builder for MarketstackConfig
#[derive(Debug, Default)]
pub struct MarketstackConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    page_limit: Option<u32>,
    max_symbols_per_request: Option<usize>,
    max_concurrent_requests: Option<usize>,
    requests_per_minute: Option<u32>,
    max_attempts: Option<u32>,
    retry_backoff_base: Option<Duration>,
    cache_ttl: Option<Duration>,
    intraday_interval: Option<String>,
}

impl MarketstackConfigBuilder {
    /// Set the access key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Load the access key from `MARKETSTACK_API_KEY` if set
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("MARKETSTACK_API_KEY") {
            self.api_key = Some(key);
        }
        self
    }

    /// Set the API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set rows per page
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Set symbols per request
    pub fn max_symbols_per_request(mut self, n: usize) -> Self {
        self.max_symbols_per_request = Some(n);
        self
    }

    /// Set concurrent symbol batches
    pub fn max_concurrent_requests(mut self, n: usize) -> Self {
        self.max_concurrent_requests = Some(n);
        self
    }

    /// Set the client-side request quota
    pub fn requests_per_minute(mut self, n: u32) -> Self {
        self.requests_per_minute = Some(n);
        self
    }

    /// Set attempts per request
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the page cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set the intraday bar interval
    pub fn intraday_interval(mut self, interval: impl Into<String>) -> Self {
        self.intraday_interval = Some(interval.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketstackConfig> {
        let defaults = MarketstackConfig::default();

        let config = MarketstackConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            page_limit: self.page_limit.unwrap_or(defaults.page_limit),
            max_symbols_per_request: self
                .max_symbols_per_request
                .unwrap_or(defaults.max_symbols_per_request),
            max_concurrent_requests: self
                .max_concurrent_requests
                .unwrap_or(defaults.max_concurrent_requests),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            intraday_interval: self.intraday_interval.unwrap_or(defaults.intraday_interval),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MarketstackConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_limit, 1000);
        assert_eq!(config.intraday_interval, "10min");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        // No key yet
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = MarketstackConfig::builder()
            .api_key("key")
            .base_url("http://127.0.0.1:9000/v1/")
            .page_limit(50)
            .max_attempts(5)
            .build()
            .unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.page_limit, 50);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.max_symbols_per_request, 100);
    }

    #[test]
    fn test_validation_rejects_bad_limits() {
        assert!(MarketstackConfig::builder().api_key("k").page_limit(0).build().is_err());
        assert!(MarketstackConfig::builder().api_key("k").page_limit(5000).build().is_err());
        assert!(
            MarketstackConfig::builder()
                .api_key("k")
                .max_symbols_per_request(101)
                .build()
                .is_err()
        );
        assert!(MarketstackConfig::builder().api_key("k").max_attempts(0).build().is_err());
        assert!(MarketstackConfig::builder().api_key("k").base_url("not a url").build().is_err());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = MarketstackConfig {
            max_attempts: 4,
            retry_backoff_base: Duration::from_millis(200),
            ..Default::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.initial_backoff, Duration::from_millis(200));
        assert_eq!(policy.max_backoff, Duration::from_secs(6));
    }
}
