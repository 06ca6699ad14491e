//! Application configuration
//!
//! Secrets come from the environment; the symbol universe comes from a YAML
//! file:
//!
//! ```yaml
//! symbols:
//!   - AAPL
//!   - MSFT
//! ```

use crate::logging::LogFormat;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// Default location of the symbol list
pub const DEFAULT_CONFIG_PATH: &str = "config/stocks.yaml";

pub const DEFAULT_PORT: u16 = 8080;

/// Local hour of the daily fetch
pub const DEFAULT_EOD_RUN_HOUR: u32 = 22;

pub const ENV_API_KEY: &str = "MARKETSTACK_API_KEY";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_EOD_RUN_HOUR: &str = "EOD_RUN_HOUR";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

static SYMBOL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9.\-]{0,14}$").ok());

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} env var is required")]
    MissingEnv(&'static str),

    #[error("{name}={value} is invalid: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("reading stocks config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing stocks config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no symbols configured in {}", path.display())]
    NoSymbols { path: PathBuf },

    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
struct StocksFile {
    #[serde(default)]
    symbols: Vec<String>,
}

/// Everything the binary needs to start
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub database_url: String,
    /// Upper-cased, de-duplicated, in file order
    pub symbols: Vec<String>,
    pub port: u16,
    pub eod_run_hour: u32,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment and the YAML file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_parts(|name| std::env::var(name).ok(), &yaml, path)
    }

    /// Build from an env lookup and YAML text; `path` only labels errors
    pub fn from_parts<F>(lookup: F, yaml: &str, path: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };
        let api_key = required(ENV_API_KEY)?;
        let database_url = required(ENV_DATABASE_URL)?;

        let port = match lookup(ENV_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnv {
                    name: ENV_PORT,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_PORT,
        };

        let eod_run_hour = match lookup(ENV_EOD_RUN_HOUR) {
            Some(raw) => parse_hour(&raw)?,
            None => DEFAULT_EOD_RUN_HOUR,
        };

        let log_format = match lookup(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|reason| ConfigError::InvalidEnv {
                name: ENV_LOG_FORMAT,
                value: raw.clone(),
                reason,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            api_key,
            database_url,
            symbols: parse_symbols(yaml, path)?,
            port,
            eod_run_hour,
            log_format,
        })
    }
}

fn parse_hour(raw: &str) -> Result<u32> {
    let invalid = |reason: String| ConfigError::InvalidEnv {
        name: ENV_EOD_RUN_HOUR,
        value: raw.to_string(),
        reason,
    };
    let hour: u32 = raw.trim().parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if hour > 23 {
        return Err(invalid("hour must be between 0 and 23".to_string()));
    }
    Ok(hour)
}

/// Parse, normalise and validate the symbol list
pub fn parse_symbols(yaml: &str, path: &Path) -> Result<Vec<String>> {
    let file: StocksFile = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut symbols: Vec<String> = Vec::with_capacity(file.symbols.len());
    for raw in file.symbols {
        let symbol = raw.trim().to_ascii_uppercase();
        if !is_valid_symbol(&symbol) {
            return Err(ConfigError::InvalidSymbol(raw));
        }
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(ConfigError::NoSymbols {
            path: path.to_path_buf(),
        });
    }
    Ok(symbols)
}

/// Ticker shape accepted by the provider, e.g. `AAPL`, `BRK.B`, `RDS-A`
pub fn is_valid_symbol(symbol: &str) -> bool {
    SYMBOL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = "symbols:\n  - aapl\n  - MSFT\n  - brk.b\n  - AAPL\n";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_API_KEY, "key"),
            (ENV_DATABASE_URL, "postgres://localhost/prices"),
        ]
    }

    fn path() -> &'static Path {
        Path::new("config/stocks.yaml")
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_parts(env(&base_env()), YAML, path()).unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.eod_run_hour, 22);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.symbols, vec!["AAPL", "MSFT", "BRK.B"]);
    }

    #[test]
    fn test_overrides() {
        let mut vars = base_env();
        vars.extend([(ENV_PORT, "9000"), (ENV_EOD_RUN_HOUR, "6"), (ENV_LOG_FORMAT, "json")]);

        let config = AppConfig::from_parts(env(&vars), YAML, path()).unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.eod_run_hour, 6);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_api_key() {
        let err = AppConfig::from_parts(
            env(&[(ENV_DATABASE_URL, "postgres://localhost/prices")]),
            YAML,
            path(),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingEnv(ENV_API_KEY)));
        assert_eq!(err.to_string(), "MARKETSTACK_API_KEY env var is required");
    }

    #[test]
    fn test_blank_database_url_counts_as_missing() {
        let err = AppConfig::from_parts(
            env(&[(ENV_API_KEY, "key"), (ENV_DATABASE_URL, "  ")]),
            YAML,
            path(),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingEnv(ENV_DATABASE_URL)));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let mut vars = base_env();
        vars.push((ENV_EOD_RUN_HOUR, "24"));
        assert!(matches!(
            AppConfig::from_parts(env(&vars), YAML, path()),
            Err(ConfigError::InvalidEnv { name: ENV_EOD_RUN_HOUR, .. })
        ));

        let mut vars = base_env();
        vars.push((ENV_PORT, "http"));
        assert!(matches!(
            AppConfig::from_parts(env(&vars), YAML, path()),
            Err(ConfigError::InvalidEnv { name: ENV_PORT, .. })
        ));
    }

    #[test]
    fn test_empty_symbol_list() {
        let err = parse_symbols("symbols: []\n", path()).unwrap_err();
        assert_eq!(err.to_string(), "no symbols configured in config/stocks.yaml");

        assert!(matches!(
            parse_symbols("other: 1\n", path()),
            Err(ConfigError::NoSymbols { .. })
        ));
    }

    #[test]
    fn test_bad_yaml_and_bad_symbol() {
        assert!(matches!(
            parse_symbols("symbols: [unterminated", path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            parse_symbols("symbols:\n  - 'AA PL'\n", path()),
            Err(ConfigError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_symbol_shapes() {
        for ok in ["AAPL", "BRK.B", "RDS-A", "7203.XTKS"] {
            assert!(is_valid_symbol(ok), "{ok}");
        }
        for bad in ["", "aapl", ".X", "A B", "ABCDEFGHIJKLMNOP"] {
            assert!(!is_valid_symbol(bad), "{bad}");
        }
    }
}
