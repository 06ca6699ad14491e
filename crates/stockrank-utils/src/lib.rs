//! Shared utilities for stockrank
//!
//! Logging setup and application configuration used by the binary and the
//! service layer.

pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_PATH};
pub use logging::{LogFormat, init_tracing};
