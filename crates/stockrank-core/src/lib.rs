//! Core domain types for stockrank
//!
//! This crate defines the value types shared by every other crate in the
//! workspace: the provider rows that get fetched and persisted, the compact
//! `PriceBar` the ranking engine consumes, and the validated `PriceHistory`
//! wrapper that guarantees the engine's input contract.

pub mod bar;
pub mod calendar;
pub mod error;
pub mod price;

pub use bar::{PriceBar, PriceHistory};
pub use calendar::last_trading_day;
pub use error::{Error, Result};
pub use price::{EodPrice, IntradayPrice};
