//! API clients for market data providers

pub mod marketstack;

pub use marketstack::MarketstackClient;
