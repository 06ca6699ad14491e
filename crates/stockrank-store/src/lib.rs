//! Price persistence for stockrank
//!
//! [`PriceStore`] is the seam between the fetch jobs, which write provider
//! rows, and the analysis service, which reads close/volume histories back.
//! Two implementations ship:
//!
//! - [`PgPriceStore`]: Postgres via a `sqlx` pool, with idempotent upserts
//!   keyed by `(symbol, date)` and `(symbol, date, interval)`
//! - [`MemoryPriceStore`]: the same semantics over `BTreeMap`s

pub mod error;
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryPriceStore;
pub use postgres::{PgPriceStore, normalize_database_url};
pub use store::PriceStore;

pub use sqlx;
