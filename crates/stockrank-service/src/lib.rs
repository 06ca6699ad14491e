//! Service layer for stockrank
//!
//! Wires the engine, the market-data client and the price store together:
//!
//! - [`AnalysisService`] loads every stored history and ranks the batch
//! - [`EodJob`] and [`IntradayJob`] fetch provider rows and upsert them
//! - [`spawn_daily`] runs a job immediately and then once a day
//! - [`router`] serves `GET /analysis` and `GET /health`

pub mod analysis;
pub mod api;
pub mod error;
pub mod jobs;

pub use analysis::AnalysisService;
pub use api::{AppState, router};
pub use error::{Result, ServiceError};
pub use jobs::{EodJob, IntradayJob, Job, JobReport, next_run_after, spawn_daily};
