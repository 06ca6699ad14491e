//! Cross-sectional ranking engine for stockrank
//!
//! Turns a batch of per-symbol price histories into one ordered leaderboard.
//! The computation is a strict top-down pipeline, run from scratch on every
//! call:
//!
//! 1. **Extract** raw factors per symbol ([`RawFactors::extract`]): momentum,
//!    volatility of returns, and volume trend.
//! 2. **Normalize** each factor across the whole batch with min-max scaling
//!    ([`normalize_batch`]); volatility is inverted so that higher is always
//!    better.
//! 3. **Score** with fixed weights 0.4 / 0.3 / 0.3 and round to 2 decimals
//!    ([`composite`]).
//! 4. **Rank** by descending score, ties by ascending symbol
//!    ([`assign_ranks`]).
//!
//! The engine is pure and synchronous: no I/O, no shared state, safe to call
//! concurrently with independent inputs.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use stockrank_core::{PriceBar, PriceHistory};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
//! let mut histories = BTreeMap::new();
//! histories.insert(
//!     "AAPL".to_string(),
//!     PriceHistory::new(vec![PriceBar::new(d(6), 100.0, 10), PriceBar::new(d(7), 104.0, 12)]).unwrap(),
//! );
//! histories.insert(
//!     "MSFT".to_string(),
//!     PriceHistory::new(vec![PriceBar::new(d(6), 300.0, 10), PriceBar::new(d(7), 297.0, 9)]).unwrap(),
//! );
//!
//! let result = stockrank_engine::analyze_on(&histories, d(8));
//! assert_eq!(result.rankings[0].symbol, "AAPL");
//! assert_eq!(result.rankings[0].rank, 1);
//! ```

pub mod factors;
pub mod normalize;
pub mod rank;
pub mod result;
pub mod score;
pub mod stats;

pub use factors::RawFactors;
pub use normalize::{BatchRanges, NormalizedFactors, normalize_batch};
pub use rank::assign_ranks;
pub use result::{AnalysisResult, SymbolScore};
pub use score::{MOMENTUM_WEIGHT, STABILITY_WEIGHT, VOLUME_TREND_WEIGHT, composite};

use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use stockrank_core::PriceHistory;
use tracing::debug;

/// Rank `histories`, stamping the result with today's local date
pub fn analyze(histories: &BTreeMap<String, PriceHistory>) -> AnalysisResult {
    analyze_on(histories, Local::now().date_naive())
}

/// Rank `histories`, stamping the result with `date`
pub fn analyze_on(histories: &BTreeMap<String, PriceHistory>, date: NaiveDate) -> AnalysisResult {
    // Pass 1: every symbol's raw factors must exist before any can be normalized
    let raw: Vec<(&str, RawFactors)> = histories
        .iter()
        .map(|(symbol, history)| (symbol.as_str(), RawFactors::extract(history)))
        .collect();

    let Some(ranges) = BatchRanges::of(&raw.iter().map(|(_, f)| *f).collect::<Vec<_>>()) else {
        return AnalysisResult::empty(date);
    };
    debug!(symbols = raw.len(), ?ranges, "computed batch factor ranges");

    // Pass 2: normalize against the batch ranges and score
    let mut rankings: Vec<SymbolScore> = raw
        .into_iter()
        .map(|(symbol, f)| SymbolScore {
            rank: 0,
            symbol: symbol.to_string(),
            score: composite(&ranges.normalize(&f)),
            momentum: f.momentum,
            volatility: f.volatility,
            volume_trend: f.volume_trend,
            latest_close: f.latest_close,
        })
        .collect();

    assign_ranks(&mut rankings);

    AnalysisResult { date, rankings }
}
