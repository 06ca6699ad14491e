//! Per-symbol raw factor extraction
//!
//! Pure functions of a single `PriceHistory`; nothing here looks across
//! symbols. Every zero denominator falls back to 0 so that the factors are
//! always finite.

use crate::stats::population_stddev;
use stockrank_core::{PriceBar, PriceHistory};

/// Number of most recent bars averaged for the volume trend
pub const RECENT_VOLUME_WINDOW: usize = 5;

/// Raw (un-normalized) factors for one symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFactors {
    /// Fractional return from the oldest to the latest close
    pub momentum: f64,
    /// Population stddev of bar-over-bar fractional returns
    pub volatility: f64,
    /// Recent mean volume over full-period mean volume
    pub volume_trend: f64,
    /// Close of the most recent bar
    pub latest_close: f64,
}

impl RawFactors {
    /// Extract all raw factors from one history
    pub fn extract(history: &PriceHistory) -> Self {
        let bars = history.bars();
        Self {
            momentum: momentum(bars),
            volatility: volatility(bars),
            volume_trend: volume_trend(bars),
            latest_close: history.last().close,
        }
    }
}

fn momentum(bars: &[PriceBar]) -> f64 {
    let (Some(oldest), Some(latest)) = (bars.first(), bars.last()) else {
        return 0.0;
    };
    if oldest.close == 0.0 {
        return 0.0;
    }
    (latest.close - oldest.close) / oldest.close
}

/// Intervals whose previous close is zero are skipped, not counted as 0
fn daily_returns(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

fn volatility(bars: &[PriceBar]) -> f64 {
    if bars.len() < 2 {
        return 0.0;
    }
    population_stddev(&daily_returns(bars))
}

fn average_volume(bars: &[PriceBar]) -> f64 {
    if bars.is_empty() {
        return 0.0;
    }
    let total: i128 = bars.iter().map(|b| i128::from(b.volume)).sum();
    total as f64 / bars.len() as f64
}

fn volume_trend(bars: &[PriceBar]) -> f64 {
    let overall = average_volume(bars);
    if overall <= 0.0 {
        return 0.0;
    }
    let recent_n = RECENT_VOLUME_WINDOW.min(bars.len());
    average_volume(&bars[bars.len() - recent_n..]) / overall
}
