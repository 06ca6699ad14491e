//! Cross-sectional min-max normalization
//!
//! Ranges are computed over the whole batch before any single symbol is
//! rescaled, so this step cannot be fused into per-symbol extraction.

use crate::factors::RawFactors;
use crate::stats::Range;

/// Per-factor ranges observed across one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRanges {
    pub momentum: Range,
    pub volatility: Range,
    pub volume_trend: Range,
}

impl BatchRanges {
    /// Ranges over `batch`, `None` for an empty batch
    pub fn of(batch: &[RawFactors]) -> Option<Self> {
        Some(Self {
            momentum: Range::of(batch.iter().map(|f| f.momentum))?,
            volatility: Range::of(batch.iter().map(|f| f.volatility))?,
            volume_trend: Range::of(batch.iter().map(|f| f.volume_trend))?,
        })
    }

    /// Direction-adjusted normalized factors for one symbol
    pub fn normalize(&self, raw: &RawFactors) -> NormalizedFactors {
        NormalizedFactors {
            momentum: self.momentum.normalize(raw.momentum),
            stability: 1.0 - self.volatility.normalize(raw.volatility),
            volume_trend: self.volume_trend.normalize(raw.volume_trend),
        }
    }
}

/// Factors rescaled into [0, 1], all oriented so that higher is better
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFactors {
    pub momentum: f64,
    /// Inverted volatility: the calmest symbol in the batch scores 1
    pub stability: f64,
    pub volume_trend: f64,
}

/// Normalize a whole batch, preserving input order
pub fn normalize_batch(batch: &[RawFactors]) -> Vec<NormalizedFactors> {
    match BatchRanges::of(batch) {
        Some(ranges) => batch.iter().map(|raw| ranges.normalize(raw)).collect(),
        None => Vec::new(),
    }
}
