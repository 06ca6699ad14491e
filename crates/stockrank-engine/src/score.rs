//! Weighted composite score

use crate::normalize::NormalizedFactors;

/// Weight of normalized momentum
pub const MOMENTUM_WEIGHT: f64 = 0.4;
/// Weight of inverted normalized volatility
pub const STABILITY_WEIGHT: f64 = 0.3;
/// Weight of normalized volume trend
pub const VOLUME_TREND_WEIGHT: f64 = 0.3;

const _: () = assert!(MOMENTUM_WEIGHT + STABILITY_WEIGHT + VOLUME_TREND_WEIGHT == 1.0);

/// Weighted sum of the three factors, rounded to 2 decimals
pub fn composite(factors: &NormalizedFactors) -> f64 {
    round_cents(
        MOMENTUM_WEIGHT * factors.momentum
            + STABILITY_WEIGHT * factors.stability
            + VOLUME_TREND_WEIGHT * factors.volume_trend,
    )
}

/// Round to 2 decimal places, halves away from zero
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert_eq!(MOMENTUM_WEIGHT + STABILITY_WEIGHT + VOLUME_TREND_WEIGHT, 1.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(0.375), 0.38);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(0.5), 0.5);
        assert_eq!(round_cents(0.614_999), 0.61);
    }

    #[test]
    fn test_midpoint_everywhere_scores_half() {
        let f = NormalizedFactors {
            momentum: 0.5,
            stability: 0.5,
            volume_trend: 0.5,
        };
        assert_eq!(composite(&f), 0.5);
    }

    #[test]
    fn test_extremes() {
        let best = NormalizedFactors {
            momentum: 1.0,
            stability: 1.0,
            volume_trend: 1.0,
        };
        let worst = NormalizedFactors {
            momentum: 0.0,
            stability: 0.0,
            volume_trend: 0.0,
        };
        assert_eq!(composite(&best), 1.0);
        assert_eq!(composite(&worst), 0.0);
    }
}
