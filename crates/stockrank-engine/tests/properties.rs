//! Property tests for ranking invariants.
//!
//! Uses proptest to verify:
//! 1. Raw factors are always finite, whatever the closes and volumes
//! 2. Ranks are exactly 1..=N with non-increasing scores
//! 3. Every non-empty input symbol appears exactly once in the output
//! 4. Re-running on the same input yields the same ranking
//! 5. Scores stay inside [0, 1]

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeMap;
use stockrank_core::{PriceBar, PriceHistory};
use stockrank_engine::{RawFactors, analyze_on};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_close() -> impl Strategy<Value = f64> {
    prop_oneof![
        1 => Just(0.0),
        9 => (0.01..5_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
    ]
}

fn arb_volume() -> impl Strategy<Value = i64> {
    prop_oneof![1 => Just(0_i64), 9 => 0..50_000_000_i64]
}

fn arb_history() -> impl Strategy<Value = PriceHistory> {
    prop::collection::vec((arb_close(), arb_volume()), 1..40).prop_map(|points| {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = points
            .into_iter()
            .enumerate()
            .map(|(i, (close, volume))| PriceBar::new(start + Days::new(i as u64), close, volume))
            .collect();
        PriceHistory::new(bars).unwrap()
    })
}

fn arb_batch() -> impl Strategy<Value = BTreeMap<String, PriceHistory>> {
    prop::collection::btree_map("[A-Z]{1,5}", arb_history(), 0..25)
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

// ── 1. Finite factors ────────────────────────────────────────────────

proptest! {
    #[test]
    fn raw_factors_are_finite(history in arb_history()) {
        let f = RawFactors::extract(&history);
        prop_assert!(f.momentum.is_finite());
        prop_assert!(f.volatility.is_finite());
        prop_assert!(f.volume_trend.is_finite());
        prop_assert!(f.volatility >= 0.0);
        prop_assert!(f.volume_trend >= 0.0);
    }

    #[test]
    fn flat_history_has_no_momentum_or_volatility(
        close in 0.01..1_000.0_f64,
        len in 2..30_usize,
    ) {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = (0..len)
            .map(|i| PriceBar::new(start + Days::new(i as u64), close, 100))
            .collect();
        let f = RawFactors::extract(&PriceHistory::new(bars).unwrap());
        prop_assert_eq!(f.momentum, 0.0);
        prop_assert_eq!(f.volatility, 0.0);
    }
}

// ── 2–5. Ranking invariants ──────────────────────────────────────────

proptest! {
    #[test]
    fn ranks_are_dense_and_scores_non_increasing(batch in arb_batch()) {
        let result = analyze_on(&batch, run_date());

        let ranks: Vec<usize> = result.rankings.iter().map(|s| s.rank).collect();
        let expected: Vec<usize> = (1..=batch.len()).collect();
        prop_assert_eq!(ranks, expected);

        for pair in result.rankings.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].symbol < pair[1].symbol);
            }
        }
    }

    #[test]
    fn every_symbol_ranked_once(batch in arb_batch()) {
        let result = analyze_on(&batch, run_date());
        let mut symbols: Vec<&str> = result.rankings.iter().map(|s| s.symbol.as_str()).collect();
        symbols.sort_unstable();
        let inputs: Vec<&str> = batch.keys().map(String::as_str).collect();
        prop_assert_eq!(symbols, inputs);
    }

    #[test]
    fn analysis_is_deterministic(batch in arb_batch()) {
        prop_assert_eq!(analyze_on(&batch, run_date()), analyze_on(&batch, run_date()));
    }

    #[test]
    fn scores_are_in_unit_interval_with_two_decimals(batch in arb_batch()) {
        for s in analyze_on(&batch, run_date()).rankings {
            prop_assert!((0.0..=1.0).contains(&s.score));
            let cents = s.score * 100.0;
            prop_assert!((cents - cents.round()).abs() < 1e-9);
        }
    }
}

// ── Reference scenario ───────────────────────────────────────────────

/// A: (0.10, 0.02, 1.5), B: (0.05, 0.01, 1.0), C: (-0.02, 0.03, 0.8)
#[test]
fn reference_three_symbol_scenario_orders_a_b_c() {
    use stockrank_engine::{BatchRanges, composite};

    let raw = |momentum, volatility, volume_trend| RawFactors {
        momentum,
        volatility,
        volume_trend,
        latest_close: 1.0,
    };
    let batch = [raw(0.10, 0.02, 1.5), raw(0.05, 0.01, 1.0), raw(-0.02, 0.03, 0.8)];

    let ranges = BatchRanges::of(&batch).unwrap();
    let scores: Vec<f64> = batch.iter().map(|f| composite(&ranges.normalize(f))).collect();

    assert_eq!(scores, vec![0.85, 0.62, 0.0]);
    assert!(scores[0] > scores[1] && scores[1] > scores[2]);
}
