//! Ordering and dense rank assignment

use crate::result::SymbolScore;
use std::cmp::Ordering;

/// Sort by descending score, ties by ascending symbol, then number 1..=N
pub fn assign_ranks(scores: &mut [SymbolScore]) {
    scores.sort_by(compare);
    for (i, score) in scores.iter_mut().enumerate() {
        score.rank = i + 1;
    }
}

fn compare(a: &SymbolScore, b: &SymbolScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.symbol.cmp(&b.symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unranked(symbol: &str, score: f64) -> SymbolScore {
        SymbolScore {
            rank: 0,
            symbol: symbol.to_string(),
            score,
            momentum: 0.0,
            volatility: 0.0,
            volume_trend: 0.0,
            latest_close: 0.0,
        }
    }

    #[test]
    fn test_descending_order_and_dense_ranks() {
        let mut scores = vec![
            unranked("C", 0.10),
            unranked("A", 0.90),
            unranked("B", 0.45),
        ];
        assign_ranks(&mut scores);

        let order: Vec<(&str, usize)> = scores.iter().map(|s| (s.symbol.as_str(), s.rank)).collect();
        assert_eq!(order, vec![("A", 1), ("B", 2), ("C", 3)]);
    }

    #[test]
    fn test_ties_break_by_symbol() {
        let mut scores = vec![
            unranked("MSFT", 0.5),
            unranked("AAPL", 0.5),
            unranked("ZM", 0.7),
            unranked("GOOG", 0.5),
        ];
        assign_ranks(&mut scores);

        let symbols: Vec<&str> = scores.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ZM", "AAPL", "GOOG", "MSFT"]);
        assert_eq!(
            scores.iter().map(|s| s.rank).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_empty() {
        let mut scores: Vec<SymbolScore> = Vec::new();
        assign_ranks(&mut scores);
        assert!(scores.is_empty());
    }
}
