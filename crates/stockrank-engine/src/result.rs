//! Engine output types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolScore {
    pub rank: usize,
    pub symbol: String,
    pub score: f64,
    pub momentum: f64,
    pub volatility: f64,
    pub volume_trend: f64,
    pub latest_close: f64,
}

/// Full ranking produced by one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Date the computation ran, not the date of any bar
    pub date: NaiveDate,
    pub rankings: Vec<SymbolScore>,
}

impl AnalysisResult {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            rankings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    /// Score row for `symbol`, if it was ranked
    pub fn get(&self, symbol: &str) -> Option<&SymbolScore> {
        self.rankings.iter().find(|s| s.symbol == symbol)
    }
}
