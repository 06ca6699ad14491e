//! Price bars and validated per-symbol histories

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading session (or intraday interval) for one symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64, volume: i64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Non-empty sequence of bars for one symbol, strictly ascending by date
///
/// Construction is the only validation point: once a `PriceHistory` exists
/// the ranking engine can assume it is non-empty, ordered, free of duplicate
/// dates and free of negative prices or volumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceHistory {
    bars: Vec<PriceBar>,
}

// Never empty, so no is_empty
#[allow(clippy::len_without_is_empty)]
impl PriceHistory {
    /// Validate and wrap a sequence of bars
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::EmptyHistory);
        }

        for bar in &bars {
            if !bar.close.is_finite() || bar.close < 0.0 {
                return Err(Error::InvalidValue {
                    date: bar.date,
                    field: "close",
                });
            }
            if bar.volume < 0 {
                return Err(Error::InvalidValue {
                    date: bar.date,
                    field: "volume",
                });
            }
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(Error::UnorderedHistory {
                previous: pair[0].date,
                current: pair[1].date,
            });
        }

        Ok(Self { bars })
    }

    /// All bars, oldest first
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Number of bars (always at least one)
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Oldest bar
    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    /// Most recent bar
    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn into_bars(self) -> Vec<PriceBar> {
        self.bars
    }
}

impl TryFrom<Vec<PriceBar>> for PriceHistory {
    type Error = Error;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Self::new(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_valid_history() {
        let history = PriceHistory::new(vec![
            PriceBar::new(day(1), 10.0, 100),
            PriceBar::new(day(4), 11.0, 200),
        ])
        .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.first().close, 10.0);
        assert_eq!(history.last().close, 11.0);
    }

    #[test]
    fn test_empty_history_rejected() {
        assert_eq!(PriceHistory::new(vec![]), Err(Error::EmptyHistory));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let err = PriceHistory::new(vec![
            PriceBar::new(day(1), 10.0, 100),
            PriceBar::new(day(1), 11.0, 200),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            Error::UnorderedHistory {
                previous: day(1),
                current: day(1),
            }
        );
    }

    #[test]
    fn test_descending_dates_rejected() {
        let err = PriceHistory::new(vec![
            PriceBar::new(day(5), 10.0, 100),
            PriceBar::new(day(2), 11.0, 200),
        ])
        .unwrap_err();

        assert!(matches!(err, Error::UnorderedHistory { .. }));
    }

    #[test]
    fn test_negative_values_rejected() {
        let err = PriceHistory::new(vec![PriceBar::new(day(1), 10.0, -5)]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidValue {
                date: day(1),
                field: "volume",
            }
        );

        let err = PriceHistory::new(vec![PriceBar::new(day(1), -1.0, 5)]).unwrap_err();
        assert_eq!(err.to_string(), "bar dated 2024-03-01 has an invalid close");

        assert!(PriceHistory::new(vec![PriceBar::new(day(1), f64::NAN, 5)]).is_err());
    }

    #[test]
    fn test_zero_close_is_allowed() {
        let history = PriceHistory::try_from(vec![PriceBar::new(day(1), 0.0, 0)]).unwrap();
        assert_eq!(history.into_bars().len(), 1);
    }
}
