//! Trading calendar helpers
//!
//! Weekends only; exchange holidays are not modelled.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Most recent weekday on or before `date`
pub fn last_trading_day(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}
