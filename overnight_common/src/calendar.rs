//! Trading-day arithmetic.
//!
//! Only weekends are skipped; exchange holidays are not modelled.

use chrono::{Datelike, Days, NaiveDate, Weekday};

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The last weekday strictly before `today`.
pub fn previous_trading_day(today: NaiveDate) -> NaiveDate {
    let mut day = today;
    loop {
        day = match day.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => return day,
        };
        if !is_weekend(day) {
            return day;
        }
    }
}
