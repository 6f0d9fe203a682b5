//! # Calendar Normalization
//!
//! Multi-year line charts overlay every year on one x-axis. Real years have
//! either 365 or 366 days, so each date is re-expressed as the day-of-year it
//! would have in a fixed reference leap year. Non-leap years therefore skip
//! ordinal 60 (Feb 29) and end on 366, which keeps March onwards aligned
//! across all years.
//!
//! This is an approximation: in a non-leap year, March 1 lands on ordinal 61
//! rather than directly after Feb 28.

use chrono::{Datelike, NaiveDate};

/// Reference leap year used for every conversion.
pub const REFERENCE_LEAP_YEAR: i32 = 2024;

/// Number of slots on a normalized year axis.
pub const DAYS_IN_LEAP_YEAR: u32 = 366;

/// Ordinal (1..=366) of `date`'s month/day within [`REFERENCE_LEAP_YEAR`].
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use songchart::calendar::leap_year_ordinal;
///
/// let dec31 = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
/// assert_eq!(leap_year_ordinal(dec31), 366);
/// ```
pub fn leap_year_ordinal(date: NaiveDate) -> u32 {
    // Every month/day pair exists in a leap year, Feb 29 included.
    NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, date.month(), date.day())
        .map(|d| d.ordinal())
        .unwrap_or(DAYS_IN_LEAP_YEAR)
}

/// Ordinal of the first day of `month` (1..=12) on the normalized axis.
pub fn month_start_ordinal(month: u32) -> u32 {
    NaiveDate::from_ymd_opt(REFERENCE_LEAP_YEAR, month, 1)
        .map(leap_year_ordinal)
        .unwrap_or(1)
}

/// A labelled position on a normalized year axis.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthTick {
    /// Leap-year ordinal the tick sits on
    pub ordinal: u32,
    pub label: String,
}

/// Month-boundary ticks: `1/1`, `2/1`, ..., `12/1`, then `12/31` closing the year.
pub fn month_ticks() -> Vec<MonthTick> {
    let mut ticks: Vec<MonthTick> = (1..=12)
        .map(|month| MonthTick {
            ordinal: month_start_ordinal(month),
            label: format!("{}/1", month),
        })
        .collect();
    ticks.push(MonthTick {
        ordinal: DAYS_IN_LEAP_YEAR,
        label: "12/31".to_string(),
    });
    ticks
}

/// True when `next` is the calendar day straight after `previous`.
pub fn is_next_day(previous: NaiveDate, next: NaiveDate) -> bool {
    previous.succ_opt() == Some(next)
}
