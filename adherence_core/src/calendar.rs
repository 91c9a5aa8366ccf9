//! Pure calendar helpers shared by the schedule resolver and the
//! aggregation code.
//!
//! Every date comparison in the core goes through `day_key`; there is no
//! timezone handling here beyond taking the caller's local calendar day
//! at face value.

use crate::WeekdayCode;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

/// Weekday code for a date.
pub fn weekday_code(date: NaiveDate) -> WeekdayCode {
    WeekdayCode::from(date.weekday())
}

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date. Returns None for anything
/// else; stale or malformed stored values are ignored by comparison, not
/// treated as errors.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Number of days in a month, or None for an invalid year/month pair.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next_first - first).num_days() as u32)
}

/// Column index (Sunday = 0) of the first day of a month, used by
/// calendar grids to pad the leading week.
pub fn start_of_week_offset(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.weekday().num_days_from_sunday())
}

/// Minutes elapsed since local midnight.
pub fn minutes_since_midnight(time: NaiveTime) -> i64 {
    (time - NaiveTime::MIN).num_minutes()
}

/// All days from `start` through `end` inclusive. Empty when the range is
/// inverted.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// The Sunday-through-Saturday week containing `date`.
pub fn week_starting_sunday(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = date.weekday().num_days_from_sunday() as i64;
    let start = date - Duration::days(back);
    (start, start + Duration::days(6))
}

/// First and last day of a month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?;
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_weekday_codes() {
        // 2024-01-07 was a Sunday
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(weekday_code(sunday), WeekdayCode::Su);
        assert_eq!(weekday_code(sunday.succ_opt().unwrap()), WeekdayCode::M);
        assert_eq!(
            weekday_code(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()),
            WeekdayCode::Sa
        );
    }

    #[test]
    fn test_day_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(day_key(date), "2024-03-05");
        assert_eq!(parse_day_key("2024-03-05"), Some(date));
        assert_eq!(parse_day_key("03/05/2024"), None);
        assert_eq!(parse_day_key(""), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29)); // leap year
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_start_of_week_offset() {
        // September 2024 starts on a Sunday, October on a Tuesday
        assert_eq!(start_of_week_offset(2024, 9), Some(0));
        assert_eq!(start_of_week_offset(2024, 10), Some(2));
    }

    #[test]
    fn test_minutes_since_midnight() {
        assert_eq!(
            minutes_since_midnight(NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
            0
        );
        assert_eq!(
            minutes_since_midnight(NaiveTime::from_hms_opt(9, 15, 0).unwrap()),
            9 * 60 + 15
        );
        assert_eq!(
            minutes_since_midnight(NaiveTime::from_hms_opt(23, 59, 0).unwrap()),
            1439
        );
    }

    #[test]
    fn test_days_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let days = days_inclusive(start, end);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], start);
        assert_eq!(days[3], end);

        // Single-day and inverted windows
        assert_eq!(days_inclusive(start, start).len(), 1);
        assert!(days_inclusive(end, start).is_empty());
    }

    #[test]
    fn test_week_starting_sunday() {
        // 2024-09-18 was a Wednesday; its week runs Sep 15 (Sun) - 21 (Sat)
        let wed = NaiveDate::from_ymd_opt(2024, 9, 18).unwrap();
        let (start, end) = week_starting_sunday(wed);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 9, 15).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 9, 21).unwrap());
        assert_eq!(start.weekday(), Weekday::Sun);

        // A Sunday is its own week start
        let (start, _) = week_starting_sunday(start);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 9, 15).unwrap());
    }

    #[test]
    fn test_month_bounds() {
        let (first, last) = month_bounds(2024, 2).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }
}
