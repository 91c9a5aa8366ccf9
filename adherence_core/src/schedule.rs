//! Schedule resolver: decides whether a medication is due on a day and
//! whether a due dose is overdue past the grace period.
//!
//! Pure functions of the medication record and the current instant; no
//! persisted state lives here.

use crate::calendar::{minutes_since_midnight, weekday_code};
use crate::Medication;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Whether a medication is due on a calendar day.
///
/// Due iff `reminder_days` is empty (take every day) or contains the
/// day's weekday code.
pub fn is_due_today(med: &Medication, date: NaiveDate) -> bool {
    if med.reminder_days.is_empty() {
        return true;
    }
    med.reminder_days.contains(&weekday_code(date))
}

/// Parse a reminder time in `HH:MM` 24h form.
///
/// Malformed strings are a data-quality problem on the medication record,
/// not a hard error: they are logged and the time is dropped.
pub fn parse_reminder_time(med_name: &str, value: &str) -> Option<NaiveTime> {
    match NaiveTime::parse_from_str(value, "%H:%M") {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::warn!(
                "Ignoring malformed reminder time {:?} on medication {:?}: {}",
                value,
                med_name,
                e
            );
            None
        }
    }
}

/// The medication's valid reminder times; malformed entries are dropped.
fn valid_reminder_times(med: &Medication) -> Vec<NaiveTime> {
    med.reminder_times
        .iter()
        .filter_map(|raw| parse_reminder_time(&med.name, raw))
        .collect()
}

/// Whether a due dose has gone past its reminder time plus the grace
/// period without being marked done.
///
/// Any-match policy: a medication with several reminder times counts as
/// overdue as soon as one of them is missed. Completion is tracked per
/// medication per day, not per time slot, so there is no way to express
/// "took the morning dose but not the evening one"; the first missed
/// slot flips the whole medication.
///
/// Never overdue when the medication has no (valid) reminder times or is
/// not due today.
pub fn is_overdue(med: &Medication, now: NaiveDateTime, grace_minutes: i64) -> bool {
    if !is_due_today(med, now.date()) {
        return false;
    }

    let times = valid_reminder_times(med);
    if times.is_empty() {
        return false;
    }

    let now_minutes = minutes_since_midnight(now.time());
    times
        .iter()
        .any(|t| now_minutes > minutes_since_midnight(*t) + grace_minutes)
}
