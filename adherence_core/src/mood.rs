//! Mood aggregator: maps journal entries onto calendar days and rolls
//! them up into window averages and calendar color bands.

use crate::JournalEntry;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Calendar-cell color band for a mood value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoodBand {
    Low,
    Mid,
    High,
}

/// Band thresholds: below 3.3 is low, above 6.6 is high, boundary
/// values fall in the middle band.
pub fn color_band(mood: f64) -> MoodBand {
    if mood < 3.3 {
        MoodBand::Low
    } else if mood > 6.6 {
        MoodBand::High
    } else {
        MoodBand::Mid
    }
}

/// Fold journal entries into a per-day mood map.
///
/// When a day has more than one entry the last-processed one wins.
/// That matches what the app has always shown; there is no defined
/// merge rule for multiple entries on one day.
pub fn mood_by_day(entries: &[JournalEntry]) -> BTreeMap<NaiveDate, f64> {
    let mut map = BTreeMap::new();
    for entry in entries {
        map.insert(entry.date, entry.mood_scale);
    }
    map
}

/// Mean mood over `start..=end`, rounded to one decimal.
///
/// None when no entry falls inside the window; an empty window is never
/// reported as a 0 mood.
pub fn windowed_mood_average(
    moods: &BTreeMap<NaiveDate, f64>,
    start: NaiveDate,
    end: NaiveDate,
) -> Option<f64> {
    if start > end {
        return None;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for (_, mood) in moods.range(start..=end) {
        sum += mood;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(((sum / count as f64) * 10.0).round() / 10.0)
}
