//! Core domain types for the PillPet adherence engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medications and their reminder schedules
//! - Weekday codes used by the schedule resolver
//! - Journal entries consumed by the mood aggregator
//! - Derived adherence results

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

// ============================================================================
// Schedule Types
// ============================================================================

/// Two-letter weekday code as stored on medication records.
///
/// The record store persists reminder days as the strings
/// `Su M Tu W Th F Sa`; the serde renames keep the wire form intact.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeekdayCode {
    #[serde(rename = "Su")]
    Su,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "Tu")]
    Tu,
    #[serde(rename = "W")]
    W,
    #[serde(rename = "Th")]
    Th,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "Sa")]
    Sa,
}

impl WeekdayCode {
    /// The string form used as a storage value and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayCode::Su => "Su",
            WeekdayCode::M => "M",
            WeekdayCode::Tu => "Tu",
            WeekdayCode::W => "W",
            WeekdayCode::Th => "Th",
            WeekdayCode::F => "F",
            WeekdayCode::Sa => "Sa",
        }
    }
}

impl From<Weekday> for WeekdayCode {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => WeekdayCode::Su,
            Weekday::Mon => WeekdayCode::M,
            Weekday::Tue => WeekdayCode::Tu,
            Weekday::Wed => WeekdayCode::W,
            Weekday::Thu => WeekdayCode::Th,
            Weekday::Fri => WeekdayCode::F,
            Weekday::Sat => WeekdayCode::Sa,
        }
    }
}

// ============================================================================
// Medication Types
// ============================================================================

/// A medication record as held by the external record store.
///
/// The core treats medications as read-mostly input; create/edit/delete
/// flows live in the UI and talk to the record store directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Medication {
    /// Opaque identifier owned by the record store.
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub notes: String,
    /// Weekday codes on which this medication is due. Empty means every day.
    #[serde(default)]
    pub reminder_days: Vec<WeekdayCode>,
    /// Reminder times as `HH:MM` 24h strings, in the order the user entered
    /// them. Kept as strings because the record store holds free text;
    /// validation happens at the schedule resolver boundary.
    #[serde(default)]
    pub reminder_times: Vec<String>,
}

// ============================================================================
// Journal Types
// ============================================================================

/// A journal entry consumed read-only by the mood aggregator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    /// Mood on a 0-10 scale.
    pub mood_scale: f64,
    pub response: String,
    pub prompt_id: Option<String>,
}

// ============================================================================
// Derived Adherence Types
// ============================================================================

/// Adherence for a single calendar day. Derived, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyAdherence {
    pub date: NaiveDate,
    pub due_count: usize,
    pub taken_count: usize,
    /// `taken_count / due_count`, or 0 when nothing is due. Always in [0, 1].
    pub ratio: f64,
}

impl DailyAdherence {
    /// A zeroed result for a day, used when storage is unreachable and the
    /// dashboard should degrade rather than fail.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            due_count: 0,
            taken_count: 0,
            ratio: 0.0,
        }
    }
}

/// Adherence aggregated over an inclusive day window.
///
/// Days on which no medication was due are skipped entirely; they are not
/// averaged in as 0%.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowedAdherence {
    /// Mean of the included days' ratios, as a percentage rounded to the
    /// nearest integer. 0 when no day in the window had due medications.
    pub mean_ratio_percent: u32,
    /// How many days in the window actually had due medications.
    pub days_with_due_medications: usize,
}
