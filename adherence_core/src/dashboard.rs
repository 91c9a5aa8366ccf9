//! Read-side assembly for the calendar/dashboard screen.
//!
//! Joins the adherence calculator and the mood aggregator into one
//! month-shaped view. Storage failures degrade to zeroed or empty
//! values so the screen renders with last-known or blank cells instead
//! of blocking on an error.

use crate::adherence::{daily_adherence, monthly_adherence};
use crate::calendar::month_bounds;
use crate::ledger::CompletionLedger;
use crate::mood::{color_band, mood_by_day, windowed_mood_average, MoodBand};
use crate::store::{FlagStore, RecordStore};
use crate::{DailyAdherence, JournalEntry, Medication, WindowedAdherence};
use chrono::NaiveDate;
use std::sync::Arc;

/// One calendar-grid day. Grid padding (leading blanks from
/// `start_of_week_offset`) is the UI's concern; only real days appear
/// here.
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub mood: Option<f64>,
    pub band: Option<MoodBand>,
}

/// Everything the dashboard screen needs for one month.
#[derive(Clone, Debug)]
pub struct MonthOverview {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<DayCell>,
    /// Mean mood over the month, when any entry exists.
    pub mean_mood: Option<f64>,
    /// Month-wide adherence (days with nothing due skipped).
    pub month_adherence: WindowedAdherence,
    /// Today's due/taken bar shown under the calendar.
    pub today_adherence: DailyAdherence,
}

pub struct Dashboard {
    user_id: String,
    records: Arc<dyn RecordStore>,
    ledger: CompletionLedger,
}

impl Dashboard {
    pub fn new(
        user_id: impl Into<String>,
        records: Arc<dyn RecordStore>,
        flags: Arc<dyn FlagStore>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            records,
            ledger: CompletionLedger::new(flags),
        }
    }

    /// Assemble the month view. Never fails: an unreachable store logs a
    /// warning and the affected section comes back zeroed or empty.
    pub async fn month_overview(&self, today: NaiveDate, year: i32, month: u32) -> MonthOverview {
        let meds = self.medications_or_empty().await;
        let entries = self.journal_or_empty().await;
        let moods = mood_by_day(&entries);

        let cells = match month_bounds(year, month) {
            Some((first, last)) => crate::calendar::days_inclusive(first, last)
                .into_iter()
                .map(|date| {
                    let mood = moods.get(&date).copied();
                    DayCell {
                        date,
                        mood,
                        band: mood.map(color_band),
                    }
                })
                .collect(),
            None => {
                tracing::warn!("Invalid month {}-{} requested", year, month);
                Vec::new()
            }
        };

        let mean_mood = month_bounds(year, month)
            .and_then(|(first, last)| windowed_mood_average(&moods, first, last));

        let month_adherence = match monthly_adherence(&meds, year, month, &self.ledger).await {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!("Monthly adherence unavailable: {}", e);
                WindowedAdherence::default()
            }
        };

        let today_adherence = match daily_adherence(&meds, today, &self.ledger).await {
            Ok(daily) => daily,
            Err(e) => {
                tracing::warn!("Today's adherence unavailable: {}", e);
                DailyAdherence::empty(today)
            }
        };

        MonthOverview {
            year,
            month,
            cells,
            mean_mood,
            month_adherence,
            today_adherence,
        }
    }

    async fn medications_or_empty(&self) -> Vec<Medication> {
        match self.records.list_medications(&self.user_id).await {
            Ok(meds) => meds,
            Err(e) => {
                tracing::warn!("Medications unavailable: {}", e);
                Vec::new()
            }
        }
    }

    async fn journal_or_empty(&self) -> Vec<JournalEntry> {
        match self.records.list_journal_entries(&self.user_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Journal entries unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
