#![forbid(unsafe_code)]

//! Core domain model and business logic for the PillPet companion app.
//!
//! This crate provides:
//! - Domain types (medications, schedules, journal entries)
//! - Calendar utilities and the schedule resolver
//! - Completion ledger over the device-local flag store
//! - Adherence calculation (daily and windowed)
//! - Health score engine for the virtual pet
//! - Mood aggregation and dashboard assembly
//!
//! The UI layers call into this crate; the crate itself owns no screens,
//! no network client and no CLI. External storage is reached through the
//! `RecordStore` and `FlagStore` traits.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod calendar;
pub mod schedule;
pub mod store;
pub mod ledger;
pub mod adherence;
pub mod health;
pub mod mood;
pub mod dashboard;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{FlagStore, MemoryFlagStore, MemoryRecordStore, RecordStore};
pub use ledger::CompletionLedger;
pub use schedule::{is_due_today, is_overdue};
pub use adherence::{daily_adherence, monthly_adherence, weekly_adherence, windowed_adherence};
pub use health::{DayOutcome, DayUpdate, HealthEngine};
pub use mood::{color_band, mood_by_day, windowed_mood_average, MoodBand};
pub use dashboard::{Dashboard, DayCell, MonthOverview};
