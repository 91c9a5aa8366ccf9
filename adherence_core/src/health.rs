//! Health score engine for the user's virtual pet.
//!
//! The score is a single 0-100 integer on the user record, moved once
//! per calendar day by that day's adherence ratio. The engine owns
//! exactly-once semantics per day: the trigger (a periodic tick or an
//! app-foreground resume) is at-least-once and imprecise, so a
//! persisted last-updated-day guard decides whether a transition fires.
//!
//! The source app polled the wall clock for an exact 23:59 match, which
//! silently skipped days whenever the app was backgrounded at that
//! minute. Here `on_tick` instead catches up every fully elapsed day
//! since the guard before considering today, so missed ticks are
//! recovered the next time the engine runs at all.

use crate::adherence::daily_adherence;
use crate::calendar::{day_key, days_inclusive, parse_day_key};
use crate::config::Config;
use crate::ledger::CompletionLedger;
use crate::store::{FlagStore, RecordStore};
use crate::{DailyAdherence, Medication, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Flag store key holding the last day the score was updated for.
const LAST_UPDATED_KEY: &str = "health:last_updated_day";

/// What happened when the engine considered a day.
#[derive(Clone, Debug, PartialEq)]
pub enum DayOutcome {
    /// No medication was due, so no transition fires. The day is still
    /// accounted for by the guard.
    NothingDue,
    /// The score moved (or was pinned by the clamp).
    Updated {
        previous: i32,
        new: i32,
        adherence: DailyAdherence,
    },
    /// The guard shows this day was already applied; no-op.
    AlreadyApplied,
}

/// One day's result from a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct DayUpdate {
    pub date: NaiveDate,
    pub outcome: DayOutcome,
}

pub struct HealthEngine {
    user_id: String,
    records: Arc<dyn RecordStore>,
    flags: Arc<dyn FlagStore>,
    ledger: CompletionLedger,
    config: Config,
    /// Serializes end-of-day transitions; concurrent tick and manual
    /// invocation must not both read-modify-write the score.
    gate: Mutex<()>,
}

impl HealthEngine {
    pub fn new(
        user_id: impl Into<String>,
        records: Arc<dyn RecordStore>,
        flags: Arc<dyn FlagStore>,
        config: Config,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            records,
            flags: flags.clone(),
            ledger: CompletionLedger::new(flags),
            config,
            gate: Mutex::new(()),
        }
    }

    /// Periodic trigger. Applies the transition for every fully elapsed
    /// day since the guard, then for today once local time has reached
    /// the configured end-of-day instant.
    ///
    /// Returns the outcome for each day considered, oldest first. A
    /// storage failure mid-catch-up stops the run; the guard is not
    /// advanced past the failed day, so the next tick retries it.
    pub async fn on_tick(&self, now: NaiveDateTime) -> Result<Vec<DayUpdate>> {
        let _held = self.gate.lock().await;

        let today = now.date();
        let mut updates = Vec::new();

        // Fully elapsed days since the guard. A missing guard means a
        // fresh install; there is no history to replay.
        if let Some(last) = self.last_updated_day().await? {
            let yesterday = today - Duration::days(1);
            if last < yesterday {
                for day in days_inclusive(last + Duration::days(1), yesterday) {
                    let outcome = self.apply_locked(day).await?;
                    updates.push(DayUpdate { date: day, outcome });
                }
            }
        }

        if now.time() >= self.config.health.end_of_day_time() {
            let outcome = self.apply_locked(today).await?;
            updates.push(DayUpdate {
                date: today,
                outcome,
            });
        }

        Ok(updates)
    }

    /// Apply the end-of-day transition for one calendar day.
    ///
    /// Idempotent: a second call for an already-applied day is a no-op,
    /// including the case where another caller raced this one through
    /// the gate.
    pub async fn apply_end_of_day_update(&self, day: NaiveDate) -> Result<DayOutcome> {
        let _held = self.gate.lock().await;
        self.apply_locked(day).await
    }

    /// Transition body; callers must hold the gate.
    async fn apply_locked(&self, day: NaiveDate) -> Result<DayOutcome> {
        if let Some(last) = self.last_updated_day().await? {
            if last >= day {
                return Ok(DayOutcome::AlreadyApplied);
            }
        }

        let meds = self.records.list_medications(&self.user_id).await?;
        let adherence = daily_adherence(&meds, day, &self.ledger).await?;

        if adherence.due_count == 0 {
            // No transition, but the day is settled; without this the
            // catch-up loop would rescan it on every tick.
            self.set_last_updated_day(day).await?;
            tracing::debug!("No medications due on {}, score unchanged", day_key(day));
            return Ok(DayOutcome::NothingDue);
        }

        let previous = self
            .records
            .get_user_health(&self.user_id)
            .await?
            .unwrap_or(self.config.health.starting_health);

        let delta = adherence.ratio * self.config.health.daily_reward
            - (1.0 - adherence.ratio) * self.config.health.daily_penalty;
        let new = (previous as f64 + delta).round().clamp(0.0, 100.0) as i32;

        // Score first, guard second: if the record store write fails the
        // guard stays put and the next tick retries this day.
        self.records.update_user_health(&self.user_id, new).await?;
        self.set_last_updated_day(day).await?;

        tracing::info!(
            "Health update for {}: {} -> {} ({}/{} taken)",
            day_key(day),
            previous,
            new,
            adherence.taken_count,
            adherence.due_count
        );

        Ok(DayOutcome::Updated {
            previous,
            new,
            adherence,
        })
    }

    async fn last_updated_day(&self) -> Result<Option<NaiveDate>> {
        let stored = self.flags.get(LAST_UPDATED_KEY).await?;
        Ok(stored.as_deref().and_then(parse_day_key))
    }

    async fn set_last_updated_day(&self, day: NaiveDate) -> Result<()> {
        self.flags.set(LAST_UPDATED_KEY, &day_key(day)).await
    }

    /// The ledger this engine reads completion marks from. UI surfaces
    /// share it so a toggle is immediately visible to the next tick.
    pub fn ledger(&self) -> &CompletionLedger {
        &self.ledger
    }

    /// Whether a medication is overdue at `now`, using the configured
    /// grace period. Reminder surfaces call this instead of carrying
    /// their own grace value.
    pub fn is_overdue(&self, med: &Medication, now: NaiveDateTime) -> bool {
        crate::schedule::is_overdue(med, now, self.config.schedule.grace_period_minutes)
    }
}
