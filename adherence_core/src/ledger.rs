//! Completion ledger: per-medication, per-day "taken" marks backed by
//! the local flag store.
//!
//! Marks are keyed by medication id and day (`med:<id>:done:<day>`), so
//! any past day stays queryable and renaming a medication does not lose
//! its history. The previous app revision keyed marks by medication
//! *name* with a single overwritable day value (`<name>:done`, plus a
//! duplicate `<name>:timestamp`); those keys are still honored on reads
//! so marks written before an upgrade keep counting.

use crate::calendar::day_key;
use crate::store::FlagStore;
use crate::{Medication, Result};
use chrono::NaiveDate;
use std::sync::Arc;

/// Stored value for a completion mark.
const DONE: &str = "1";

pub struct CompletionLedger {
    flags: Arc<dyn FlagStore>,
}

impl CompletionLedger {
    pub fn new(flags: Arc<dyn FlagStore>) -> Self {
        Self { flags }
    }

    fn mark_key(med_id: &str, day: NaiveDate) -> String {
        format!("med:{}:done:{}", med_id, day_key(day))
    }

    fn legacy_done_key(med_name: &str) -> String {
        format!("{}:done", med_name)
    }

    fn legacy_timestamp_key(med_name: &str) -> String {
        format!("{}:timestamp", med_name)
    }

    /// Whether the medication is marked taken on the given day.
    pub async fn is_done(&self, med: &Medication, day: NaiveDate) -> Result<bool> {
        if self.flags.get(&Self::mark_key(&med.id, day)).await?.is_some() {
            return Ok(true);
        }
        self.legacy_mark_matches(med, day).await
    }

    /// Mark the medication taken on the given day. Idempotent.
    pub async fn set_done(&self, med: &Medication, day: NaiveDate) -> Result<()> {
        self.flags
            .set(&Self::mark_key(&med.id, day), DONE)
            .await?;
        tracing::debug!("Marked {} done on {}", med.name, day_key(day));
        Ok(())
    }

    /// Clear the mark for the given day. Idempotent; clearing a day that
    /// was never marked is a no-op.
    pub async fn clear_done(&self, med: &Medication, day: NaiveDate) -> Result<()> {
        self.flags.remove(&Self::mark_key(&med.id, day)).await?;

        // A legacy name-keyed mark pointing at this day would otherwise
        // make the medication reappear as done after the clear.
        if self.legacy_mark_matches(med, day).await? {
            self.flags.remove(&Self::legacy_done_key(&med.name)).await?;
            self.flags
                .remove(&Self::legacy_timestamp_key(&med.name))
                .await?;
        }

        tracing::debug!("Cleared {} done mark for {}", med.name, day_key(day));
        Ok(())
    }

    /// Flip the completion state for the day; returns the new state.
    pub async fn toggle(&self, med: &Medication, day: NaiveDate) -> Result<bool> {
        if self.is_done(med, day).await? {
            self.clear_done(med, day).await?;
            Ok(false)
        } else {
            self.set_done(med, day).await?;
            Ok(true)
        }
    }

    /// Read path for marks written by the name-keyed revision: the stored
    /// value is itself a day key, and only counts for exactly that day.
    async fn legacy_mark_matches(&self, med: &Medication, day: NaiveDate) -> Result<bool> {
        let stored = self.flags.get(&Self::legacy_done_key(&med.name)).await?;
        Ok(stored.as_deref() == Some(day_key(day).as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFlagStore;

    fn med(id: &str, name: &str) -> Medication {
        Medication {
            id: id.into(),
            name: name.into(),
            dosage: String::new(),
            frequency: String::new(),
            duration: String::new(),
            notes: String::new(),
            reminder_days: vec![],
            reminder_times: vec![],
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_query() {
        let ledger = CompletionLedger::new(Arc::new(MemoryFlagStore::new()));
        let m = med("rec001", "Aspirin");
        let d = day(2024, 9, 16);

        assert!(!ledger.is_done(&m, d).await.unwrap());
        ledger.set_done(&m, d).await.unwrap();
        assert!(ledger.is_done(&m, d).await.unwrap());

        // Other days are unaffected
        assert!(!ledger.is_done(&m, day(2024, 9, 15)).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_is_idempotent() {
        let ledger = CompletionLedger::new(Arc::new(MemoryFlagStore::new()));
        let m = med("rec001", "Aspirin");
        let d = day(2024, 9, 16);

        ledger.set_done(&m, d).await.unwrap();
        ledger.set_done(&m, d).await.unwrap();
        assert!(ledger.is_done(&m, d).await.unwrap());

        ledger.clear_done(&m, d).await.unwrap();
        ledger.clear_done(&m, d).await.unwrap();
        assert!(!ledger.is_done(&m, d).await.unwrap());
    }

    #[tokio::test]
    async fn test_historical_days_stay_queryable() {
        let ledger = CompletionLedger::new(Arc::new(MemoryFlagStore::new()));
        let m = med("rec001", "Aspirin");

        ledger.set_done(&m, day(2024, 9, 14)).await.unwrap();
        ledger.set_done(&m, day(2024, 9, 16)).await.unwrap();

        assert!(ledger.is_done(&m, day(2024, 9, 14)).await.unwrap());
        assert!(!ledger.is_done(&m, day(2024, 9, 15)).await.unwrap());
        assert!(ledger.is_done(&m, day(2024, 9, 16)).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_name_different_ids_do_not_collide() {
        let ledger = CompletionLedger::new(Arc::new(MemoryFlagStore::new()));
        let a = med("rec001", "Aspirin");
        let b = med("rec002", "Aspirin");
        let d = day(2024, 9, 16);

        ledger.set_done(&a, d).await.unwrap();
        assert!(ledger.is_done(&a, d).await.unwrap());
        assert!(!ledger.is_done(&b, d).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle() {
        let ledger = CompletionLedger::new(Arc::new(MemoryFlagStore::new()));
        let m = med("rec001", "Aspirin");
        let d = day(2024, 9, 16);

        assert!(ledger.toggle(&m, d).await.unwrap());
        assert!(ledger.is_done(&m, d).await.unwrap());
        assert!(!ledger.toggle(&m, d).await.unwrap());
        assert!(!ledger.is_done(&m, d).await.unwrap());
    }

    #[tokio::test]
    async fn test_legacy_name_keyed_mark_counts_for_its_day() {
        let flags = Arc::new(MemoryFlagStore::new());
        // A mark written by the previous revision
        flags.set("Aspirin:done", "2024-09-16").await.unwrap();
        flags.set("Aspirin:timestamp", "2024-09-16").await.unwrap();

        let ledger = CompletionLedger::new(flags);
        let m = med("rec001", "Aspirin");

        assert!(ledger.is_done(&m, day(2024, 9, 16)).await.unwrap());
        // Stale mark from a prior day is ignored by date comparison
        assert!(!ledger.is_done(&m, day(2024, 9, 17)).await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_removes_legacy_mark() {
        let flags = Arc::new(MemoryFlagStore::new());
        flags.set("Aspirin:done", "2024-09-16").await.unwrap();
        flags.set("Aspirin:timestamp", "2024-09-16").await.unwrap();

        let ledger = CompletionLedger::new(flags.clone());
        let m = med("rec001", "Aspirin");
        let d = day(2024, 9, 16);

        ledger.clear_done(&m, d).await.unwrap();
        assert!(!ledger.is_done(&m, d).await.unwrap());
        assert_eq!(flags.get("Aspirin:done").await.unwrap(), None);
        assert_eq!(flags.get("Aspirin:timestamp").await.unwrap(), None);
    }
}
