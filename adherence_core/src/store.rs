//! Collaborator interfaces for the external storage the core depends on.
//!
//! The mobile app talks to two stores the core does not own: a REST
//! record store holding users, medications and journal entries, and a
//! device-local key-value store holding session flags and completion
//! marks. Both are async; the core awaits every access.
//!
//! In-memory implementations are provided for tests and for offline
//! operation of host applications.

use crate::{Error, JournalEntry, Medication, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// External CRUD store for user, medication and journal records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All medications configured for a user.
    async fn list_medications(&self, user_id: &str) -> Result<Vec<Medication>>;

    /// The user's persisted health score, or None when the record has no
    /// health value yet (fresh account).
    async fn get_user_health(&self, user_id: &str) -> Result<Option<i32>>;

    /// Persist a new health score onto the user record.
    async fn update_user_health(&self, user_id: &str, score: i32) -> Result<()>;

    /// All journal entries for a user.
    async fn list_journal_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>>;
}

/// Device-local key-value store.
///
/// Implementations must provide per-key read-after-write consistency
/// within a session: a `set` awaited to completion is observed by a
/// subsequent `get` for the same key.
#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// In-memory implementations
// ============================================================================

/// In-memory flag store.
#[derive(Default)]
pub struct MemoryFlagStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// In-memory record store.
///
/// Health-score writes can be made to fail on demand so callers can
/// exercise the engine's retry path.
#[derive(Default)]
pub struct MemoryRecordStore {
    medications: Mutex<Vec<Medication>>,
    health: Mutex<HashMap<String, i32>>,
    journal: Mutex<Vec<JournalEntry>>,
    fail_health_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_medication(&self, med: Medication) {
        self.medications.lock().await.push(med);
    }

    pub async fn put_journal_entry(&self, entry: JournalEntry) {
        self.journal.lock().await.push(entry);
    }

    pub async fn set_health(&self, user_id: &str, score: i32) {
        self.health.lock().await.insert(user_id.to_string(), score);
    }

    /// Make subsequent health-score writes fail with a storage error.
    pub fn fail_health_writes(&self, fail: bool) {
        self.fail_health_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent list/get calls fail with a storage error, so
    /// callers can exercise their degraded read paths.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Storage("record store unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_medications(&self, _user_id: &str) -> Result<Vec<Medication>> {
        self.check_reads()?;
        Ok(self.medications.lock().await.clone())
    }

    async fn get_user_health(&self, user_id: &str) -> Result<Option<i32>> {
        self.check_reads()?;
        Ok(self.health.lock().await.get(user_id).copied())
    }

    async fn update_user_health(&self, user_id: &str, score: i32) -> Result<()> {
        if self.fail_health_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("health write failed".into()));
        }
        self.health.lock().await.insert(user_id.to_string(), score);
        Ok(())
    }

    async fn list_journal_entries(&self, _user_id: &str) -> Result<Vec<JournalEntry>> {
        self.check_reads()?;
        Ok(self.journal.lock().await.clone())
    }
}
