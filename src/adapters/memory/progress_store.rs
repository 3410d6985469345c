//! In-memory progress store with fault injection.
//!
//! Implements both progress ports over a map guarded by a tokio `RwLock`.
//! The atomic procedure holds the write lock across its read-check-write.
//! Outages and failures can be scheduled to drive the fallback and race
//! handling paths deterministically.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AtomicAttempt, Cap, ProgressCounter, ProgressKey};
use crate::domain::ports::{AtomicIncrement, ProgressRepository};

/// Call counts observed by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub atomic: usize,
    pub reads: usize,
    pub inserts: usize,
    pub updates: usize,
}

#[derive(Default)]
struct Faults {
    /// Upcoming atomic calls that report the procedure unavailable.
    atomic_outages: AtomicU32,
    atomic_uninstalled: AtomicBool,
    /// Atomic calls fail with a business (constraint) error.
    atomic_rejects: AtomicBool,
    reads_fail: AtomicBool,
    writes_fail: AtomicBool,
}

#[derive(Default)]
struct Calls {
    atomic: AtomicUsize,
    reads: AtomicUsize,
    inserts: AtomicUsize,
    updates: AtomicUsize,
}

#[derive(Clone, Default)]
pub struct InMemoryProgressStore {
    rows: Arc<RwLock<HashMap<ProgressKey, ProgressCounter>>>,
    faults: Arc<Faults>,
    calls: Arc<Calls>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the atomic procedure as not installed until re-enabled.
    pub fn set_atomic_installed(&self, installed: bool) {
        self.faults.atomic_uninstalled.store(!installed, Ordering::SeqCst);
    }

    /// Make the next `count` atomic calls report unavailability.
    pub fn schedule_atomic_outages(&self, count: u32) {
        self.faults.atomic_outages.store(count, Ordering::SeqCst);
    }

    pub fn set_atomic_rejects(&self, rejects: bool) {
        self.faults.atomic_rejects.store(rejects, Ordering::SeqCst);
    }

    pub fn set_reads_fail(&self, fail: bool) {
        self.faults.reads_fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_writes_fail(&self, fail: bool) {
        self.faults.writes_fail.store(fail, Ordering::SeqCst);
    }

    /// Seed a row directly, bypassing every fault.
    pub async fn seed(&self, key: ProgressKey, completed_count: u32) -> ProgressCounter {
        let counter = ProgressCounter {
            completed_count,
            ..ProgressCounter::first(key)
        };
        self.rows.write().await.insert(key, counter.clone());
        counter
    }

    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            atomic: self.calls.atomic.load(Ordering::SeqCst),
            reads: self.calls.reads.load(Ordering::SeqCst),
            inserts: self.calls.inserts.load(Ordering::SeqCst),
            updates: self.calls.updates.load(Ordering::SeqCst),
        }
    }

    fn take_outage(&self) -> bool {
        self.faults
            .atomic_outages
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn check_reads(&self) -> DomainResult<()> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        if self.faults.reads_fail.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> DomainResult<()> {
        if self.faults.writes_fail.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AtomicIncrement for InMemoryProgressStore {
    async fn increment_atomic(&self, key: &ProgressKey, cap: Cap) -> DomainResult<AtomicAttempt> {
        self.calls.atomic.fetch_add(1, Ordering::SeqCst);

        if self.faults.atomic_uninstalled.load(Ordering::SeqCst) {
            return Ok(AtomicAttempt::Unavailable("procedure not installed".to_string()));
        }
        if self.take_outage() {
            return Ok(AtomicAttempt::Unavailable("scheduled outage".to_string()));
        }
        if self.faults.atomic_rejects.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("counter constraint violated".to_string()));
        }

        let mut rows = self.rows.write().await;
        let counter = rows.entry(*key).or_insert_with(|| ProgressCounter {
            completed_count: 0,
            ..ProgressCounter::first(*key)
        });
        counter.completed_count = cap.next_count(counter.completed_count);
        counter.updated_at = Utc::now();
        Ok(AtomicAttempt::Applied(counter.completed_count))
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressStore {
    async fn find_by_key(&self, key: &ProgressKey) -> DomainResult<Option<ProgressCounter>> {
        self.check_reads()?;
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<ProgressCounter>> {
        self.check_reads()?;
        Ok(self.rows.read().await.values().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, counter: &ProgressCounter) -> DomainResult<()> {
        self.calls.inserts.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        let mut rows = self.rows.write().await;
        if rows.contains_key(&counter.key) {
            return Err(DomainError::DuplicateCounter(counter.key));
        }
        rows.insert(counter.key, counter.clone());
        Ok(())
    }

    async fn update_count(&self, id: Uuid, completed_count: u32) -> DomainResult<ProgressCounter> {
        self.calls.updates.fetch_add(1, Ordering::SeqCst);
        self.check_writes()?;

        let mut rows = self.rows.write().await;
        let counter = rows
            .values_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::DatabaseError(format!("Progress counter {id} not found")))?;
        counter.completed_count = completed_count;
        counter.updated_at = Utc::now();
        Ok(counter.clone())
    }
}
