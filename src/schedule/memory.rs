//! In-process schedule store.
//!
//! Backs the router in tests and `run --in-memory`. Records live in a
//! `DashMap` keyed by identifier; a failure switch makes every call fail the
//! way an unreachable store would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;

use super::store::ScheduleStore;
use super::types::{DeleteResult, InsertResult, Schedule, ScheduleFields, ScheduleId, UpdateResult};

/// Schedule store held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryScheduleStore {
    records: Arc<DashMap<ScheduleId, Schedule>>,
    failing: Arc<AtomicBool>,
}

impl MemoryScheduleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fetch a single record.
    pub fn get(&self, id: &ScheduleId) -> Option<Schedule> {
        self.records.get(id).map(|r| r.value().clone())
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store set to fail".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn find_all(&self) -> Result<Vec<Schedule>, StoreError> {
        self.check()?;
        let mut schedules: Vec<Schedule> =
            self.records.iter().map(|r| r.value().clone()).collect();
        // ObjectIds grow with creation time
        schedules.sort_by_key(|s| s.id);
        Ok(schedules)
    }

    async fn insert_one(&self, fields: ScheduleFields) -> Result<InsertResult, StoreError> {
        self.check()?;
        let id = ScheduleId::new();
        self.records.insert(id, Schedule::new(id, fields));
        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        id: &ScheduleId,
        fields: ScheduleFields,
    ) -> Result<UpdateResult, StoreError> {
        self.check()?;
        let Some(mut record) = self.records.get_mut(id) else {
            return Ok(UpdateResult::default());
        };
        let modified = record.fields() != fields;
        record.apply(fields);
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn set_completed(&self, id: &ScheduleId) -> Result<UpdateResult, StoreError> {
        self.check()?;
        let Some(mut record) = self.records.get_mut(id) else {
            return Ok(UpdateResult::default());
        };
        let modified = !record.completed;
        record.completed = true;
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, id: &ScheduleId) -> Result<DeleteResult, StoreError> {
        self.check()?;
        let deleted = self.records.remove(id).is_some();
        Ok(DeleteResult {
            deleted_count: u64::from(deleted),
        })
    }
}
