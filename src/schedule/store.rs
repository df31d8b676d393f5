//! Storage gateway over the schedule collection.

use async_trait::async_trait;

use crate::error::StoreError;

use super::types::{DeleteResult, InsertResult, Schedule, ScheduleFields, ScheduleId, UpdateResult};

/// Single-document operations against the schedule collection.
///
/// Each call maps to exactly one store operation; implementations do not
/// batch, cache or retry.
#[async_trait]
pub trait ScheduleStore: Send + Sync + 'static {
    /// Liveness check, run once at startup.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Every schedule in the collection.
    async fn find_all(&self) -> Result<Vec<Schedule>, StoreError>;

    /// Insert a new schedule with `completed = false`.
    async fn insert_one(&self, fields: ScheduleFields) -> Result<InsertResult, StoreError>;

    /// Replace title/day/date/time of the matching schedule.
    async fn update_one(
        &self,
        id: &ScheduleId,
        fields: ScheduleFields,
    ) -> Result<UpdateResult, StoreError>;

    /// Set `completed = true` on the matching schedule.
    async fn set_completed(&self, id: &ScheduleId) -> Result<UpdateResult, StoreError>;

    /// Remove the matching schedule.
    async fn delete_one(&self, id: &ScheduleId) -> Result<DeleteResult, StoreError>;
}
