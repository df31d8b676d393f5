//! Schedule module for gym class records.
//!
//! This module handles:
//! - Schedule types and request/result shapes
//! - The storage gateway trait
//! - MongoDB store
//! - In-memory store for testing

pub mod memory;
pub mod mongo;
pub mod store;
pub mod types;

pub use memory::MemoryScheduleStore;
pub use mongo::MongoScheduleStore;
pub use store::ScheduleStore;
pub use types::{
    DeleteResult, InsertResult, Schedule, ScheduleFields, ScheduleId, ScheduleRequest,
    UpdateResult,
};
