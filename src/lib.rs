//! Gym class schedule service.
//!
//! A small CRUD backend over a document store: schedules can be listed,
//! added, updated, marked complete and deleted through a JSON HTTP API.
//!
//! ```text
//! client -> api::handlers -> ScheduleStore -> MongoDB
//!        <- {success, message, data?, error?}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`schedule`]: Schedule types and storage gateways
//! - [`api`]: HTTP handlers and router
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod schedule;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
