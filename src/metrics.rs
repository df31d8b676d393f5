//! Prometheus metrics for schedule mutations and store latency.
//!
//! This module provides metrics for:
//! - Schedules created, updated, completed and deleted
//! - Store operation latency, labelled by operation
//! - Store failures, labelled by operation

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use strum::{Display, IntoStaticStr};
use tracing::debug;

// === Metric Name Constants ===

/// Store operation latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_operation_latency_ms";
/// Store errors counter metric name.
pub const METRIC_STORE_ERRORS: &str = "store_errors_total";
/// Schedules created counter metric name.
pub const METRIC_SCHEDULES_CREATED: &str = "schedules_created_total";
/// Schedules updated counter metric name.
pub const METRIC_SCHEDULES_UPDATED: &str = "schedules_updated_total";
/// Schedules completed counter metric name.
pub const METRIC_SCHEDULES_COMPLETED: &str = "schedules_completed_total";
/// Schedules deleted counter metric name.
pub const METRIC_SCHEDULES_DELETED: &str = "schedules_deleted_total";

/// Store operation label values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StoreOperation {
    Ping,
    FindAll,
    InsertOne,
    UpdateOne,
    SetCompleted,
    DeleteOne,
}

/// Install the Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Document store operation latency in milliseconds"
    );
    describe_counter!(METRIC_STORE_ERRORS, "Total number of failed store operations");
    describe_counter!(METRIC_SCHEDULES_CREATED, "Total number of schedules created");
    describe_counter!(METRIC_SCHEDULES_UPDATED, "Total number of schedules updated");
    describe_counter!(
        METRIC_SCHEDULES_COMPLETED,
        "Total number of schedules marked complete"
    );
    describe_counter!(METRIC_SCHEDULES_DELETED, "Total number of schedules deleted");

    debug!("Metrics initialized");
}

/// Record store operation latency.
pub fn record_store_latency(start: Instant, operation: StoreOperation) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let label: &'static str = operation.into();
    histogram!(METRIC_STORE_LATENCY, "operation" => label).record(latency_ms);
}

/// Increment store errors counter.
pub fn inc_store_errors(operation: StoreOperation) {
    let label: &'static str = operation.into();
    counter!(METRIC_STORE_ERRORS, "operation" => label).increment(1);
}

/// Increment schedules created counter.
pub fn inc_schedules_created() {
    counter!(METRIC_SCHEDULES_CREATED).increment(1);
}

/// Increment schedules updated counter.
pub fn inc_schedules_updated() {
    counter!(METRIC_SCHEDULES_UPDATED).increment(1);
}

/// Increment schedules completed counter.
pub fn inc_schedules_completed() {
    counter!(METRIC_SCHEDULES_COMPLETED).increment(1);
}

/// Increment schedules deleted counter.
pub fn inc_schedules_deleted() {
    counter!(METRIC_SCHEDULES_DELETED).increment(1);
}

/// RAII guard for timing a store operation.
/// Automatically records latency when dropped.
pub struct StoreTimer {
    start: Instant,
    operation: StoreOperation,
}

impl StoreTimer {
    /// Start timing the given operation.
    pub fn new(operation: StoreOperation) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for StoreTimer {
    fn drop(&mut self) {
        record_store_latency(self.start, self.operation);
    }
}
