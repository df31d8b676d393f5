//! HTTP API handlers.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, StoreError};
use crate::metrics::{self, StoreOperation, StoreTimer};
use crate::schedule::{
    InsertResult, Schedule, ScheduleFields, ScheduleId, ScheduleRequest, ScheduleStore,
};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Schedule storage gateway.
    pub store: Arc<dyn ScheduleStore>,
    /// Whether the store answered a ping.
    pub ready: Arc<AtomicBool>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            store,
            ready: Arc::new(AtomicBool::new(false)),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Ping the store and record the outcome as readiness.
    pub async fn check_store(&self) -> Result<(), StoreError> {
        let result = timed(StoreOperation::Ping, self.store.ping()).await;
        self.set_ready(result.is_ok());
        result
    }
}

/// Uniform JSON wrapper for non-list responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Operation payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Underlying error text on server failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope.
    pub fn ok(message: &str, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
            error: None,
        }
    }
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the store is reachable.
    pub ready: bool,
}

async fn timed<T, F>(operation: StoreOperation, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let _timer = StoreTimer::new(operation);
    fut.await
}

fn failure(
    operation: StoreOperation,
    message: &'static str,
) -> impl FnOnce(StoreError) -> ApiError {
    move |err| {
        if err.is_invalid_id() {
            warn!(%operation, error = %err, "Rejected schedule id");
        } else {
            metrics::inc_store_errors(operation);
            error!(%operation, error = %err, "Store operation failed");
        }
        ApiError::failed(message)(err)
    }
}

fn request_fields(body: Result<Json<Value>, JsonRejection>) -> Result<ScheduleFields, ApiError> {
    let request = match body {
        Ok(Json(value)) => ScheduleRequest::from_body(value),
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable schedule body");
            ScheduleRequest::default()
        }
    };
    request.into_fields().ok_or(ApiError::MissingFields)
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Server is up", body = String))
)]
pub async fn health() -> &'static str {
    "Server is up and running!"
}

/// Readiness check handler - returns 200 if the store answers, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if !state.is_ready() {
        if let Err(e) = state.check_store().await {
            debug!(error = %e, "Store still unreachable");
        }
    }

    let is_ready = state.is_ready();
    let status = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyResponse { ready: is_ready }))
}

/// Prometheus exposition, or 404 when no recorder is installed.
pub async fn prometheus(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// List every schedule.
#[utoipa::path(
    get,
    path = "/schedules",
    responses(
        (status = 200, description = "All schedules", body = [Schedule]),
        (status = 404, description = "No schedules found"),
        (status = 500, description = "Failed to fetch schedules")
    )
)]
pub async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    let op = StoreOperation::FindAll;
    let schedules = timed(op, state.store.find_all())
        .await
        .map_err(failure(op, "Failed to fetch schedules"))?;

    if schedules.is_empty() {
        return Err(ApiError::NoSchedules);
    }
    Ok(Json(schedules))
}

/// Add a schedule.
#[utoipa::path(
    post,
    path = "/schedule",
    request_body = ScheduleRequest,
    responses(
        (status = 201, description = "Schedule added successfully", body = InsertResult),
        (status = 400, description = "All fields are required!"),
        (status = 500, description = "Failed to add schedule")
    )
)]
pub async fn add_schedule(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = request_fields(body)?;

    let op = StoreOperation::InsertOne;
    let result = timed(op, state.store.insert_one(fields))
        .await
        .map_err(failure(op, "Failed to add schedule"))?;

    metrics::inc_schedules_created();
    info!(id = %result.inserted_id, "Schedule added");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Schedule added successfully", Some(result))),
    ))
}

/// Replace title/day/date/time of a schedule.
#[utoipa::path(
    put,
    path = "/schedule/{id}",
    params(("id" = String, Path, description = "Schedule id")),
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated successfully", body = ScheduleFields),
        (status = 400, description = "All fields are required!"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Failed to update schedule")
    )
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<ScheduleFields>>, ApiError> {
    let fields = request_fields(body)?;

    let op = StoreOperation::UpdateOne;
    let message = "Failed to update schedule";
    let id: ScheduleId = id.parse().map_err(failure(op, message))?;
    let result = timed(op, state.store.update_one(&id, fields.clone()))
        .await
        .map_err(failure(op, message))?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound);
    }

    metrics::inc_schedules_updated();
    debug!(%id, modified = result.modified_count, "Schedule updated");
    Ok(Json(Envelope::ok("Schedule updated successfully", Some(fields))))
}

/// Mark a schedule as completed.
#[utoipa::path(
    patch,
    path = "/schedule/{id}/complete",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule marked as complete"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Failed to mark schedule as complete")
    )
)]
pub async fn complete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let op = StoreOperation::SetCompleted;
    let message = "Failed to mark schedule as complete";
    let id: ScheduleId = id.parse().map_err(failure(op, message))?;
    let result = timed(op, state.store.set_completed(&id))
        .await
        .map_err(failure(op, message))?;

    if result.matched_count == 0 {
        return Err(ApiError::NotFound);
    }

    metrics::inc_schedules_completed();
    debug!(%id, "Schedule marked as complete");
    Ok(Json(Envelope::ok("Schedule marked as complete", None)))
}

/// Delete a schedule.
#[utoipa::path(
    delete,
    path = "/schedule/{id}",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule deleted successfully"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let op = StoreOperation::DeleteOne;
    let message = "Internal Server Error";
    let id: ScheduleId = id.parse().map_err(failure(op, message))?;
    let result = timed(op, state.store.delete_one(&id))
        .await
        .map_err(failure(op, message))?;

    if result.deleted_count == 0 {
        return Err(ApiError::NotFound);
    }

    metrics::inc_schedules_deleted();
    info!(%id, "Schedule deleted");
    Ok(Json(Envelope::ok("Schedule deleted successfully", None)))
}
