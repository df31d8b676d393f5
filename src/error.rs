//! Unified error types for the schedule service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::handlers::Envelope;

/// Unified error type for process-level failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage gateway errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Path identifier is not a valid store identifier.
    #[error("invalid schedule id: {0:?}")]
    InvalidId(String),

    /// MongoDB driver error.
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The store acknowledged an insert without returning an object id.
    #[error("store returned an unexpected inserted id")]
    MissingId,

    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the error was caused by the caller rather than the store.
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, StoreError::InvalidId(_))
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// One of title/day/date/time is missing or falsy.
    #[error("All fields are required!")]
    MissingFields,

    /// No record matched the identifier.
    #[error("Schedule not found")]
    NotFound,

    /// Listing found no records.
    #[error("No schedules found")]
    NoSchedules,

    /// Store or identifier failure, with the operation's failure message.
    #[error("{message}")]
    Failed {
        /// Operation-specific message shown to the client.
        message: &'static str,
        /// Underlying cause.
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Wrap a store error with the message for the failing operation.
    pub fn failed(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Failed { message, source }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::NoSchedules => StatusCode::NOT_FOUND,
            ApiError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = match &self {
            ApiError::Failed { source, .. } => Some(source.to_string()),
            _ => None,
        };
        let body = Envelope::<()> {
            success: false,
            message: self.to_string(),
            data: None,
            error,
        };
        (status, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
