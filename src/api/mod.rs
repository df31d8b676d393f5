//! HTTP API module for the schedule endpoints plus health, readiness and metrics.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, Envelope};
pub use routes::{create_router, ApiDoc};
