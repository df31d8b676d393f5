//! HTTP API route definitions.

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    self, add_schedule, complete_schedule, delete_schedule, health, list_schedules, prometheus,
    ready, update_schedule, AppState,
};
use crate::schedule::{InsertResult, Schedule, ScheduleFields, ScheduleRequest};

/// OpenAPI document for the schedule API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Gym schedule API"),
    paths(
        handlers::health,
        handlers::list_schedules,
        handlers::add_schedule,
        handlers::update_schedule,
        handlers::complete_schedule,
        handlers::delete_schedule,
    ),
    components(schemas(Schedule, ScheduleFields, ScheduleRequest, InsertResult))
)]
pub struct ApiDoc;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(prometheus))
        // Schedule endpoints
        .route("/schedules", get(list_schedules))
        .route("/schedule", post(add_schedule))
        .route("/schedule/:id", put(update_schedule).delete(delete_schedule))
        .route("/schedule/:id/complete", patch(complete_schedule))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
