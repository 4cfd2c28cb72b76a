use crate::dtos::HealthResponse;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// Liveness: always healthy, never touches the upstream providers.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.orchestrator.health())
}
