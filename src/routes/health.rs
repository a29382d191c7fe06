use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", or "unavailable" when the database cannot be reached.
    pub status: String,
    /// "ok" or "unreachable".
    pub database: String,
    /// Unix seconds at which the check ran.
    pub timestamp: i64,
}

// GET /health - Readiness: answers 503 while the database is unreachable
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and database are reachable", body = HealthResponse),
        (status = 503, description = "Database ping failed", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let timestamp = chrono::Utc::now().timestamp();

    match db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "ok".to_string(),
                timestamp,
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    database: "unreachable".to_string(),
                    timestamp,
                }),
            )
        }
    }
}
