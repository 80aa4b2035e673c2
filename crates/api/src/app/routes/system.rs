use axum::Json;

use crate::app::dto::HealthResponse;

/// Liveness check. Ignores query and headers.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
