use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::schemas::HealthResponse;

/// `GET /health` -- liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
#[allow(clippy::unused_async)]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}
