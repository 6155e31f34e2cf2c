use axum::extract::State;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::health::{HealthReport, HealthStatus};

/// `GET /api/v1/health`
///
/// Always answers 200; problems are reported through `status`.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthReport),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthReport> {
    let report = state.health.check().await;
    if report.status != HealthStatus::Ok {
        tracing::warn!(status = ?report.status, "Health check degraded");
    }
    ApiResponse::success(report)
}
