//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{DatasetStatus, HealthResponse};
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe. The dataset is built before the server
/// binds, so this only fails if it ended up without national rows.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.dataset.national().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// GET /health
///
/// Full health status with dataset details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dataset = &state.dataset;
    let stats = dataset.stats();

    let status = if dataset.national().is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        dataset: DatasetStatus {
            records: dataset.records().len(),
            national_rows: dataset.national().len(),
            departments: dataset.departments().len(),
            days: dataset.day_count(),
            first_day: dataset.first_day(),
            last_day: dataset.last_day(),
            dropped_incomplete: stats.dropped_incomplete,
            dropped_overseas: stats.dropped_overseas,
            loaded_at: dataset.loaded_at(),
        },
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
