//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};

/// Health check response data
#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Server timestamp in milliseconds
    pub timestamp_ms: i64,
    pub version: &'static str,
}

/// Health check endpoint
///
/// Pings the store but does NOT expose any internal details in the response.
///
/// - Healthy: 200 OK + {code: 0, data: {status: "healthy", ...}}
/// - Unhealthy: 503 Service Unavailable + {code: 5001, msg: "unavailable"}
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                status: "healthy",
                timestamp_ms: chrono::Utc::now().timestamp_millis(),
                version: env!("BUILD_GIT_HASH"),
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "[HEALTH] store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: error_codes::SERVICE_UNAVAILABLE,
                    msg: "unavailable".to_string(),
                    data: None,
                }),
            )
        }
    }
}
