//! Health check endpoints

use axum::{extract::State, response::Json};

use crate::service::{
    server::AppState,
    types::{ApiResponse, HealthResponse},
};

/// Report service health
///
/// Tries to build the prediction client if it is not up yet, so the first
/// health probe after a key is provisioned brings the backend online. A
/// failed build is reported, not treated as unhealthy.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let backend = match state.client.get() {
        Ok(client) => Some(client.backend_name().to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Prediction client not available");
            None
        }
    };

    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        client_initialized: state.client.is_initialized(),
        backend,
    }))
}
