//! Service information endpoints

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::prediction::{OutputType, TISSUES};
use crate::region::SequenceLength;
use crate::service::{
    server::AppState,
    types::{ApiResponse, OutputsResponse, TissuesResponse},
};

/// Provide basic service information
pub async fn service_info(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let lengths: Vec<Value> = SequenceLength::all()
        .iter()
        .map(|l| json!({ "label": l.label(), "bp": l.bp() }))
        .collect();

    Json(ApiResponse::ok(json!({
        "service": "ferro-predict-web",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Genomic prediction region normalization and variant effect service",
        "base_url": state.config.server.base_url,
        "backend": state.config.prediction.backend,
        "supported_lengths": lengths,
        "endpoints": {
            "health": "GET /api/v1/health",
            "catalog": {
                "outputs": "GET /api/v1/outputs",
                "tissues": "GET /api/v1/tissues"
            },
            "normalize": {
                "interval": "POST /api/v1/normalize/interval",
                "window": "POST /api/v1/normalize/window"
            },
            "effect": {
                "summarize": "POST /api/v1/effect/summarize",
                "top_tracks": "POST /api/v1/effect/top-tracks"
            },
            "predict": {
                "interval": "POST /api/v1/predict/interval",
                "variant": "POST /api/v1/predict/variant"
            }
        }
    })))
}

/// List the output types the configured backend can produce
///
/// Falls back to the full catalog while the client is not initialized.
pub async fn supported_outputs(State(state): State<AppState>) -> Json<ApiResponse<OutputsResponse>> {
    let supported_outputs = match state.client.get() {
        Ok(client) => client.supported_outputs(),
        Err(_) => OutputType::all().to_vec(),
    };

    Json(ApiResponse::ok(OutputsResponse {
        supported_outputs,
        description: "Available genomic output types".to_string(),
    }))
}

/// List known tissue ontology terms
pub async fn tissues() -> Json<ApiResponse<TissuesResponse>> {
    let tissue_ontology_terms = TISSUES
        .iter()
        .map(|(term, name)| (term.to_string(), name.to_string()))
        .collect();

    Json(ApiResponse::ok(TissuesResponse {
        tissue_ontology_terms,
        description: "Available tissue ontology terms".to_string(),
    }))
}
