//! Prediction endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::analysis::{
    IntervalAnalysis, IntervalAnalysisRequest, VariantAnalysis, VariantAnalysisRequest,
};
use crate::service::{
    server::AppState,
    types::{ApiResponse, HandlerResult, ServiceError},
};

/// Predict an interval and summarize each requested output
pub async fn predict_interval(
    State(state): State<AppState>,
    payload: Result<Json<IntervalAnalysisRequest>, JsonRejection>,
) -> HandlerResult<IntervalAnalysis> {
    let Json(request) = payload.map_err(ServiceError::from)?;
    let client = state.client.get()?;
    let analysis = state
        .analyzer
        .analyze_interval(client.as_ref(), &request)
        .await?;
    Ok(Json(ApiResponse::ok(analysis)))
}

/// Predict reference and alternate alleles of a variant and compute effects
pub async fn predict_variant(
    State(state): State<AppState>,
    payload: Result<Json<VariantAnalysisRequest>, JsonRejection>,
) -> HandlerResult<VariantAnalysis> {
    let Json(request) = payload.map_err(ServiceError::from)?;
    let client = state.client.get()?;
    let analysis = state
        .analyzer
        .analyze_variant(client.as_ref(), &request)
        .await?;
    Ok(Json(ApiResponse::ok(analysis)))
}
