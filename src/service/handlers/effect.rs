//! Effect computation on caller-supplied arrays

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::cli::array_from_value;
use crate::effect::{EffectComputer, EffectConfig, TrackScore};
use crate::service::{
    server::AppState,
    types::{
        ApiResponse, HandlerResult, ServiceError, SummarizeRequest, SummarizeResponse,
        TopTracksRequest,
    },
};

/// Summarize the difference between a reference and an alternate array
pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> HandlerResult<SummarizeResponse> {
    let Json(request) = payload.map_err(ServiceError::from)?;
    let reference = array_from_value(&request.reference)?;
    let alternate = array_from_value(&request.alternate)?;

    let summary = match request.threshold {
        Some(threshold) => EffectComputer::new(EffectConfig::with_threshold(threshold)?)
            .summarize(&reference, &alternate)?,
        None => state.analyzer.effects().summarize(&reference, &alternate)?,
    };

    Ok(Json(ApiResponse::ok(summary)))
}

/// Rank track scores, highest first
pub async fn top_tracks(
    State(state): State<AppState>,
    payload: Result<Json<TopTracksRequest>, JsonRejection>,
) -> HandlerResult<Vec<TrackScore>> {
    let Json(request) = payload.map_err(ServiceError::from)?;
    let k = request.k.unwrap_or(state.analyzer.config().top_tracks);
    let tracks = state.analyzer.effects().top_tracks(&request.scores, k)?;
    Ok(Json(ApiResponse::ok(tracks)))
}
