//! Region normalization endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::error::PredictError;
use crate::genome::GenomicInterval;
use crate::region::SequenceLength;
use crate::service::{
    server::AppState,
    types::{
        ApiResponse, HandlerResult, NormalizeIntervalRequest, NormalizeIntervalResponse,
        ServiceError, WindowRequest,
    },
};

/// Validate an interval, resizing it first when `resize_to` is given
pub async fn normalize_interval(
    State(state): State<AppState>,
    payload: Result<Json<NormalizeIntervalRequest>, JsonRejection>,
) -> HandlerResult<NormalizeIntervalResponse> {
    let Json(request) = payload.map_err(ServiceError::from)?;
    let normalizer = state.analyzer.normalizer();

    let interval = match request.resize_to {
        Some(length) => {
            request.interval.check_coordinates()?;
            normalizer.resize(&request.interval, length)
        }
        None => request.interval,
    };
    let interval = normalizer.validate(&interval)?;
    let sequence_length = supported_length(&interval)?;

    Ok(Json(ApiResponse::ok(NormalizeIntervalResponse {
        width: interval.width(),
        interval,
        sequence_length,
    })))
}

/// Build a window of a supported length centered on a position
pub async fn variant_window(
    State(state): State<AppState>,
    payload: Result<Json<WindowRequest>, JsonRejection>,
) -> HandlerResult<GenomicInterval> {
    let Json(request) = payload.map_err(ServiceError::from)?;
    let length = request
        .length
        .unwrap_or(state.analyzer.config().variant_window);

    let interval = state.analyzer.normalizer().fit_variant_window(
        &request.chromosome,
        request.position,
        length,
    )?;
    let interval = state.analyzer.normalizer().validate(&interval)?;

    Ok(Json(ApiResponse::ok(interval)))
}

fn supported_length(interval: &GenomicInterval) -> Result<SequenceLength, PredictError> {
    SequenceLength::from_bp(interval.width()).ok_or(PredictError::UnsupportedLength {
        width: interval.width(),
    })
}
