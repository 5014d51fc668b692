//! Request and response types for the prediction web service

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::effect::EffectSummary;
use crate::error::PredictError;
use crate::genome::GenomicInterval;
use crate::prediction::OutputType;
use crate::region::SequenceLength;

/// Envelope wrapped around every response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 UTC time the response was built
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now(),
        }
    }

    /// Failed response carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            timestamp: now(),
        }
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Error envelope returned by every failing handler
pub type ErrorResponse = ApiResponse<()>;

/// Handler result: an enveloped body or a status with an error envelope
pub type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ErrorResponse>)>;

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Predict(e) => match e {
                e if e.is_input_error() => 400,
                PredictError::PredictionService { .. } => 502,
                PredictError::MissingCredential { .. } => 503,
                _ => 500,
            },
            ServiceError::InvalidJson(_) => 400,
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound => 404,
            ServiceError::ConfigError(_) => 500,
            ServiceError::InternalError(_) => 500,
        }
    }

    /// Convert to error response
    pub fn to_response(&self) -> ErrorResponse {
        ApiResponse::failure(self.to_string())
    }

    /// Status and envelope pair returned from handlers
    pub fn into_rejection(self) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match status.as_u16() {
            500..=599 => tracing::error!(status = status.as_u16(), error = %self, "Request failed"),
            _ => tracing::debug!(status = status.as_u16(), error = %self, "Request rejected"),
        }
        (status, Json(self.to_response()))
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidJson(rejection.body_text())
    }
}

impl From<PredictError> for (StatusCode, Json<ErrorResponse>) {
    fn from(error: PredictError) -> Self {
        ServiceError::from(error).into_rejection()
    }
}

impl From<ServiceError> for (StatusCode, Json<ErrorResponse>) {
    fn from(error: ServiceError) -> Self {
        error.into_rejection()
    }
}

/// Basic health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub client_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

/// Output types the backend can produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsResponse {
    pub supported_outputs: Vec<OutputType>,
    pub description: String,
}

/// Known tissue ontology terms and their names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TissuesResponse {
    pub tissue_ontology_terms: BTreeMap<String, String>,
    pub description: String,
}

/// Request to validate (and optionally resize) an interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeIntervalRequest {
    pub interval: GenomicInterval,
    #[serde(default)]
    pub resize_to: Option<SequenceLength>,
}

/// A validated interval with its model input length
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeIntervalResponse {
    pub interval: GenomicInterval,
    pub width: u64,
    pub sequence_length: SequenceLength,
}

/// Request for a window centered on a variant position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowRequest {
    pub chromosome: String,
    pub position: u64,
    #[serde(default)]
    pub length: Option<SequenceLength>,
}

/// Request to summarize a reference/alternate pair
///
/// Arrays are nested JSON arrays or `{shape, values}` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub reference: Value,
    pub alternate: Value,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Summary response
pub type SummarizeResponse = EffectSummary;

/// Request to rank track scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTracksRequest {
    pub scores: Vec<f64>,
    #[serde(default)]
    pub k: Option<usize>,
}
