//! Prediction service integration
//!
//! The prediction model itself is an external service. This module defines
//! the request and response types exchanged with it, the
//! [`PredictionClient`] trait implemented by the HTTP and mock backends,
//! and [`ClientHandle`], the process-wide lazily-built client.

mod handle;
mod http;
mod mock;
mod outputs;

pub use handle::ClientHandle;
pub use http::HttpPredictionClient;
pub use mock::MockPredictionClient;
pub use outputs::{tissue_name, OutputType, DEFAULT_ONTOLOGY_TERM, TISSUES};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::effect::PredictionArray;
use crate::error::PredictError;
use crate::genome::{GenomicInterval, GenomicVariant};

/// One prediction array per output type
pub type OutputBundle = BTreeMap<OutputType, PredictionArray>;

/// What to predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub interval: GenomicInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<GenomicVariant>,
    pub requested_outputs: Vec<OutputType>,
    pub ontology_terms: Vec<String>,
}

impl PredictionRequest {
    /// Request predictions over an interval
    pub fn interval(
        interval: GenomicInterval,
        requested_outputs: Vec<OutputType>,
        ontology_terms: Vec<String>,
    ) -> Self {
        Self {
            interval,
            variant: None,
            requested_outputs,
            ontology_terms,
        }
    }

    /// Request reference and alternate predictions for a variant
    pub fn variant(
        interval: GenomicInterval,
        variant: GenomicVariant,
        requested_outputs: Vec<OutputType>,
        ontology_terms: Vec<String>,
    ) -> Self {
        Self {
            interval,
            variant: Some(variant),
            requested_outputs,
            ontology_terms,
        }
    }
}

/// Response from the prediction service
///
/// Interval requests yield a single bundle; variant requests yield a
/// reference bundle and an alternate bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutput {
    Interval(OutputBundle),
    Variant {
        reference: OutputBundle,
        alternate: OutputBundle,
    },
}

impl PredictionOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionOutput::Interval(_) => "interval",
            PredictionOutput::Variant { .. } => "variant",
        }
    }

    /// The single bundle of an interval response
    pub fn into_interval(self) -> Result<OutputBundle, PredictError> {
        match self {
            PredictionOutput::Interval(bundle) => Ok(bundle),
            other => Err(PredictError::service(format!(
                "expected an interval response, got a {} response",
                other.kind()
            ))),
        }
    }

    /// The reference and alternate bundles of a variant response
    pub fn into_variant(self) -> Result<(OutputBundle, OutputBundle), PredictError> {
        match self {
            PredictionOutput::Variant {
                reference,
                alternate,
            } => Ok((reference, alternate)),
            other => Err(PredictError::service(format!(
                "expected a variant response, got an {} response",
                other.kind()
            ))),
        }
    }
}

/// Trait for prediction backends
///
/// Implementations must surface every failure as
/// [`PredictError::PredictionService`] and must not retry.
#[async_trait::async_trait]
pub trait PredictionClient: Send + Sync {
    /// Run a prediction
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutput, PredictError>;

    /// Short name of the backend, for health reporting
    fn backend_name(&self) -> &'static str;

    /// Output types this backend can produce
    fn supported_outputs(&self) -> Vec<OutputType> {
        OutputType::all().to_vec()
    }
}
