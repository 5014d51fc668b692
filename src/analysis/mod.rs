//! Interval and variant analysis
//!
//! [`Analyzer`] runs the full request flow: normalize the region, call the
//! prediction client, then reduce the returned arrays to statistics and
//! effect summaries. Requested outputs missing from a response are logged
//! and skipped rather than failing the whole request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::AnalysisConfig;
use crate::effect::{
    array_stats, track_scores, ArrayStats, EffectComputer, EffectSummary, PredictionArray,
    TrackScore,
};
use crate::error::PredictError;
use crate::genome::{GenomicInterval, GenomicVariant};
use crate::prediction::{OutputType, PredictionClient, PredictionRequest};
use crate::region::{RegionNormalizer, SequenceLength};

/// Predict over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalAnalysisRequest {
    pub interval: GenomicInterval,
    /// Resize the interval to this length around its midpoint first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_to: Option<SequenceLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_terms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_outputs: Option<Vec<OutputType>>,
}

impl IntervalAnalysisRequest {
    pub fn new(interval: GenomicInterval) -> Self {
        Self {
            interval,
            resize_to: None,
            ontology_terms: None,
            requested_outputs: None,
        }
    }
}

/// Predict the effect of a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAnalysisRequest {
    /// Context interval; a window around the variant is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<GenomicInterval>,
    pub variant: GenomicVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_terms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_outputs: Option<Vec<OutputType>>,
    /// Number of tracks to rank per output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl VariantAnalysisRequest {
    pub fn new(variant: GenomicVariant) -> Self {
        Self {
            interval: None,
            variant,
            ontology_terms: None,
            requested_outputs: None,
            top_k: None,
        }
    }
}

/// Echo of what was actually requested from the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub interval: GenomicInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<GenomicVariant>,
    pub ontology_terms: Vec<String>,
    pub requested_outputs: Vec<OutputType>,
    pub backend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalAnalysis {
    pub predictions: BTreeMap<OutputType, ArrayStats>,
    pub metadata: AnalysisMetadata,
}

/// Effect of a variant on one output type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantEffect {
    pub reference: ArrayStats,
    pub alternate: ArrayStats,
    pub effect: EffectSummary,
    /// Tracks with the largest absolute mean change
    pub top_tracks: Vec<TrackScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAnalysis {
    pub variant_effects: BTreeMap<OutputType, VariantEffect>,
    pub metadata: AnalysisMetadata,
}

/// Runs analyses against a prediction client
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    normalizer: RegionNormalizer,
    effects: EffectComputer,
    config: AnalysisConfig,
}

impl Analyzer {
    /// Fails when the configured direction threshold is unusable
    pub fn new(config: AnalysisConfig) -> Result<Self, PredictError> {
        Ok(Self {
            normalizer: RegionNormalizer::new(),
            effects: EffectComputer::new(config.effect_config()?),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &RegionNormalizer {
        &self.normalizer
    }

    pub fn effects(&self) -> &EffectComputer {
        &self.effects
    }

    /// Normalize, predict and summarize an interval
    pub async fn analyze_interval(
        &self,
        client: &dyn PredictionClient,
        request: &IntervalAnalysisRequest,
    ) -> Result<IntervalAnalysis, PredictError> {
        let interval = match request.resize_to {
            Some(length) => {
                request.interval.check_coordinates()?;
                self.normalizer.resize(&request.interval, length)
            }
            None => request.interval.clone(),
        };
        let interval = self.normalizer.validate(&interval)?;
        let outputs = self.outputs(request.requested_outputs.as_deref());
        let terms = self.ontology_terms(request.ontology_terms.as_deref());

        tracing::info!(interval = %interval, outputs = outputs.len(), "Predicting interval");

        let bundle = client
            .predict(&PredictionRequest::interval(
                interval.clone(),
                outputs.clone(),
                terms.clone(),
            ))
            .await?
            .into_interval()?;

        let mut predictions = BTreeMap::new();
        for output in &outputs {
            match bundle.get(output) {
                Some(array) => {
                    predictions.insert(*output, array_stats(array)?);
                }
                None => tracing::warn!(output = %output, "Output missing from prediction response"),
            }
        }

        Ok(IntervalAnalysis {
            predictions,
            metadata: AnalysisMetadata {
                interval,
                variant: None,
                ontology_terms: terms,
                requested_outputs: outputs,
                backend: client.backend_name().to_string(),
            },
        })
    }

    /// Normalize, predict and compute per-output effects for a variant
    pub async fn analyze_variant(
        &self,
        client: &dyn PredictionClient,
        request: &VariantAnalysisRequest,
    ) -> Result<VariantAnalysis, PredictError> {
        let variant = &request.variant;
        variant.check()?;

        let interval = match &request.interval {
            Some(interval) => interval.clone(),
            None => self
                .normalizer
                .window_for_variant(variant, self.config.variant_window)?,
        };
        let interval = self.normalizer.validate(&interval)?;
        self.normalizer.check_variant(&interval, variant)?;

        let outputs = self.outputs(request.requested_outputs.as_deref());
        let terms = self.ontology_terms(request.ontology_terms.as_deref());
        let top_k = request.top_k.unwrap_or(self.config.top_tracks);

        tracing::info!(
            variant = %variant,
            interval = %interval,
            variant_type = %variant.variant_type(),
            "Predicting variant"
        );

        let (reference, alternate) = client
            .predict(&PredictionRequest::variant(
                interval.clone(),
                variant.clone(),
                outputs.clone(),
                terms.clone(),
            ))
            .await?
            .into_variant()?;

        let mut variant_effects = BTreeMap::new();
        for output in &outputs {
            let (Some(ref_array), Some(alt_array)) = (reference.get(output), alternate.get(output))
            else {
                tracing::warn!(output = %output, "Output missing from variant response");
                continue;
            };
            variant_effects.insert(*output, self.variant_effect(ref_array, alt_array, top_k)?);
        }

        Ok(VariantAnalysis {
            variant_effects,
            metadata: AnalysisMetadata {
                interval,
                variant: Some(variant.clone()),
                ontology_terms: terms,
                requested_outputs: outputs,
                backend: client.backend_name().to_string(),
            },
        })
    }

    fn variant_effect(
        &self,
        reference: &PredictionArray,
        alternate: &PredictionArray,
        top_k: usize,
    ) -> Result<VariantEffect, PredictError> {
        let effect = self.effects.summarize(reference, alternate)?;
        let diff = alternate - reference;
        let scores: Vec<f64> = track_scores(&diff)?.into_iter().map(f64::abs).collect();

        Ok(VariantEffect {
            reference: array_stats(reference)?,
            alternate: array_stats(alternate)?,
            effect,
            top_tracks: self.effects.top_tracks(&scores, top_k)?,
        })
    }

    fn outputs(&self, requested: Option<&[OutputType]>) -> Vec<OutputType> {
        match requested {
            Some(outputs) if !outputs.is_empty() => outputs.to_vec(),
            _ => self.config.default_outputs.clone(),
        }
    }

    fn ontology_terms(&self, requested: Option<&[String]>) -> Vec<String> {
        match requested {
            Some(terms) if !terms.is_empty() => terms.to_vec(),
            _ => self.config.default_ontology_terms.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectDirection;
    use crate::prediction::{MockPredictionClient, OutputBundle, PredictionOutput};
    use ndarray::{ArrayD, IxDyn};

    fn filled(shape: &[usize], value: f64) -> PredictionArray {
        ArrayD::from_elem(IxDyn(shape), value)
    }

    #[tokio::test]
    async fn test_analyze_interval_defaults() {
        let analyzer = Analyzer::default();
        let client = MockPredictionClient::default();
        let interval: GenomicInterval = "chr22:35677410-36725986".parse().unwrap();

        let result = analyzer
            .analyze_interval(&client, &IntervalAnalysisRequest::new(interval.clone()))
            .await
            .unwrap();

        assert_eq!(result.metadata.interval, interval);
        assert_eq!(result.metadata.requested_outputs, vec![OutputType::RnaSeq]);
        assert_eq!(result.metadata.ontology_terms, vec!["UBERON:0001157"]);
        assert!(result.predictions.contains_key(&OutputType::RnaSeq));
    }

    #[tokio::test]
    async fn test_analyze_interval_resize() {
        let analyzer = Analyzer::default();
        let client = MockPredictionClient::default();
        let request = IntervalAnalysisRequest {
            resize_to: Some(SequenceLength::Kb16),
            ..IntervalAnalysisRequest::new("chr1:1000000-1000100".parse().unwrap())
        };
        let result = analyzer.analyze_interval(&client, &request).await.unwrap();
        assert_eq!(result.metadata.interval.width(), 16_384);
    }

    #[tokio::test]
    async fn test_analyze_interval_unsupported_length() {
        let analyzer = Analyzer::default();
        let client = MockPredictionClient::default();
        let request = IntervalAnalysisRequest::new("chr1:1000-2000".parse().unwrap());
        let err = analyzer
            .analyze_interval(&client, &request)
            .await
            .unwrap_err();
        assert_eq!(err, PredictError::UnsupportedLength { width: 1000 });
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_variant_scenario() {
        let mut reference = OutputBundle::new();
        reference.insert(OutputType::RnaSeq, filled(&[10, 2], 0.4));
        let mut alternate = OutputBundle::new();
        alternate.insert(OutputType::RnaSeq, filled(&[10, 2], 0.422));
        let client = MockPredictionClient::with_fixed(PredictionOutput::Variant {
            reference,
            alternate,
        });

        let variant: GenomicVariant = "chr22:36201698 A>C".parse().unwrap();
        let result = Analyzer::default()
            .analyze_variant(&client, &VariantAnalysisRequest::new(variant))
            .await
            .unwrap();

        let effect = &result.variant_effects[&OutputType::RnaSeq];
        assert!((effect.effect.mean_difference - 0.022).abs() < 1e-9);
        assert_eq!(effect.effect.direction, EffectDirection::Increase);
        assert_eq!(effect.top_tracks.len(), 2);
        assert_eq!(result.metadata.interval.width(), 1_048_576);
    }

    #[tokio::test]
    async fn test_analyze_variant_outside_interval() {
        let client = MockPredictionClient::default();
        let request = VariantAnalysisRequest {
            interval: Some("chr22:1000-3048".parse().unwrap()),
            ..VariantAnalysisRequest::new("chr22:5000:A>C".parse().unwrap())
        };
        let err = Analyzer::default()
            .analyze_variant(&client, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, PredictError::PositionOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_wrong_response_kind() {
        let client = MockPredictionClient::with_fixed(PredictionOutput::Interval(OutputBundle::new()));
        let err = Analyzer::default()
            .analyze_variant(
                &client,
                &VariantAnalysisRequest::new("chr22:36201698:A>C".parse().unwrap()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PredictError::PredictionService { .. }));
    }

    #[tokio::test]
    async fn test_missing_output_skipped() {
        let client = MockPredictionClient::with_fixed(PredictionOutput::Interval(OutputBundle::new()));
        let result = Analyzer::default()
            .analyze_interval(
                &client,
                &IntervalAnalysisRequest::new("chr22:35677410-36725986".parse().unwrap()),
            )
            .await
            .unwrap();
        assert!(result.predictions.is_empty());
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let client = MockPredictionClient::failing("upstream unavailable");
        let err = Analyzer::default()
            .analyze_interval(
                &client,
                &IntervalAnalysisRequest::new("chr22:35677410-36725986".parse().unwrap()),
            )
            .await
            .unwrap_err();
        assert_eq!(err, PredictError::service("upstream unavailable"));
    }

    #[test]
    fn test_new_rejects_unusable_threshold() {
        for threshold in [f64::NAN, -0.5] {
            let config = AnalysisConfig {
                direction_threshold: threshold,
                ..AnalysisConfig::default()
            };
            assert!(matches!(
                Analyzer::new(config),
                Err(PredictError::InvalidInput { .. })
            ));
        }
        assert!(Analyzer::new(AnalysisConfig::default()).is_ok());
    }
}
