//! Variant effect computation
//!
//! Reduces paired reference/alternate prediction arrays to an
//! [`EffectSummary`]: the means of each array, the mean and spread of their
//! elementwise difference, and a direction classification against a
//! configurable threshold. Also ranks tracks by score.
//!
//! # Example
//!
//! ```
//! use ferro_predict::effect::{EffectComputer, EffectDirection};
//! use ndarray::array;
//!
//! let computer = EffectComputer::default();
//! let reference = array![[0.40, 0.40], [0.40, 0.40]];
//! let alternate = array![[0.422, 0.422], [0.422, 0.422]];
//! let summary = computer.summarize(&reference, &alternate).unwrap();
//! assert_eq!(summary.direction, EffectDirection::Increase);
//! ```

mod config;
mod stats;
mod tracks;

pub use config::{EffectConfig, DEFAULT_DIRECTION_THRESHOLD};
pub use stats::{array_stats, ArrayStats};
pub use tracks::{top_tracks, track_scores, TrackScore};

use ndarray::{ArrayBase, ArrayD, Data, Dimension, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PredictError;
use stats::nan_max;

/// A prediction array for one output type, laid out positions x tracks
pub type PredictionArray = ArrayD<f64>;

/// Direction of a variant's effect on the predicted signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectDirection {
    Increase,
    Decrease,
    NoChange,
}

impl EffectDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectDirection::Increase => "INCREASE",
            EffectDirection::Decrease => "DECREASE",
            EffectDirection::NoChange => "NO_CHANGE",
        }
    }

    /// Classify a mean difference; the comparisons are strict
    pub fn classify(mean_difference: f64, threshold: f64) -> Self {
        if mean_difference > threshold {
            EffectDirection::Increase
        } else if mean_difference < -threshold {
            EffectDirection::Decrease
        } else {
            EffectDirection::NoChange
        }
    }
}

impl fmt::Display for EffectDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of the difference `alternate - reference`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSummary {
    pub reference_mean: f64,
    pub alternate_mean: f64,
    pub mean_difference: f64,
    pub max_absolute_difference: f64,
    pub standard_deviation_of_difference: f64,
    pub direction: EffectDirection,
}

/// Computes effect summaries under an [`EffectConfig`]
#[derive(Debug, Clone, Default)]
pub struct EffectComputer {
    config: EffectConfig,
}

impl EffectComputer {
    pub fn new(config: EffectConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Summarize the effect between two same-shaped arrays
    pub fn summarize<S1, S2, D>(
        &self,
        reference: &ArrayBase<S1, D>,
        alternate: &ArrayBase<S2, D>,
    ) -> Result<EffectSummary, PredictError>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        if reference.shape() != alternate.shape() {
            return Err(PredictError::ShapeMismatch {
                reference: reference.shape().to_vec(),
                alternate: alternate.shape().to_vec(),
            });
        }
        if reference.is_empty() {
            return Err(PredictError::empty("prediction arrays have no values"));
        }

        let diff = Zip::from(alternate)
            .and(reference)
            .map_collect(|&alt, &reference| alt - reference);

        let reference_mean = mean_of(reference)?;
        let alternate_mean = mean_of(alternate)?;
        let mean_difference = mean_of(&diff)?;
        let max_absolute_difference = diff.iter().fold(0.0_f64, |m, v| nan_max(m, v.abs()));
        let standard_deviation_of_difference = diff.std(0.0);
        let direction =
            EffectDirection::classify(mean_difference, self.config.direction_threshold);

        tracing::debug!(
            mean_difference,
            max_absolute_difference,
            direction = direction.as_str(),
            "Summarized effect"
        );

        Ok(EffectSummary {
            reference_mean,
            alternate_mean,
            mean_difference,
            max_absolute_difference,
            standard_deviation_of_difference,
            direction,
        })
    }

    /// Rank track scores; see [`top_tracks`]
    pub fn top_tracks(&self, scores: &[f64], k: usize) -> Result<Vec<TrackScore>, PredictError> {
        top_tracks(scores, k)
    }
}

fn mean_of<S, D>(array: &ArrayBase<S, D>) -> Result<f64, PredictError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    array
        .mean()
        .ok_or_else(|| PredictError::empty("prediction arrays have no values"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_classify() {
        assert_eq!(EffectDirection::classify(0.01, 0.001), EffectDirection::Increase);
        assert_eq!(EffectDirection::classify(-0.01, 0.001), EffectDirection::Decrease);
        assert_eq!(EffectDirection::classify(0.0005, 0.001), EffectDirection::NoChange);
        assert_eq!(EffectDirection::classify(0.001, 0.001), EffectDirection::NoChange);
        assert_eq!(EffectDirection::classify(-0.001, 0.001), EffectDirection::NoChange);
    }

    #[test]
    fn test_summarize_identical() {
        let a = array![[0.1, 0.2], [0.3, 0.4]];
        let summary = EffectComputer::default().summarize(&a, &a).unwrap();
        assert_eq!(summary.mean_difference, 0.0);
        assert_eq!(summary.max_absolute_difference, 0.0);
        assert_eq!(summary.standard_deviation_of_difference, 0.0);
        assert_eq!(summary.direction, EffectDirection::NoChange);
    }

    #[test]
    fn test_summarize_nan_propagates() {
        let reference = array![0.0, 0.0, 0.0];
        let alternate = array![5.0, f64::NAN, 1.0];
        let summary = EffectComputer::default()
            .summarize(&reference, &alternate)
            .unwrap();
        assert!(summary.mean_difference.is_nan());
        assert!(summary.max_absolute_difference.is_nan());
        assert!(summary.standard_deviation_of_difference.is_nan());
    }

    #[test]
    fn test_summarize_values() {
        let reference = array![1.0, 2.0, 3.0, 4.0];
        let alternate = array![1.0, 2.0, 3.0, 8.0];
        let summary = EffectComputer::default()
            .summarize(&reference, &alternate)
            .unwrap();
        assert_eq!(summary.reference_mean, 2.5);
        assert_eq!(summary.alternate_mean, 3.5);
        assert_eq!(summary.mean_difference, 1.0);
        assert_eq!(summary.max_absolute_difference, 4.0);
        // diff = [0, 0, 0, 4], population variance = 3
        assert!((summary.standard_deviation_of_difference - 3f64.sqrt()).abs() < 1e-12);
        assert_eq!(summary.direction, EffectDirection::Increase);
    }

    #[test]
    fn test_summarize_decrease() {
        let reference = array![0.5, 0.5];
        let alternate = array![0.4, 0.45];
        let summary = EffectComputer::default()
            .summarize(&reference, &alternate)
            .unwrap();
        assert_eq!(summary.direction, EffectDirection::Decrease);
    }

    #[test]
    fn test_summarize_shape_mismatch() {
        let reference = Array2::<f64>::zeros((100, 3));
        let alternate = Array2::<f64>::zeros((100, 2));
        assert_eq!(
            EffectComputer::default().summarize(&reference, &alternate),
            Err(PredictError::ShapeMismatch {
                reference: vec![100, 3],
                alternate: vec![100, 2],
            })
        );
    }

    #[test]
    fn test_summarize_empty() {
        let a = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            EffectComputer::default().summarize(&a, &a),
            Err(PredictError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_custom_threshold() {
        let computer = EffectComputer::new(EffectConfig::with_threshold(0.5).unwrap());
        let summary = computer
            .summarize(&array![0.0, 0.0], &array![0.1, 0.1])
            .unwrap();
        assert_eq!(summary.direction, EffectDirection::NoChange);
    }

    #[test]
    fn test_summary_json_field_names() {
        let a = array![1.0];
        let summary = EffectComputer::default().summarize(&a, &a).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        for key in [
            "referenceMean",
            "alternateMean",
            "meanDifference",
            "maxAbsoluteDifference",
            "standardDeviationOfDifference",
            "direction",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["direction"], "NO_CHANGE");
    }
}
