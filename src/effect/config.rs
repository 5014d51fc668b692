//! Effect computation configuration

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Default magnitude a mean difference must exceed to count as a change
pub const DEFAULT_DIRECTION_THRESHOLD: f64 = 0.001;

/// Configuration for [`EffectComputer`](super::EffectComputer)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// `meanDifference` above this is INCREASE, below its negation DECREASE
    pub direction_threshold: f64,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
        }
    }
}

impl EffectConfig {
    /// Create a config with a custom threshold
    ///
    /// The threshold must be finite and non-negative.
    pub fn with_threshold(threshold: f64) -> Result<Self, PredictError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PredictError::invalid_input(
                threshold.to_string(),
                "direction threshold must be a finite, non-negative number",
            ));
        }
        Ok(Self {
            direction_threshold: threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(EffectConfig::default().direction_threshold, 0.001);
    }

    #[test]
    fn test_with_threshold() {
        assert_eq!(
            EffectConfig::with_threshold(0.05).unwrap().direction_threshold,
            0.05
        );
        assert_eq!(EffectConfig::with_threshold(0.0).unwrap().direction_threshold, 0.0);
    }

    #[test]
    fn test_with_threshold_rejects_invalid() {
        for threshold in [-0.05, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                EffectConfig::with_threshold(threshold),
                Err(PredictError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_deserialize_missing_field() {
        let config: EffectConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EffectConfig::default());
    }
}
