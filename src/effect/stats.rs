//! Summary statistics over a single prediction array

use ndarray::{ArrayBase, Data, Dimension};
use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Shape and moments of one prediction array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayStats {
    pub shape: Vec<usize>,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Compute [`ArrayStats`], failing on an empty array
pub fn array_stats<S, D>(array: &ArrayBase<S, D>) -> Result<ArrayStats, PredictError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mean = array
        .mean()
        .ok_or_else(|| PredictError::empty("prediction array has no values"))?;
    let (min, max) = array
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (nan_min(lo, v), nan_max(hi, v))
        });

    Ok(ArrayStats {
        shape: array.shape().to_vec(),
        mean,
        std: array.std(0.0),
        min,
        max,
    })
}

/// `f64::max` that propagates NaN, as numpy reductions do
pub(crate) fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

pub(crate) fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_array_stats() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let stats = array_stats(&a).unwrap();
        assert_eq!(stats.shape, vec![2, 2]);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.std - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_array_stats_nan() {
        let stats = array_stats(&array![1.0, f64::NAN, 3.0]).unwrap();
        assert!(stats.min.is_nan());
        assert!(stats.max.is_nan());
    }

    #[test]
    fn test_array_stats_empty() {
        let a = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            array_stats(&a),
            Err(PredictError::EmptyInput { .. })
        ));
    }
}
