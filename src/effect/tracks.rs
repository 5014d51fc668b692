//! Per-track scoring and ranking

use ndarray::{ArrayBase, Axis, Data, Dimension, RemoveAxis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::PredictError;

/// A track and its score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackScore {
    pub track_index: usize,
    pub score: f64,
}

impl From<(usize, f64)> for TrackScore {
    fn from((track_index, score): (usize, f64)) -> Self {
        Self { track_index, score }
    }
}

/// The `k` largest scores, highest first
///
/// Equal scores keep ascending track order. NaN scores sort after every
/// number. Fewer than `k` entries come back when fewer exist.
pub fn top_tracks(scores: &[f64], k: usize) -> Result<Vec<TrackScore>, PredictError> {
    if scores.is_empty() {
        return Err(PredictError::empty("no track scores to rank"));
    }

    let mut ranked: Vec<TrackScore> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| TrackScore::from((i, s)))
        .collect();
    // sort_by is stable, so ties stay in index order
    ranked.sort_by(|a, b| descending(a.score, b.score));
    ranked.truncate(k);
    Ok(ranked)
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Mean of each track, where tracks run along the last axis
pub fn track_scores<S, D>(array: &ArrayBase<S, D>) -> Result<Vec<f64>, PredictError>
where
    S: Data<Elem = f64>,
    D: Dimension + RemoveAxis,
{
    if array.ndim() == 0 || array.is_empty() {
        return Err(PredictError::empty("prediction array has no tracks"));
    }
    let last = Axis(array.ndim() - 1);
    array
        .axis_iter(last)
        .map(|track| {
            track
                .mean()
                .ok_or_else(|| PredictError::empty("track has no positions"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_top_tracks_ties_by_index() {
        let top = top_tracks(&[0.1, 0.5, 0.3, 0.5], 2).unwrap();
        assert_eq!(
            top,
            vec![TrackScore::from((1, 0.5)), TrackScore::from((3, 0.5))]
        );
    }

    #[test]
    fn test_top_tracks_fewer_than_k() {
        let top = top_tracks(&[0.2, 0.9], 5).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].track_index, 1);
    }

    #[test]
    fn test_top_tracks_zero_k() {
        assert!(top_tracks(&[0.2, 0.9], 0).unwrap().is_empty());
    }

    #[test]
    fn test_top_tracks_empty() {
        assert!(matches!(
            top_tracks(&[], 3),
            Err(PredictError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_top_tracks_nan_last() {
        let top = top_tracks(&[f64::NAN, -1.0, 2.0], 3).unwrap();
        assert_eq!(top[0].track_index, 2);
        assert_eq!(top[1].track_index, 1);
        assert!(top[2].score.is_nan());
    }

    #[test]
    fn test_track_scores_last_axis() {
        let a = array![[1.0, 10.0, 100.0], [3.0, 20.0, 300.0]];
        assert_eq!(track_scores(&a).unwrap(), vec![2.0, 15.0, 200.0]);
    }

    #[test]
    fn test_track_scores_one_dimensional() {
        let a = array![0.5, 0.25];
        assert_eq!(track_scores(&a).unwrap(), vec![0.5, 0.25]);
    }

    #[test]
    fn test_track_scores_empty() {
        let a = Array1::<f64>::zeros(0);
        assert!(track_scores(&a).is_err());
    }

    #[test]
    fn test_track_score_serializes_camel_case() {
        let json = serde_json::to_value(TrackScore::from((4, 1.5))).unwrap();
        assert_eq!(json, serde_json::json!({"trackIndex": 4, "score": 1.5}));
    }
}
