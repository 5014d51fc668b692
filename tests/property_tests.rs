//! Property-based tests for region normalization and effect computation
//!
//! Uses proptest to check invariants that must hold for any input.

use ferro_predict::{
    EffectComputer, EffectDirection, GenomicInterval, RegionNormalizer, SequenceLength,
};
use ndarray::Array2;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// =============================================================================
// Strategies
// =============================================================================

fn chromosome() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..=22).prop_map(|n| format!("chr{}", n)),
        Just("chrX".to_string()),
        Just("chrY".to_string()),
    ]
}

fn sequence_length() -> impl Strategy<Value = SequenceLength> {
    prop::sample::select(SequenceLength::all().to_vec())
}

fn interval() -> impl Strategy<Value = GenomicInterval> {
    (chromosome(), 1u64..250_000_000, 1u64..5_000_000).prop_map(|(chrom, start, width)| {
        GenomicInterval::new(chrom, start, start + width).unwrap()
    })
}

/// Pair of equally-shaped arrays with values in [0, 1)
fn array_pair() -> impl Strategy<Value = (Array2<f64>, Array2<f64>)> {
    (1usize..16, 1usize..6).prop_flat_map(|(rows, cols)| {
        let n = rows * cols;
        (
            prop::collection::vec(0.0f64..1.0, n),
            prop::collection::vec(0.0f64..1.0, n),
        )
            .prop_map(move |(a, b)| {
                (
                    Array2::from_shape_vec((rows, cols), a).unwrap(),
                    Array2::from_shape_vec((rows, cols), b).unwrap(),
                )
            })
    })
}

// =============================================================================
// Region normalizer
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_resize_has_target_width(interval in interval(), length in sequence_length()) {
        let resized = RegionNormalizer::new().resize(&interval, length);
        prop_assert_eq!(resized.width(), length.bp());
        prop_assert!(resized.start() >= 1);
        prop_assert_eq!(resized.chromosome(), interval.chromosome());
    }

    #[test]
    fn prop_resize_then_validate_succeeds(interval in interval(), length in sequence_length()) {
        let normalizer = RegionNormalizer::new();
        let resized = normalizer.resize(&interval, length);
        prop_assert!(normalizer.validate(&resized).is_ok());
    }

    #[test]
    fn prop_validate_accepts_only_supported_widths(interval in interval()) {
        let supported = SequenceLength::from_bp(interval.width()).is_some();
        prop_assert_eq!(RegionNormalizer::new().validate(&interval).is_ok(), supported);
    }

    #[test]
    fn prop_variant_window_contains_position(
        chrom in chromosome(),
        position in 1u64..250_000_000,
        length in sequence_length(),
    ) {
        let window = RegionNormalizer::new()
            .fit_variant_window(&chrom, position, length)
            .unwrap();
        prop_assert!(window.contains(position));
        prop_assert_eq!(window.width(), length.bp());
    }

    #[test]
    fn prop_interval_display_parses_back(interval in interval()) {
        let parsed: GenomicInterval = interval.to_string().parse().unwrap();
        prop_assert_eq!(parsed, interval);
    }
}

// =============================================================================
// Effect computer
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_summarize_is_antisymmetric((reference, alternate) in array_pair()) {
        let computer = EffectComputer::default();
        let forward = computer.summarize(&reference, &alternate).unwrap();
        let backward = computer.summarize(&alternate, &reference).unwrap();

        prop_assert!((forward.mean_difference + backward.mean_difference).abs() < 1e-9);
        prop_assert!((forward.max_absolute_difference - backward.max_absolute_difference).abs() < 1e-12);
        match forward.direction {
            EffectDirection::Increase => prop_assert_eq!(backward.direction, EffectDirection::Decrease),
            EffectDirection::Decrease => prop_assert_eq!(backward.direction, EffectDirection::Increase),
            EffectDirection::NoChange => prop_assert_eq!(backward.direction, EffectDirection::NoChange),
        }
    }

    #[test]
    fn prop_summarize_self_is_no_change((array, _) in array_pair()) {
        let summary = EffectComputer::default().summarize(&array, &array).unwrap();
        prop_assert_eq!(summary.mean_difference, 0.0);
        prop_assert_eq!(summary.direction, EffectDirection::NoChange);
    }

    #[test]
    fn prop_summary_bounds((reference, alternate) in array_pair()) {
        let summary = EffectComputer::default().summarize(&reference, &alternate).unwrap();
        prop_assert!(summary.mean_difference.abs() <= summary.max_absolute_difference + 1e-12);
        prop_assert!(summary.standard_deviation_of_difference >= 0.0);
    }

    #[test]
    fn prop_top_tracks_sorted_and_bounded(
        scores in prop::collection::vec(-10.0f64..10.0, 1..64),
        k in 0usize..80,
    ) {
        let tracks = EffectComputer::default().top_tracks(&scores, k).unwrap();
        prop_assert_eq!(tracks.len(), k.min(scores.len()));
        for pair in tracks.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].track_index < pair[1].track_index);
            }
        }
        for track in &tracks {
            prop_assert_eq!(scores[track.track_index], track.score);
        }
    }
}
