//! Mock prediction backend for offline use and testing

use ndarray::Array2;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{OutputBundle, OutputType, PredictionClient, PredictionOutput, PredictionRequest};
use crate::effect::PredictionArray;
use crate::error::PredictError;
use crate::genome::{GenomicInterval, GenomicVariant};

/// Tracks generated per output type
const MOCK_TRACKS: usize = 3;

/// Half-width in bp of the region the alternate allele perturbs
const EFFECT_RADIUS: u64 = 4_096;

#[derive(Debug, Clone)]
enum Mode {
    Synthetic { resolution: u64 },
    Fixed(PredictionOutput),
    Failing(String),
}

/// Prediction client that fabricates deterministic tracks
///
/// Synthetic arrays are `positions x tracks`, one row per `resolution` bp
/// bin. For variant requests the alternate tracks differ from the
/// reference only in bins near the variant.
#[derive(Debug)]
pub struct MockPredictionClient {
    mode: Mode,
    calls: AtomicUsize,
}

impl Default for MockPredictionClient {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESOLUTION)
    }
}

impl MockPredictionClient {
    /// Default bin size in bp
    pub const DEFAULT_RESOLUTION: u64 = 128;

    /// Synthetic client binning at `resolution` bp
    pub fn new(resolution: u64) -> Self {
        Self::with_mode(Mode::Synthetic {
            resolution: resolution.max(1),
        })
    }

    /// Client that answers every request with `output`
    pub fn with_fixed(output: PredictionOutput) -> Self {
        Self::with_mode(Mode::Fixed(output))
    }

    /// Client whose every call fails with `msg`
    pub fn failing(msg: impl Into<String>) -> Self {
        Self::with_mode(Mode::Failing(msg.into()))
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of predictions requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn synthesize(&self, request: &PredictionRequest, resolution: u64) -> PredictionOutput {
        let reference: OutputBundle = request
            .requested_outputs
            .iter()
            .map(|&output| (output, signal(&request.interval, output, resolution, None)))
            .collect();

        match &request.variant {
            None => PredictionOutput::Interval(reference),
            Some(variant) => {
                let alternate = request
                    .requested_outputs
                    .iter()
                    .map(|&output| {
                        (
                            output,
                            signal(&request.interval, output, resolution, Some(variant)),
                        )
                    })
                    .collect();
                PredictionOutput::Variant {
                    reference,
                    alternate,
                }
            }
        }
    }
}

fn signal(
    interval: &GenomicInterval,
    output: OutputType,
    resolution: u64,
    variant: Option<&GenomicVariant>,
) -> PredictionArray {
    let bins = interval.width().div_ceil(resolution).max(1) as usize;
    let phase = output as usize as f64;

    let shift = variant.map(|v| (v.position(), allele_shift(v)));

    Array2::from_shape_fn((bins, MOCK_TRACKS), |(bin, track)| {
        let bin_start = interval.start() + bin as u64 * resolution;
        let base = 0.5 + 0.4 * ((bin_start as f64) / 10_000.0 + track as f64 + phase).sin();
        match shift {
            Some((position, delta)) => {
                let distance = bin_start.abs_diff(position);
                if distance < EFFECT_RADIUS {
                    let weight = 1.0 - distance as f64 / EFFECT_RADIUS as f64;
                    base + delta * weight
                } else {
                    base
                }
            }
            None => base,
        }
    })
    .into_dyn()
}

/// Signed perturbation derived from the alleles, so different variants differ
fn allele_shift(variant: &GenomicVariant) -> f64 {
    let score = |bases: &str| bases.bytes().map(|b| b as i64).sum::<i64>();
    let diff = score(variant.alternate_bases()) - score(variant.reference_bases());
    let sign = if diff < 0 { -1.0 } else { 1.0 };
    sign * (0.05 + (diff.unsigned_abs() % 7) as f64 * 0.01)
}

#[async_trait::async_trait]
impl PredictionClient for MockPredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutput, PredictError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.mode {
            Mode::Synthetic { resolution } => Ok(self.synthesize(request, *resolution)),
            Mode::Fixed(output) => Ok(output.clone()),
            Mode::Failing(msg) => Err(PredictError::service(msg.clone())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
