//! Region normalization
//!
//! The prediction service only accepts intervals whose width is one of a
//! handful of fixed [`SequenceLength`]s. [`RegionNormalizer`] validates
//! caller-supplied intervals against that rule and builds windows of a
//! supported width around an interval midpoint or a variant position.
//!
//! # Example
//!
//! ```
//! use ferro_predict::genome::GenomicInterval;
//! use ferro_predict::region::{RegionNormalizer, SequenceLength};
//!
//! let normalizer = RegionNormalizer::new();
//! let requested = GenomicInterval::new("chr22", 36_000_000, 36_000_500).unwrap();
//! let resized = normalizer.resize(&requested, SequenceLength::Kb2);
//! assert_eq!(resized.width(), 2048);
//! assert!(normalizer.validate(&resized).is_ok());
//! ```

mod length;

pub use length::SequenceLength;

use crate::error::PredictError;
use crate::genome::{is_valid_chromosome, GenomicInterval, GenomicVariant};

/// Validates and resizes genomic intervals
///
/// Stateless; every method is a pure function of its arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionNormalizer;

impl RegionNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Check coordinates, then the chromosome name, then the width
    pub fn validate(&self, interval: &GenomicInterval) -> Result<GenomicInterval, PredictError> {
        interval.check_coordinates()?;

        if !is_valid_chromosome(interval.chromosome()) {
            return Err(PredictError::InvalidChromosome {
                chromosome: interval.chromosome().to_string(),
            });
        }

        let width = interval.width();
        if SequenceLength::from_bp(width).is_none() {
            return Err(PredictError::UnsupportedLength { width });
        }

        Ok(interval.clone())
    }

    /// Center a window of `length` on the interval midpoint
    ///
    /// A window that would start before position 1 is shifted to start at 1.
    /// The result always has `width() == length.bp()`.
    pub fn resize(&self, interval: &GenomicInterval, length: SequenceLength) -> GenomicInterval {
        let (start, end) = centered_window(interval.midpoint(), length.bp());
        tracing::debug!(
            from = %interval,
            to_start = start,
            to_end = end,
            length = length.label(),
            "Resized interval"
        );
        GenomicInterval::new_unchecked(interval.chromosome(), start, end)
    }

    /// Build a window of `length` centered on `position`
    ///
    /// Fails with `InvalidCoordinate` for position 0 or a window that would
    /// overflow, and with `PositionOutOfRange` if the window cannot hold the
    /// position.
    pub fn fit_variant_window(
        &self,
        chromosome: &str,
        position: u64,
        length: SequenceLength,
    ) -> Result<GenomicInterval, PredictError> {
        if position == 0 {
            return Err(PredictError::coordinate("variant position must be >= 1"));
        }
        let bp = length.bp();
        if position > u64::MAX - bp {
            return Err(PredictError::coordinate(format!(
                "a {} window around position {} overflows",
                length.label(),
                position
            )));
        }

        let (start, end) = centered_window(position, bp);
        let interval = GenomicInterval::new_unchecked(chromosome, start, end);
        if !interval.contains(position) {
            return Err(PredictError::PositionOutOfRange {
                position,
                interval: interval.to_string(),
            });
        }
        Ok(interval)
    }

    /// [`fit_variant_window`](Self::fit_variant_window) for a variant
    pub fn window_for_variant(
        &self,
        variant: &GenomicVariant,
        length: SequenceLength,
    ) -> Result<GenomicInterval, PredictError> {
        self.fit_variant_window(variant.chromosome(), variant.position(), length)
    }

    /// Ensure a variant sits on the interval's chromosome and inside its bounds
    pub fn check_variant(
        &self,
        interval: &GenomicInterval,
        variant: &GenomicVariant,
    ) -> Result<(), PredictError> {
        if interval.chromosome() != variant.chromosome() {
            return Err(PredictError::InvalidChromosome {
                chromosome: variant.chromosome().to_string(),
            });
        }
        if !interval.contains(variant.position()) {
            return Err(PredictError::PositionOutOfRange {
                position: variant.position(),
                interval: interval.to_string(),
            });
        }
        Ok(())
    }
}

/// `[center - bp/2, center - bp/2 + bp]`, shifted right so start >= 1
fn centered_window(center: u64, bp: u64) -> (u64, u64) {
    let start = center.saturating_sub(bp / 2).max(1).min(u64::MAX - bp);
    (start, start + bp)
}
