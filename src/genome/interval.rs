//! Genomic intervals

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PredictError;

/// A contiguous range on one chromosome, 1-based with inclusive ends
///
/// The width of an interval is `end - start`, which is the quantity the
/// prediction service checks against its supported sequence lengths.
///
/// # Examples
///
/// ```
/// use ferro_predict::genome::GenomicInterval;
///
/// let interval: GenomicInterval = "chr22:35677410-36725986".parse().unwrap();
/// assert_eq!(interval.width(), 1_048_576);
/// assert!(interval.contains(36_201_698));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicInterval {
    chromosome: String,
    start: u64,
    end: u64,
}

impl GenomicInterval {
    /// Create an interval, rejecting a zero start or `end <= start`
    ///
    /// The chromosome name and the width are checked later by
    /// [`RegionNormalizer::validate`](crate::region::RegionNormalizer::validate).
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64) -> Result<Self, PredictError> {
        let interval = Self {
            chromosome: chromosome.into(),
            start,
            end,
        };
        interval.check_coordinates()?;
        Ok(interval)
    }

    /// Build without checks; callers guarantee `1 <= start < end`
    pub(crate) fn new_unchecked(chromosome: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }

    /// Verify `1 <= start < end`
    ///
    /// Deserialized intervals bypass [`GenomicInterval::new`], so validation
    /// repeats this check.
    pub fn check_coordinates(&self) -> Result<(), PredictError> {
        if self.start == 0 {
            return Err(PredictError::coordinate(format!(
                "start must be >= 1 in {}",
                self
            )));
        }
        if self.end <= self.start {
            return Err(PredictError::coordinate(format!(
                "end must be greater than start in {}",
                self
            )));
        }
        Ok(())
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// `end - start`
    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Center of the interval, rounded down
    pub fn midpoint(&self) -> u64 {
        self.start + self.width() / 2
    }

    /// Whether `position` lies within `[start, end]`
    pub fn contains(&self, position: u64) -> bool {
        (self.start..=self.end).contains(&position)
    }
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

impl FromStr for GenomicInterval {
    type Err = PredictError;

    /// Parse `chrom:start-end`, allowing thousands separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (chromosome, range) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| PredictError::invalid_input(s, "expected chrom:start-end"))?;
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| PredictError::invalid_input(s, "expected chrom:start-end"))?;

        let start = parse_coordinate(start).ok_or_else(|| {
            PredictError::invalid_input(s, format!("invalid start '{}'", start))
        })?;
        let end = parse_coordinate(end)
            .ok_or_else(|| PredictError::invalid_input(s, format!("invalid end '{}'", end)))?;

        if chromosome.is_empty() {
            return Err(PredictError::invalid_input(s, "missing chromosome"));
        }

        GenomicInterval::new(chromosome, start, end)
    }
}

/// Parse a coordinate, ignoring `,` and `_` separators
pub(crate) fn parse_coordinate(s: &str) -> Option<u64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_coordinates() {
        assert!(GenomicInterval::new("chr1", 0, 10).is_err());
        assert!(GenomicInterval::new("chr1", 10, 10).is_err());
        assert!(GenomicInterval::new("chr1", 11, 10).is_err());
        assert!(GenomicInterval::new("chr1", 1, 2).is_ok());
    }

    #[test]
    fn test_width_and_midpoint() {
        let interval = GenomicInterval::new("chr1", 100, 2148).unwrap();
        assert_eq!(interval.width(), 2048);
        assert_eq!(interval.midpoint(), 1124);

        let odd = GenomicInterval::new("chr1", 1, 4).unwrap();
        assert_eq!(odd.midpoint(), 2);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let interval = GenomicInterval::new("chr1", 100, 200).unwrap();
        assert!(interval.contains(100));
        assert!(interval.contains(200));
        assert!(!interval.contains(99));
        assert!(!interval.contains(201));
    }

    #[test]
    fn test_parse() {
        let interval: GenomicInterval = "chr22:35677410-36725986".parse().unwrap();
        assert_eq!(interval.chromosome(), "chr22");
        assert_eq!(interval.start(), 35_677_410);
        assert_eq!(interval.end(), 36_725_986);
    }

    #[test]
    fn test_parse_with_separators() {
        let interval: GenomicInterval = "chr22:35,677,410-36,725,986".parse().unwrap();
        assert_eq!(interval.width(), 1_048_576);
    }

    #[test]
    fn test_parse_errors() {
        assert!("chr22".parse::<GenomicInterval>().is_err());
        assert!("chr22:100".parse::<GenomicInterval>().is_err());
        assert!("chr22:abc-200".parse::<GenomicInterval>().is_err());
        assert!(":100-200".parse::<GenomicInterval>().is_err());
        assert!(matches!(
            "chr22:200-100".parse::<GenomicInterval>(),
            Err(PredictError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        let interval = GenomicInterval::new("chrX", 5, 2053).unwrap();
        assert_eq!(interval.to_string(), "chrX:5-2053");
        assert_eq!(interval.to_string().parse::<GenomicInterval>().unwrap(), interval);
    }

    #[test]
    fn test_serde_field_names() {
        let interval = GenomicInterval::new("chr22", 10, 20).unwrap();
        let json = serde_json::to_value(&interval).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"chromosome": "chr22", "start": 10, "end": 20})
        );
    }
}
