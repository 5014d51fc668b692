//! Sequence lengths accepted by the prediction service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PredictError;

/// One of the fixed input widths the prediction model accepts
///
/// The labels follow the service's own naming, which rounds the two middle
/// sizes loosely ("100KB" is 2^17 bp).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub enum SequenceLength {
    /// 2,048 bp
    Kb2,
    /// 16,384 bp
    Kb16,
    /// 131,072 bp
    Kb100,
    /// 524,288 bp
    Kb500,
    /// 1,048,576 bp
    #[default]
    Mb1,
}

impl SequenceLength {
    /// Width in base pairs
    pub const fn bp(&self) -> u64 {
        match self {
            SequenceLength::Kb2 => 2_048,
            SequenceLength::Kb16 => 16_384,
            SequenceLength::Kb100 => 131_072,
            SequenceLength::Kb500 => 524_288,
            SequenceLength::Mb1 => 1_048_576,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            SequenceLength::Kb2 => "2KB",
            SequenceLength::Kb16 => "16KB",
            SequenceLength::Kb100 => "100KB",
            SequenceLength::Kb500 => "500KB",
            SequenceLength::Mb1 => "1MB",
        }
    }

    /// All lengths, shortest first
    pub const fn all() -> &'static [SequenceLength] {
        &[
            SequenceLength::Kb2,
            SequenceLength::Kb16,
            SequenceLength::Kb100,
            SequenceLength::Kb500,
            SequenceLength::Mb1,
        ]
    }

    /// Exact match on a width in base pairs
    pub fn from_bp(bp: u64) -> Option<Self> {
        Self::all().iter().copied().find(|l| l.bp() == bp)
    }

    /// Smallest length that is at least `width`, or 1MB for anything larger
    pub fn covering(width: u64) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.bp() >= width)
            .unwrap_or(SequenceLength::Mb1)
    }
}

impl fmt::Display for SequenceLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SequenceLength {
    type Err = PredictError;

    /// Accept a label (`"1MB"`, case-insensitive) or an exact bp count
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(length) = Self::all()
            .iter()
            .find(|l| l.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*length);
        }
        match trimmed.replace([',', '_'], "").parse::<u64>() {
            Ok(bp) => Self::from_bp(bp).ok_or(PredictError::UnsupportedLength { width: bp }),
            Err(_) => Err(PredictError::invalid_input(
                s,
                "expected 2KB, 16KB, 100KB, 500KB, 1MB or a supported width in bp",
            )),
        }
    }
}

impl TryFrom<u64> for SequenceLength {
    type Error = PredictError;

    fn try_from(bp: u64) -> Result<Self, Self::Error> {
        Self::from_bp(bp).ok_or(PredictError::UnsupportedLength { width: bp })
    }
}

impl From<SequenceLength> for u64 {
    fn from(length: SequenceLength) -> Self {
        length.bp()
    }
}
