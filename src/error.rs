//! Error types for ferro-predict
//!
//! Every failure the normalization and effect layers can report is a
//! variant of [`PredictError`]. Each variant carries a stable [`ErrorCode`]
//! so that the CLI and the web service can report errors programmatically.

use std::fmt;
use thiserror::Error;

use crate::region::SequenceLength;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Region errors (E1xxx)
    /// Interval width is not a supported sequence length
    UnsupportedLength = 1001,
    /// Chromosome name does not follow the chrN convention
    InvalidChromosome = 1002,
    /// Coordinates are malformed (zero, reversed or overflowing)
    InvalidCoordinate = 1003,
    /// Variant position is not inside the interval
    PositionOutOfRange = 1004,
    /// Variant bases outside the A/C/G/T alphabet
    InvalidBases = 1005,
    /// Unparseable region, variant or length text
    InvalidInput = 1006,

    // Effect errors (E2xxx)
    /// Reference and alternate arrays differ in shape
    ShapeMismatch = 2001,
    /// No values to summarize
    EmptyInput = 2002,

    // Collaborator errors (E3xxx)
    /// The external prediction service failed
    PredictionService = 3001,
    /// No API key could be resolved
    MissingCredential = 3002,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedLength => "unsupported sequence length",
            ErrorCode::InvalidChromosome => "invalid chromosome name",
            ErrorCode::InvalidCoordinate => "invalid coordinate",
            ErrorCode::PositionOutOfRange => "position outside interval",
            ErrorCode::InvalidBases => "invalid nucleotide bases",
            ErrorCode::InvalidInput => "unparseable input",
            ErrorCode::ShapeMismatch => "array shape mismatch",
            ErrorCode::EmptyInput => "empty input",
            ErrorCode::PredictionService => "prediction service failure",
            ErrorCode::MissingCredential => "missing API key",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-predict operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Interval width is not one of the service's sequence lengths
    #[error("Unsupported interval length {width} bp (supported: {})", supported_lengths())]
    UnsupportedLength { width: u64 },

    /// Chromosome identifier does not match chr1-22, chrX, chrY, chrM or chrMT
    #[error("Invalid chromosome: {chromosome}")]
    InvalidChromosome { chromosome: String },

    /// Malformed coordinates
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinate { msg: String },

    /// Position does not fall inside the interval
    #[error("Position {position} is outside {interval}")]
    PositionOutOfRange { position: u64, interval: String },

    /// Variant bases contain characters outside A/C/G/T
    #[error("Invalid bases '{bases}': expected only A, C, G or T")]
    InvalidBases { bases: String },

    /// Input text could not be parsed
    #[error("Invalid input '{input}': {msg}")]
    InvalidInput { input: String, msg: String },

    /// Reference and alternate arrays differ in shape
    #[error("Shape mismatch: reference {reference:?} vs alternate {alternate:?}")]
    ShapeMismatch {
        reference: Vec<usize>,
        alternate: Vec<usize>,
    },

    /// Nothing to compute over
    #[error("Empty input: {what}")]
    EmptyInput { what: String },

    /// Opaque failure from the external prediction service
    #[error("Prediction service error: {msg}")]
    PredictionService { msg: String },

    /// No API key was found in the environment or .env files
    #[error("Missing credential: {name} is not set")]
    MissingCredential { name: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl PredictError {
    /// Wrap any external failure as a prediction service error
    pub fn service(msg: impl Into<String>) -> Self {
        PredictError::PredictionService { msg: msg.into() }
    }

    /// Create an input parse error
    pub fn invalid_input(input: impl Into<String>, msg: impl Into<String>) -> Self {
        PredictError::InvalidInput {
            input: input.into(),
            msg: msg.into(),
        }
    }

    /// Create an invalid coordinate error
    pub fn coordinate(msg: impl Into<String>) -> Self {
        PredictError::InvalidCoordinate { msg: msg.into() }
    }

    /// Create an empty input error
    pub fn empty(what: impl Into<String>) -> Self {
        PredictError::EmptyInput { what: what.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            PredictError::UnsupportedLength { .. } => ErrorCode::UnsupportedLength,
            PredictError::InvalidChromosome { .. } => ErrorCode::InvalidChromosome,
            PredictError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            PredictError::PositionOutOfRange { .. } => ErrorCode::PositionOutOfRange,
            PredictError::InvalidBases { .. } => ErrorCode::InvalidBases,
            PredictError::InvalidInput { .. } => ErrorCode::InvalidInput,
            PredictError::ShapeMismatch { .. } => ErrorCode::ShapeMismatch,
            PredictError::EmptyInput { .. } => ErrorCode::EmptyInput,
            PredictError::PredictionService { .. } => ErrorCode::PredictionService,
            PredictError::MissingCredential { .. } => ErrorCode::MissingCredential,
            PredictError::Io { .. } => ErrorCode::IoError,
            PredictError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Whether the error was caused by the caller's input rather than a collaborator
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.code() as u16,
            1000..=2999
        )
    }

    /// A short hint for fixing the error, when one is known
    pub fn hint(&self) -> Option<String> {
        match self {
            PredictError::UnsupportedLength { width } => {
                let covering = SequenceLength::covering(*width);
                Some(format!(
                    "resize the interval to {} ({} bp)",
                    covering.label(),
                    covering.bp()
                ))
            }
            PredictError::InvalidChromosome { chromosome } => {
                suggest_chromosome(chromosome).map(|s| format!("did you mean {}?", s))
            }
            PredictError::MissingCredential { name } => Some(format!(
                "export {} or add it to a .env file",
                name
            )),
            _ => None,
        }
    }
}

fn supported_lengths() -> String {
    SequenceLength::all()
        .iter()
        .map(|l| l.bp().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Suggest a canonical chromosome name for common near-misses ("1", "CHR1", "chr23" is not fixable)
pub fn suggest_chromosome(found: &str) -> Option<String> {
    let trimmed = found.trim();
    let lower = trimmed.to_lowercase();
    let bare = lower.strip_prefix("chr").unwrap_or(&lower);
    let candidate = match bare {
        "x" | "y" | "m" | "mt" => format!("chr{}", bare.to_uppercase()),
        n => match n.parse::<u8>() {
            Ok(num) if (1..=22).contains(&num) => format!("chr{}", num),
            _ => return None,
        },
    };
    if candidate == trimmed {
        None
    } else {
        Some(candidate)
    }
}

impl From<std::io::Error> for PredictError {
    fn from(err: std::io::Error) -> Self {
        PredictError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        PredictError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        PredictError::service(err.to_string())
    }
}
