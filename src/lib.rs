// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-predict: region normalization and variant effect summaries for
//! genomic sequence-to-function prediction services
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! # Example
//!
//! ```
//! use ferro_predict::{EffectComputer, EffectDirection, GenomicInterval, RegionNormalizer};
//! use ndarray::array;
//!
//! // Validate an interval against the supported model input lengths
//! let normalizer = RegionNormalizer::new();
//! let interval: GenomicInterval = "chr22:35677410-36725986".parse().unwrap();
//! assert!(normalizer.validate(&interval).is_ok());
//!
//! // Summarize how an alternate allele changes a prediction
//! let computer = EffectComputer::default();
//! let reference = array![[0.4, 0.4], [0.4, 0.4]];
//! let alternate = array![[0.42, 0.42], [0.424, 0.424]];
//! let summary = computer.summarize(&reference, &alternate).unwrap();
//! assert_eq!(summary.direction, EffectDirection::Increase);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod effect;
pub mod error;
pub mod genome;
pub mod prediction;
pub mod region;
#[cfg(feature = "web-service")]
pub mod service;

// Re-export commonly used types
pub use analysis::{Analyzer, IntervalAnalysisRequest, VariantAnalysisRequest};
pub use config::{ConfigError, PredictConfig};
pub use credentials::{ApiKey, CredentialResolver};
pub use effect::{EffectComputer, EffectConfig, EffectDirection, EffectSummary, TrackScore};
pub use error::{ErrorCode, PredictError};
pub use genome::{GenomicInterval, GenomicVariant, VariantType};
pub use prediction::{
    ClientHandle, HttpPredictionClient, MockPredictionClient, OutputType, PredictionClient,
};
pub use region::{RegionNormalizer, SequenceLength};

/// Result type alias for ferro-predict operations
pub type Result<T> = std::result::Result<T, PredictError>;
