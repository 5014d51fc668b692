//! Configuration shared by the CLI and the web service.
//!
//! Both binaries read the same TOML file. The library only looks at the
//! `[prediction]` and `[analysis]` sections; the web service adds
//! `[server]` on top.
//!
//! # Example Configuration
//!
//! ```toml
//! [prediction]
//! backend = "http"
//! api_url = "https://predict.example.org"
//! api_key_env = "ALPHA_GENOME_API_KEY"
//!
//! [analysis]
//! direction_threshold = 0.001
//! default_outputs = ["RNA_SEQ"]
//! default_ontology_terms = ["UBERON:0001157"]
//! variant_window = 1048576
//! top_tracks = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::credentials::{CredentialResolver, DEFAULT_API_KEY_VAR};
use crate::effect::{EffectConfig, DEFAULT_DIRECTION_THRESHOLD};
use crate::error::PredictError;
use crate::prediction::{OutputType, DEFAULT_ONTOLOGY_TERM};
use crate::region::SequenceLength;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading or writing the config file.
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML could not be written.
    #[error("Config write error: {0}")]
    Write(#[from] toml::ser::Error),
    /// Values parsed but are not usable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Parsed `[prediction]` and `[analysis]` sections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictConfig {
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Which prediction backend to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionBackend {
    /// Remote service over HTTP (needs an API key)
    #[default]
    Http,
    /// Deterministic synthetic predictions
    Mock,
}

/// Prediction backend settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub backend: PredictionBackend,
    /// Base URL of the prediction service
    pub api_url: String,
    /// Environment variable (and `.env` key) holding the API key
    pub api_key_env: String,
    /// `.env` files to search; the resolver defaults when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_files: Option<Vec<PathBuf>>,
    /// Bin size in bp for the mock backend
    pub mock_resolution: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            backend: PredictionBackend::default(),
            api_url: "http://localhost:8700".to_string(),
            api_key_env: DEFAULT_API_KEY_VAR.to_string(),
            env_files: None,
            mock_resolution: crate::prediction::MockPredictionClient::DEFAULT_RESOLUTION,
        }
    }
}

impl PredictionConfig {
    /// Credential resolver for these settings
    pub fn credential_resolver(&self) -> CredentialResolver {
        let resolver = CredentialResolver::new(&self.api_key_env);
        match &self.env_files {
            Some(paths) => resolver.with_search_paths(paths.clone()),
            None => resolver,
        }
    }
}

/// Defaults applied to analysis requests.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Mean difference magnitude that counts as an effect
    pub direction_threshold: f64,
    /// Outputs used when a request names none
    pub default_outputs: Vec<OutputType>,
    /// Ontology terms used when a request names none
    pub default_ontology_terms: Vec<String>,
    /// Window built around a variant when no interval is given
    pub variant_window: SequenceLength,
    /// Number of tracks ranked per output
    pub top_tracks: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
            default_outputs: vec![OutputType::RnaSeq],
            default_ontology_terms: vec![DEFAULT_ONTOLOGY_TERM.to_string()],
            variant_window: SequenceLength::Mb1,
            top_tracks: 5,
        }
    }
}

impl AnalysisConfig {
    pub fn effect_config(&self) -> Result<EffectConfig, PredictError> {
        EffectConfig::with_threshold(self.direction_threshold)
    }
}

impl PredictConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid =
            |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };

        if self.prediction.backend == PredictionBackend::Http
            && self.prediction.api_url.trim().is_empty()
        {
            return invalid("prediction.api_url must be set for the http backend");
        }
        if self.prediction.api_key_env.trim().is_empty() {
            return invalid("prediction.api_key_env must not be empty");
        }
        if self.prediction.mock_resolution == 0 {
            return invalid("prediction.mock_resolution must be greater than 0");
        }
        if let Err(e) = self.analysis.effect_config() {
            return Err(ConfigError::Invalid(format!("analysis.direction_threshold: {}", e)));
        }
        if self.analysis.default_outputs.is_empty() {
            return invalid("analysis.default_outputs must name at least one output");
        }
        if self.analysis.top_tracks == 0 {
            return invalid("analysis.top_tracks must be greater than 0");
        }
        Ok(())
    }
}
