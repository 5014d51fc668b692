//! Configuration for the prediction web service
//!
//! Extends the shared [`PredictConfig`] sections with `[server]`.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! max_request_size = "10MB"
//!
//! [prediction]
//! backend = "mock"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{AnalysisConfig, ConfigError, PredictConfig, PredictionConfig};
use crate::service::server::parse_size;

/// Main service configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Prediction backend configuration
    #[serde(default)]
    pub prediction: PredictionConfig,
    /// Analysis defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    pub host: String,
    /// Port to listen on (default: 3000)
    pub port: u16,
    /// Maximum request size (default: "10MB")
    pub max_request_size: String,
    /// Public base URL, used only for the info endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_request_size: "10MB".to_string(),
            base_url: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The prediction and analysis sections on their own
    pub fn predict_config(&self) -> PredictConfig {
        PredictConfig {
            prediction: self.prediction.clone(),
            analysis: self.analysis.clone(),
        }
    }

    /// Apply `HOST` and `PORT` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring unparseable PORT"),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "Server port must be greater than 0".to_string(),
            ));
        }
        parse_size(&self.server.max_request_size).map_err(ConfigError::Invalid)?;
        self.predict_config().validate()
    }
}
