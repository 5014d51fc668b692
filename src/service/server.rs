//! Web server setup using Axum framework

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::prediction::ClientHandle;
use crate::service::{
    config::ServiceConfig,
    handlers,
    types::{ErrorResponse, ServiceError},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Service configuration
    pub config: Arc<ServiceConfig>,
    /// Lazily-built prediction client
    pub client: Arc<ClientHandle>,
    /// Normalize, predict and summarize pipeline
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    /// State whose client is built from `config.prediction` on first use
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = ClientHandle::from_config(&config.prediction);
        Self::with_client(config, client)
    }

    /// State with an explicit client handle
    pub fn with_client(
        config: ServiceConfig,
        client: ClientHandle,
    ) -> Result<Self, ServiceError> {
        let analyzer = Analyzer::new(config.analysis.clone())
            .map_err(|e| ServiceError::ConfigError(e.to_string()))?;
        Ok(Self {
            config: Arc::new(config),
            client: Arc::new(client),
            analyzer: Arc::new(analyzer),
        })
    }
}

/// Create the Axum application with all routes and middleware
pub fn create_app(config: ServiceConfig) -> Result<(Router, AppState), ServiceError> {
    create_app_with_state(AppState::new(config)?)
}

/// Create the Axum application around existing state
pub fn create_app_with_state(state: AppState) -> Result<(Router, AppState), ServiceError> {
    let max_size = parse_size(&state.config.server.max_request_size)
        .map_err(|e| ServiceError::ConfigError(format!("Invalid max_request_size: {}", e)))?;

    let app = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/health", get(handlers::health::health_check))
        // Catalog endpoints
        .route("/api/v1/info", get(handlers::info::service_info))
        .route("/api/v1/outputs", get(handlers::info::supported_outputs))
        .route("/api/v1/tissues", get(handlers::info::tissues))
        // Region normalization
        .route(
            "/api/v1/normalize/interval",
            post(handlers::normalize::normalize_interval),
        )
        .route(
            "/api/v1/normalize/window",
            post(handlers::normalize::variant_window),
        )
        // Effect computation on caller-supplied arrays
        .route("/api/v1/effect/summarize", post(handlers::effect::summarize))
        .route("/api/v1/effect/top-tracks", post(handlers::effect::top_tracks))
        // Prediction
        .route(
            "/api/v1/predict/interval",
            post(handlers::predict::predict_interval),
        )
        .route(
            "/api/v1/predict/variant",
            post(handlers::predict::predict_variant),
        )
        .fallback(handle_404)
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(max_size));

    Ok((app, state))
}

/// Handle 404 errors
pub async fn handle_404() -> (StatusCode, Json<ErrorResponse>) {
    ServiceError::NotFound.into_rejection()
}

/// Parse size strings like "10MB", "1GB", etc.
pub(crate) fn parse_size(size_str: &str) -> Result<usize, String> {
    let size_str = size_str.trim().to_uppercase();
    let invalid = || format!("Invalid size format: {}", size_str);

    // Longer suffixes first so "MB" is not read as "B"
    for (suffix, multiplier) in [("GB", 1usize << 30), ("MB", 1 << 20), ("KB", 1 << 10), ("B", 1)] {
        if let Some(num_str) = size_str.strip_suffix(suffix) {
            let num: usize = num_str.trim().parse().map_err(|_| invalid())?;
            return num.checked_mul(multiplier).ok_or_else(invalid);
        }
    }

    size_str.parse::<usize>().map_err(|_| invalid())
}
