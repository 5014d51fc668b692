//! Process-wide prediction client handle

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

use super::{HttpPredictionClient, MockPredictionClient, PredictionClient};
use crate::config::{PredictionBackend, PredictionConfig};
use crate::error::PredictError;

type ClientFactory =
    Box<dyn Fn() -> Result<Arc<dyn PredictionClient>, PredictError> + Send + Sync>;

/// Lazily-built, shared prediction client
///
/// The client is built on first successful [`get`](Self::get) and reused
/// afterwards. A failed build (say, no API key yet) leaves the handle
/// empty, so a later call tries again.
pub struct ClientHandle {
    cell: OnceCell<Arc<dyn PredictionClient>>,
    factory: ClientFactory,
}

impl ClientHandle {
    /// Handle that builds its client with `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn PredictionClient>, PredictError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Handle that is already initialized with `client`
    pub fn with_client(client: Arc<dyn PredictionClient>) -> Self {
        let handle = Self::new(|| Err(PredictError::service("client factory not available")));
        let _ = handle.cell.set(client);
        handle
    }

    /// Handle that builds the backend named in `config`
    pub fn from_config(config: &PredictionConfig) -> Self {
        let config = config.clone();
        Self::new(move || build_client(&config))
    }

    /// The client, building it on first use
    pub fn get(&self) -> Result<Arc<dyn PredictionClient>, PredictError> {
        self.cell
            .get_or_try_init(|| {
                let client = (self.factory)()?;
                tracing::info!(backend = client.backend_name(), "Prediction client initialized");
                Ok(client)
            })
            .map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Backend name, if the client has been built
    pub fn backend_name(&self) -> Option<&'static str> {
        self.cell.get().map(|c| c.backend_name())
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("initialized", &self.is_initialized())
            .field("backend", &self.backend_name())
            .finish()
    }
}

fn build_client(config: &PredictionConfig) -> Result<Arc<dyn PredictionClient>, PredictError> {
    match config.backend {
        PredictionBackend::Mock => Ok(Arc::new(MockPredictionClient::new(config.mock_resolution))),
        PredictionBackend::Http => {
            let key = config.credential_resolver().require()?;
            Ok(Arc::new(HttpPredictionClient::new(&config.api_url, key)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builds_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let handle = ClientHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockPredictionClient::default()) as Arc<dyn PredictionClient>)
        });

        assert!(!handle.is_initialized());
        let first = handle.get().unwrap();
        let second = handle.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(handle.backend_name(), Some("mock"));
    }

    #[test]
    fn test_failed_init_retries() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let handle = ClientHandle::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(PredictError::MissingCredential {
                    name: "KEY".to_string(),
                })
            } else {
                Ok(Arc::new(MockPredictionClient::default()) as Arc<dyn PredictionClient>)
            }
        });

        assert!(handle.get().is_err());
        assert!(!handle.is_initialized());
        assert!(handle.get().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_missing_key() {
        let config = PredictionConfig {
            api_key_env: "FERRO_PREDICT_TEST_UNSET_KEY".to_string(),
            env_files: Some(vec![]),
            ..PredictionConfig::default()
        };
        let handle = ClientHandle::from_config(&config);
        assert!(matches!(
            handle.get(),
            Err(PredictError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_from_config_mock() {
        let config = PredictionConfig {
            backend: PredictionBackend::Mock,
            ..PredictionConfig::default()
        };
        let handle = ClientHandle::from_config(&config);
        assert_eq!(handle.get().unwrap().backend_name(), "mock");
    }
}
