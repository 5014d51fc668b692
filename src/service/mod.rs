//! Web service for region normalization, effect computation and prediction
//!
//! Every route answers with the same envelope:
//!
//! ```json
//! {"success": true, "data": {...}, "timestamp": "2025-01-01T00:00:00+00:00"}
//! {"success": false, "error": "Not found", "timestamp": "2025-01-01T00:00:00+00:00"}
//! ```
//!
//! The prediction client is built lazily on the first request that needs
//! it, so the service starts without credentials and picks them up later.

pub mod config;
pub mod handlers;
pub mod server;
pub mod types;

pub use config::{ServerConfig, ServiceConfig};
pub use server::{create_app, create_app_with_state, handle_404, AppState};
pub use types::*;
