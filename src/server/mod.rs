//! HTTP surface for the sharelist server.

pub mod auth;
mod error;
pub mod routes;

pub use auth::{generate_api_key, ApiKeyEntry, ApiKeyStore, AuthUser, ServerConfigFile};
pub use routes::router;

use std::sync::Arc;

use crate::service::ShareList;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub app: ShareList,
    pub api_keys: Arc<ApiKeyStore>,
}
