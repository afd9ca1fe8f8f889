//! API-key authentication.
//!
//! Keys are listed in the server config file. Each key maps to the
//! identity it authenticates, which is mirrored into the users table the
//! first time it is seen.
//!
//! ```yaml
//! api_keys:
//!   - key: "your-secret-key-here"
//!     user_id: "alice"
//!     email: "alice@example.com"
//!     display_name: "Alice"
//! ```

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::error::ErrorBody;
use super::AppState;
use crate::models::User;

/// API key entry in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyEntry {
    pub key: String,
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Config file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfigFile {
    #[serde(default)]
    pub api_keys: Vec<ApiKeyEntry>,
}

/// Authenticated user info, added to request extensions after auth
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

impl AuthUser {
    pub fn to_user(&self) -> User {
        User::new(&self.user_id, &self.email, &self.display_name)
    }
}

/// API key store - maps key -> AuthUser
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    keys: HashMap<String, AuthUser>,
}

impl ApiKeyStore {
    pub fn from_entries(entries: Vec<ApiKeyEntry>) -> Self {
        let keys = entries
            .into_iter()
            .map(|entry| {
                let user = AuthUser {
                    user_id: entry.user_id,
                    email: entry.email,
                    display_name: entry.display_name.unwrap_or_default(),
                };
                (entry.key, user)
            })
            .collect();
        Self { keys }
    }

    /// Load API keys from config file.
    ///
    /// A missing or unreadable file yields an empty store.
    pub fn load(config_path: &Path) -> Self {
        let store = match std::fs::read_to_string(config_path) {
            Ok(contents) => match serde_yaml::from_str::<ServerConfigFile>(&contents) {
                Ok(config) => Self::from_entries(config.api_keys),
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        };

        if store.is_empty() {
            tracing::warn!("No API keys loaded - all authenticated requests will fail");
        } else {
            tracing::info!("Loaded {} API key(s)", store.len());
        }
        store
    }

    /// Validate an API key and return the associated user
    pub fn validate(&self, key: &str) -> Option<AuthUser> {
        self.keys.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn unauthorized(error: &'static str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let api_key = match auth_header {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(key) => key,
            None => {
                return unauthorized(
                    "invalid_auth",
                    "Authorization header must use Bearer scheme",
                )
            }
        },
        None => return unauthorized("missing_auth", "Authorization header required"),
    };

    let Some(user) = state.api_keys.validate(api_key) else {
        return unauthorized("invalid_key", "Invalid API key");
    };

    // First successful login creates the user record
    if let Err(e) = state.app.register_user(&user.to_user()).await {
        return e.into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Generates a secure random API key.
///
/// Returns 32 random bytes encoded as base64url (no padding).
pub fn generate_api_key() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
