//! Sharelist HTTP server
//!
//! Serves friend requests, friends lists and shop sharing to callers
//! authenticated with an API key.
//!
//! # Configuration
//!
//! Environment variables:
//! - `SHARELIST_PORT`: Port to listen on (default: 8080)
//! - `SHARELIST_DATABASE_PATH`: SQLite database (default: ~/.local/share/sharelist-server/sharelist.db)
//! - `SHARELIST_CONFIG`: Path to config file (default: ~/.config/sharelist-server/config.yaml)
//!
//! # Config File Format
//!
//! ```yaml
//! api_keys:
//!   - key: "your-secret-key-here"
//!     user_id: "alice"
//!     email: "alice@example.com"
//!     display_name: "Alice"
//! ```
//!
//! Keys can be minted with `sharelist-admin key new`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharelist::server::{router, ApiKeyStore, AppState};
use sharelist::{init_db, ShareList};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// SQLite database file
    database_path: PathBuf,
    /// Path to config file
    config_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("SHARELIST_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let database_path = std::env::var("SHARELIST_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("sharelist-server")
                    .join("sharelist.db")
            });

        let config_path = std::env::var("SHARELIST_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("sharelist-server")
                    .join("config.yaml")
            });

        Self {
            port,
            database_path,
            config_path,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharelist=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Database: {}", config.database_path.display());
    tracing::info!("Config file: {}", config.config_path.display());

    let pool = match init_db(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let api_keys = Arc::new(ApiKeyStore::load(&config.config_path));

    let state = AppState {
        app: ShareList::from_pool(pool),
        api_keys,
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
