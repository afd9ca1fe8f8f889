mod friendship_repo;
mod shop_repo;
mod user_repo;

pub use friendship_repo::FriendshipRepository;
pub use shop_repo::ShopRepository;
pub use user_repo::UserRepository;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ShareError;

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!("Database ready at {}", path.display());

    Ok(pool)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_uuid(value: &str) -> Result<Uuid, ShareError> {
    Uuid::parse_str(value).map_err(|e| ShareError::Corrupt(format!("bad id '{}': {}", value, e)))
}
