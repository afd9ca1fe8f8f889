//! Shared fixtures for unit tests.

use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

use crate::db::{init_db, FriendshipRepository, ShopRepository, UserRepository};
use crate::models::User;
use crate::service::ShareList;

pub struct TestContext {
    pub pool: SqlitePool,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn friendships(&self) -> Arc<FriendshipRepository> {
        Arc::new(FriendshipRepository::new(self.pool.clone()))
    }

    pub fn shops(&self) -> Arc<ShopRepository> {
        Arc::new(ShopRepository::new(self.pool.clone()))
    }

    pub fn users(&self) -> Arc<UserRepository> {
        Arc::new(UserRepository::new(self.pool.clone()))
    }

    pub fn app(&self) -> ShareList {
        ShareList::from_pool(self.pool.clone())
    }
}

/// A user whose email and display name derive from the id.
pub fn user(id: &str) -> User {
    User::new(id, format!("{}@example.com", id), id.to_uppercase())
}
