use async_trait::async_trait;
use sqlx::SqlitePool;

use super::parse_timestamp;
use crate::error::Result;
use crate::models::User;
use crate::store::UserDirectory;

pub struct UserRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    display_name: String,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn ensure(&self, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Registered user {}", user.id);
        }

        let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn get(&self, user_id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT * FROM users WHERE email = ? ORDER BY created_at LIMIT 1")
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: UserRepository,
        _temp_dir: TempDir,
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            repo: UserRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_ensure_creates_user() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let user = User::new("alice", "alice@example.com", "Alice");
        let stored = repo.ensure(&user).await.unwrap();

        assert_eq!(stored.id, "alice");
        assert_eq!(stored.display_name, "Alice");
        assert!(repo.get("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ensure_keeps_existing_record() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.ensure(&User::new("alice", "alice@example.com", "Alice"))
            .await
            .unwrap();
        let stored = repo
            .ensure(&User::new("alice", "other@example.com", "Someone Else"))
            .await
            .unwrap();

        assert_eq!(stored.email, "alice@example.com");
        assert_eq!(stored.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.ensure(&User::new("bob", "bob@example.com", "Bob"))
            .await
            .unwrap();

        let found = repo.find_by_email("  bob@example.com ").await.unwrap();
        assert_eq!(found.unwrap().id, "bob");

        assert!(repo
            .find_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
