use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::error::{Result, ShareError};
use crate::models::Shop;
use crate::store::ShopStore;

pub struct ShopRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ShopRow {
    id: String,
    name: String,
    owner_id: String,
    shared_with: String,
    created_at: String,
    updated_at: String,
}

impl ShopRow {
    fn into_shop(self) -> Result<Shop> {
        let shared_with: Vec<String> = serde_json::from_str(&self.shared_with).map_err(|e| {
            ShareError::Corrupt(format!("shop {} shared_with: {}", self.id, e))
        })?;

        Ok(Shop {
            id: parse_uuid(&self.id)?,
            name: self.name,
            owner_id: self.owner_id,
            shared_with,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

fn encode_members(members: &[String]) -> String {
    serde_json::to_string(members).unwrap_or_else(|_| "[]".to_string())
}

impl ShopRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShopStore for ShopRepository {
    async fn create(&self, shop: &Shop) -> Result<Shop> {
        sqlx::query(
            r#"
            INSERT INTO shops (id, name, owner_id, shared_with, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(shop.id.to_string())
        .bind(&shop.name)
        .bind(&shop.owner_id)
        .bind(encode_members(&shop.shared_with))
        .bind(shop.created_at.to_rfc3339())
        .bind(shop.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get(shop.id)
            .await?
            .ok_or_else(|| ShareError::NotFound(format!("shop {}", shop.id)))
    }

    async fn get(&self, shop_id: Uuid) -> Result<Option<Shop>> {
        let row: Option<ShopRow> = sqlx::query_as("SELECT * FROM shops WHERE id = ?")
            .bind(shop_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ShopRow::into_shop).transpose()
    }

    async fn list_owned_by(&self, user_id: &str) -> Result<Vec<Shop>> {
        let rows: Vec<ShopRow> =
            sqlx::query_as("SELECT * FROM shops WHERE owner_id = ? ORDER BY created_at")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(ShopRow::into_shop).collect()
    }

    async fn list_shared_with(&self, user_id: &str) -> Result<Vec<Shop>> {
        let rows: Vec<ShopRow> = sqlx::query_as(
            r#"
            SELECT * FROM shops
            WHERE EXISTS (SELECT 1 FROM json_each(shops.shared_with) WHERE json_each.value = ?)
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ShopRow::into_shop).collect()
    }

    async fn set_shared_with(&self, shop_id: Uuid, members: &[String]) -> Result<()> {
        let result = sqlx::query("UPDATE shops SET shared_with = ?, updated_at = ? WHERE id = ?")
            .bind(encode_members(members))
            .bind(Utc::now().to_rfc3339())
            .bind(shop_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ShareError::NotFound(format!("shop {}", shop_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: ShopRepository,
        _temp_dir: TempDir,
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        TestContext {
            repo: ShopRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_shop() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let shop = Shop::new("Costco", "alice");
        let created = repo.create(&shop).await.unwrap();
        assert_eq!(created.id, shop.id);
        assert_eq!(created.name, "Costco");
        assert!(created.shared_with.is_empty());

        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_owned_by() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(&Shop::new("Costco", "alice")).await.unwrap();
        repo.create(&Shop::new("Aeon", "alice")).await.unwrap();
        repo.create(&Shop::new("Lidl", "bob")).await.unwrap();

        let owned = repo.list_owned_by("alice").await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|s| s.owner_id == "alice"));
    }

    #[tokio::test]
    async fn test_list_shared_with_matches_array_members() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let shop = Shop::new("Costco", "alice")
            .with_shared_with(vec!["bob".to_string(), "carol".to_string()]);
        repo.create(&shop).await.unwrap();
        repo.create(&Shop::new("Aeon", "alice")).await.unwrap();

        let bob_shops = repo.list_shared_with("bob").await.unwrap();
        assert_eq!(bob_shops.len(), 1);
        assert_eq!(bob_shops[0].id, shop.id);

        // Substring of a member id must not match
        assert!(repo.list_shared_with("bo").await.unwrap().is_empty());
        assert!(repo.list_shared_with("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_shared_with_replaces() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let shop = Shop::new("Costco", "alice").with_shared_with(vec!["bob".to_string()]);
        repo.create(&shop).await.unwrap();

        repo.set_shared_with(shop.id, &["carol".to_string()])
            .await
            .unwrap();

        let stored = repo.get(shop.id).await.unwrap().unwrap();
        assert_eq!(stored.shared_with, vec!["carol".to_string()]);
        assert!(repo.list_shared_with("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_shared_with_missing_shop() {
        let ctx = setup_repo().await;

        let err = ctx
            .repo
            .set_shared_with(Uuid::new_v4(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::NotFound(_)));
    }
}
