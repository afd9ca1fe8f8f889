use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_timestamp, parse_uuid};
use crate::error::{Result, ShareError};
use crate::models::{FriendshipRequest, FriendshipStatus, UserProfile};
use crate::store::FriendshipStore;

pub struct FriendshipRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct FriendshipRow {
    id: String,
    requester_id: String,
    requester_name: String,
    requester_email: String,
    receiver_id: String,
    receiver_name: Option<String>,
    receiver_email: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl FriendshipRow {
    fn into_request(self) -> Result<FriendshipRequest> {
        let status = self
            .status
            .parse::<FriendshipStatus>()
            .map_err(ShareError::Corrupt)?;

        Ok(FriendshipRequest {
            id: parse_uuid(&self.id)?,
            requester_id: self.requester_id,
            requester_name: self.requester_name,
            requester_email: self.requester_email,
            receiver_id: self.receiver_id,
            receiver_name: self.receiver_name,
            receiver_email: self.receiver_email,
            status,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

impl FriendshipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        column: &'static str,
        user_id: &str,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipRequest>> {
        let sql = format!(
            "SELECT * FROM friendships WHERE {} = ? AND status = ? ORDER BY created_at",
            column
        );
        let rows: Vec<FriendshipRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(FriendshipRow::into_request).collect()
    }
}

#[async_trait]
impl FriendshipStore for FriendshipRepository {
    async fn find_active_request(
        &self,
        requester_id: &str,
        receiver_id: &str,
    ) -> Result<Option<FriendshipRequest>> {
        let row: Option<FriendshipRow> = sqlx::query_as(
            "SELECT * FROM friendships WHERE requester_id = ? AND receiver_id = ?",
        )
        .bind(requester_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FriendshipRow::into_request).transpose()
    }

    async fn create_request(
        &self,
        requester_id: &str,
        requester: &UserProfile,
        receiver_id: &str,
    ) -> Result<FriendshipRequest> {
        if self
            .find_active_request(requester_id, receiver_id)
            .await?
            .is_some()
        {
            return Err(ShareError::DuplicateRequest);
        }

        let request = FriendshipRequest::new(requester_id, requester, receiver_id);

        let inserted = sqlx::query(
            r#"
            INSERT INTO friendships (id, requester_id, requester_name, requester_email, receiver_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.id.to_string())
        .bind(&request.requester_id)
        .bind(&request.requester_name)
        .bind(&request.requester_email)
        .bind(&request.receiver_id)
        .bind(request.status.as_str())
        .bind(request.created_at.to_rfc3339())
        .bind(request.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => Ok(request),
            // Lost a race against a concurrent send in the same direction.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(ShareError::DuplicateRequest)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, record_id: Uuid) -> Result<Option<FriendshipRequest>> {
        let row: Option<FriendshipRow> = sqlx::query_as("SELECT * FROM friendships WHERE id = ?")
            .bind(record_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(FriendshipRow::into_request).transpose()
    }

    async fn list_incoming_pending(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.list_where("receiver_id", user_id, FriendshipStatus::Pending)
            .await
    }

    async fn list_outgoing_pending(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.list_where("requester_id", user_id, FriendshipStatus::Pending)
            .await
    }

    async fn list_accepted_as_receiver(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.list_where("receiver_id", user_id, FriendshipStatus::Accepted)
            .await
    }

    async fn list_accepted_as_requester(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.list_where("requester_id", user_id, FriendshipStatus::Accepted)
            .await
    }

    async fn accept(&self, record_id: Uuid, receiver: &UserProfile) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE friendships
            SET status = ?, receiver_name = ?, receiver_email = ?, updated_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(FriendshipStatus::Accepted.as_str())
        .bind(&receiver.name)
        .bind(&receiver.email)
        .bind(Utc::now().to_rfc3339())
        .bind(record_id.to_string())
        .bind(FriendshipStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.get(record_id).await? {
            None => Err(ShareError::NotFound(format!(
                "friend request {}",
                record_id
            ))),
            Some(current) => Err(ShareError::Conflict(format!(
                "friend request {} is already {}",
                record_id, current.status
            ))),
        }
    }

    async fn reject(&self, record_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM friendships WHERE id = ? AND status = ?")
            .bind(record_id.to_string())
            .bind(FriendshipStatus::Pending.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.get(record_id).await? {
            None => Ok(()),
            Some(current) => Err(ShareError::Conflict(format!(
                "friend request {} is already {}",
                record_id, current.status
            ))),
        }
    }
}
