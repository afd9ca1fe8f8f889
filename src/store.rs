//! Storage ports consumed by the services.
//!
//! The SQLite repositories in [`crate::db`] implement these traits. Services
//! hold them as `Arc<dyn ...>` so any store that supports equality filters,
//! array-membership filters and atomic single-record writes can stand in.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{FriendshipRequest, Shop, User, UserProfile};

/// Typed access to `friendships` records.
#[async_trait]
pub trait FriendshipStore: Send + Sync {
    /// Finds the active record for the ordered pair, if any.
    async fn find_active_request(
        &self,
        requester_id: &str,
        receiver_id: &str,
    ) -> Result<Option<FriendshipRequest>>;

    /// Inserts a pending request.
    ///
    /// Fails with `DuplicateRequest` if an active record already exists in
    /// the same direction.
    async fn create_request(
        &self,
        requester_id: &str,
        requester: &UserProfile,
        receiver_id: &str,
    ) -> Result<FriendshipRequest>;

    async fn get(&self, record_id: Uuid) -> Result<Option<FriendshipRequest>>;

    async fn list_incoming_pending(&self, user_id: &str) -> Result<Vec<FriendshipRequest>>;

    async fn list_outgoing_pending(&self, user_id: &str) -> Result<Vec<FriendshipRequest>>;

    async fn list_accepted_as_receiver(&self, user_id: &str) -> Result<Vec<FriendshipRequest>>;

    async fn list_accepted_as_requester(&self, user_id: &str) -> Result<Vec<FriendshipRequest>>;

    /// Moves a pending record to accepted and snapshots the receiver profile.
    ///
    /// Returns `NotFound` if the record is gone and `Conflict` if it is no
    /// longer pending.
    async fn accept(&self, record_id: Uuid, receiver: &UserProfile) -> Result<()>;

    /// Deletes a pending record. Deleting an absent record succeeds.
    async fn reject(&self, record_id: Uuid) -> Result<()>;
}

/// Typed access to `shops` records.
#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn create(&self, shop: &Shop) -> Result<Shop>;

    async fn get(&self, shop_id: Uuid) -> Result<Option<Shop>>;

    async fn list_owned_by(&self, user_id: &str) -> Result<Vec<Shop>>;

    /// Shops whose `shared_with` contains `user_id`.
    async fn list_shared_with(&self, user_id: &str) -> Result<Vec<Shop>>;

    /// Replaces `shared_with` wholesale.
    async fn set_shared_with(&self, shop_id: Uuid, members: &[String]) -> Result<()>;
}

/// Mirror of identity-provider users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Inserts the user unless a record with the same id exists.
    ///
    /// Returns the stored record either way.
    async fn ensure(&self, user: &User) -> Result<User>;

    async fn get(&self, user_id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
