//! The operations offered to the CLI and HTTP layers.
//!
//! Every call names the acting user explicitly; authentication happens
//! before this point (API key on the server, config on the CLI).

use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{FriendshipRepository, ShopRepository, UserRepository};
use crate::error::{log_failure, Result, ShareError};
use crate::models::{AccessibleShop, DerivedFriend, FriendshipRequest, Shop, User};
use crate::social::guard::authorize;
use crate::social::{
    preselected_members, view_as, AccessResolver, Action, AuthorizationGuard, FriendshipService,
    OwnershipGuard, ShareEditor, SharingView,
};
use crate::store::{FriendshipStore, ShopStore, UserDirectory};

#[derive(Clone)]
pub struct ShareList {
    users: Arc<dyn UserDirectory>,
    shops: Arc<dyn ShopStore>,
    guard: Arc<dyn AuthorizationGuard>,
    friendships: FriendshipService,
    access: AccessResolver,
    sharing: ShareEditor,
}

impl ShareList {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        friendships: Arc<dyn FriendshipStore>,
        shops: Arc<dyn ShopStore>,
        guard: Arc<dyn AuthorizationGuard>,
    ) -> Self {
        Self {
            friendships: FriendshipService::new(friendships, guard.clone()),
            access: AccessResolver::new(shops.clone()),
            sharing: ShareEditor::new(shops.clone(), guard.clone()),
            users,
            shops,
            guard,
        }
    }

    /// SQLite-backed instance with the default ownership rules.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(FriendshipRepository::new(pool.clone())),
            Arc::new(ShopRepository::new(pool)),
            Arc::new(OwnershipGuard),
        )
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Mirrors an authenticated user, creating the record if missing.
    pub async fn register_user(&self, user: &User) -> Result<User> {
        self.users
            .ensure(user)
            .await
            .inspect_err(|e| log_failure("register_user", e))
    }

    pub async fn user(&self, user_id: &str) -> Result<User> {
        self.users
            .get(user_id)
            .await
            .inspect_err(|e| log_failure("get_user", e))?
            .ok_or_else(|| ShareError::NotFound(format!("user {}", user_id)))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users
            .find_by_email(email)
            .await
            .inspect_err(|e| log_failure("find_user_by_email", e))
    }

    // ------------------------------------------------------------------
    // Friends
    // ------------------------------------------------------------------

    /// Sends a friend request to a user given by email or id.
    pub async fn send_friend_request(
        &self,
        actor_id: &str,
        receiver: &str,
    ) -> Result<FriendshipRequest> {
        let receiver = receiver.trim();
        if receiver == actor_id {
            return Err(ShareError::SelfRequest);
        }

        let actor = self.user(actor_id).await?;
        // Emails match exactly, the same way the lookup below does
        if receiver == actor.email {
            return Err(ShareError::SelfRequest);
        }

        let target = if receiver.contains('@') {
            self.find_user_by_email(receiver).await?
        } else {
            self.users
                .get(receiver)
                .await
                .inspect_err(|e| log_failure("send_friend_request", e))?
        };
        let target = target.ok_or_else(|| ShareError::NotFound(format!("user {}", receiver)))?;

        self.friendships.send_request(&actor, &target.id).await
    }

    pub async fn list_incoming_requests(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.friendships.list_incoming(user_id).await
    }

    pub async fn list_sent_requests(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.friendships.list_outgoing(user_id).await
    }

    pub async fn accept_request(&self, actor_id: &str, record_id: Uuid) -> Result<()> {
        let actor = self.user(actor_id).await?;
        self.friendships.accept(&actor, record_id).await
    }

    pub async fn reject_request(&self, actor_id: &str, record_id: Uuid) -> Result<()> {
        self.friendships.reject(actor_id, record_id).await
    }

    pub async fn list_friends(&self, user_id: &str) -> Result<Vec<DerivedFriend>> {
        self.friendships.resolve_friends_of(user_id).await
    }

    // ------------------------------------------------------------------
    // Shops
    // ------------------------------------------------------------------

    pub async fn create_shop(&self, owner_id: &str, name: &str) -> Result<Shop> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShareError::InvalidInput("shop name must not be empty".into()));
        }

        authorize(
            self.guard.as_ref(),
            owner_id,
            Action::CreateShop { owner_id },
        )?;

        let shop = self
            .shops
            .create(&Shop::new(name, owner_id))
            .await
            .inspect_err(|e| log_failure("create_shop", e))?;

        tracing::info!(shop = %shop.id, "{} created shop '{}'", owner_id, shop.name);
        Ok(shop)
    }

    /// Fetches one shop, hiding it from users who may not see it.
    pub async fn get_shop(&self, user_id: &str, shop_id: Uuid) -> Result<AccessibleShop> {
        let shop = self
            .shops
            .get(shop_id)
            .await
            .inspect_err(|e| log_failure("get_shop", e))?;

        shop.and_then(|shop| view_as(user_id, shop))
            .ok_or_else(|| ShareError::NotFound(format!("shop {}", shop_id)))
    }

    pub async fn list_accessible_shops(&self, user_id: &str) -> Result<Vec<AccessibleShop>> {
        self.access.resolve_accessible_shops(user_id).await
    }

    pub async fn update_shared_with(
        &self,
        shop_id: Uuid,
        actor_id: &str,
        members: &[String],
    ) -> Result<()> {
        self.sharing
            .update_shared_with(shop_id, actor_id, members)
            .await
    }

    /// Friends of the owner plus the ones currently selected for the shop.
    pub async fn sharing_view(&self, actor_id: &str, shop_id: Uuid) -> Result<SharingView> {
        let shop = self.get_shop(actor_id, shop_id).await?.shop;
        authorize(self.guard.as_ref(), actor_id, Action::EditSharing(&shop))?;

        let friends = self.list_friends(actor_id).await?;
        let selected = preselected_members(&friends, &shop.shared_with);
        Ok(SharingView {
            shop,
            friends,
            selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, TestContext};

    async fn setup() -> (TestContext, ShareList) {
        let ctx = TestContext::new().await;
        let app = ctx.app();
        for id in ["alice", "bob", "carol"] {
            app.register_user(&user(id)).await.unwrap();
        }
        (ctx, app)
    }

    async fn befriend(app: &ShareList, from: &str, to: &str) {
        let request = app.send_friend_request(from, to).await.unwrap();
        app.accept_request(to, request.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_by_email_or_id() {
        let (_ctx, app) = setup().await;

        let by_email = app
            .send_friend_request("alice", "bob@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.receiver_id, "bob");
        assert_eq!(by_email.requester_name, "ALICE");

        let by_id = app.send_friend_request("alice", "carol").await.unwrap();
        assert_eq!(by_id.receiver_id, "carol");
    }

    #[tokio::test]
    async fn test_send_to_self_by_email() {
        let (_ctx, app) = setup().await;

        let err = app
            .send_friend_request("alice", "alice@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::SelfRequest));
    }

    #[tokio::test]
    async fn test_send_to_self_before_registering() {
        let (_ctx, app) = setup().await;

        let err = app.send_friend_request("ghost", " ghost ").await.unwrap_err();
        assert!(matches!(err, ShareError::SelfRequest));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let (_ctx, app) = setup().await;
        app.register_user(&User::new("dave", "Dave@Example.com", "Dave"))
            .await
            .unwrap();

        // Own email in another case is just an unknown address
        let err = app
            .send_friend_request("alice", "ALICE@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::NotFound(_)));

        let err = app
            .send_friend_request("alice", "dave@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::NotFound(_)));

        let request = app
            .send_friend_request("alice", "Dave@Example.com")
            .await
            .unwrap();
        assert_eq!(request.receiver_id, "dave");
    }

    #[tokio::test]
    async fn test_send_to_unknown_user() {
        let (_ctx, app) = setup().await;

        let err = app
            .send_friend_request("alice", "nobody@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ShareError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unregistered_actor_cannot_send() {
        let (_ctx, app) = setup().await;

        let err = app.send_friend_request("ghost", "bob").await.unwrap_err();
        assert!(matches!(err, ShareError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_accept_snapshots_current_profile() {
        let (_ctx, app) = setup().await;

        befriend(&app, "alice", "bob").await;

        let friends = app.list_friends("alice").await.unwrap();
        assert_eq!(friends[0].name, "BOB");
        assert_eq!(friends[0].email, "bob@example.com");
    }

    #[tokio::test]
    async fn test_create_shop_rejects_blank_name() {
        let (_ctx, app) = setup().await;

        let err = app.create_shop("alice", "   ").await.unwrap_err();
        assert!(matches!(err, ShareError::InvalidInput(_)));

        let shop = app.create_shop("alice", "  Costco ").await.unwrap();
        assert_eq!(shop.name, "Costco");
    }

    #[tokio::test]
    async fn test_get_shop_hidden_from_outsiders() {
        let (_ctx, app) = setup().await;

        let shop = app.create_shop("alice", "Costco").await.unwrap();
        app.update_shared_with(shop.id, "alice", &["bob".to_string()])
            .await
            .unwrap();

        assert!(app.get_shop("alice", shop.id).await.unwrap().is_owner);
        assert!(app.get_shop("bob", shop.id).await.unwrap().is_shared);
        let err = app.get_shop("carol", shop.id).await.unwrap_err();
        assert!(matches!(err, ShareError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sharing_view_preselects_current_friends() {
        let (_ctx, app) = setup().await;

        befriend(&app, "alice", "bob").await;
        befriend(&app, "carol", "alice").await;

        let shop = app.create_shop("alice", "Costco").await.unwrap();
        // "dave" is not a friend and drops out of the selection
        app.update_shared_with(shop.id, "alice", &["bob".to_string(), "dave".to_string()])
            .await
            .unwrap();

        let view = app.sharing_view("alice", shop.id).await.unwrap();
        assert_eq!(view.friends.len(), 2);
        assert_eq!(view.selected, vec!["bob".to_string()]);

        let err = app.sharing_view("bob", shop.id).await.unwrap_err();
        assert!(matches!(err, ShareError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_sharing_is_not_limited_to_friends() {
        let (_ctx, app) = setup().await;

        let shop = app.create_shop("alice", "Costco").await.unwrap();
        app.update_shared_with(shop.id, "alice", &["bob".to_string()])
            .await
            .unwrap();

        // Bob was never a friend, yet stays shared until the owner edits
        let bob_shops = app.list_accessible_shops("bob").await.unwrap();
        assert_eq!(bob_shops.len(), 1);
        assert!(bob_shops[0].is_shared);
    }

    /// Lets anyone edit sharing.
    struct OpenSharingGuard;

    impl AuthorizationGuard for OpenSharingGuard {
        fn check(&self, actor_id: &str, action: &Action<'_>) -> crate::social::Authorization {
            match action {
                Action::EditSharing(_) => crate::social::Authorization::Authorized,
                _ => OwnershipGuard.check(actor_id, action),
            }
        }
    }

    #[tokio::test]
    async fn test_sharing_view_follows_injected_guard() {
        let ctx = TestContext::new().await;
        let app = ShareList::new(
            ctx.users(),
            ctx.friendships(),
            ctx.shops(),
            Arc::new(OpenSharingGuard),
        );
        for id in ["alice", "bob"] {
            app.register_user(&user(id)).await.unwrap();
        }

        let shop = app.create_shop("alice", "Costco").await.unwrap();
        app.update_shared_with(shop.id, "alice", &["bob".to_string()])
            .await
            .unwrap();

        let view = app.sharing_view("bob", shop.id).await.unwrap();
        assert_eq!(view.shop.id, shop.id);
        assert!(view.friends.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_persistence() {
        let (ctx, app) = setup().await;
        ctx.pool.close().await;

        let err = app.list_friends("alice").await.unwrap_err();
        assert!(matches!(err, ShareError::Persistence(_)));

        let err = app.create_shop("alice", "Costco").await.unwrap_err();
        assert!(matches!(err, ShareError::Persistence(_)));
    }
}
