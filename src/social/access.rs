//! Which shops a user may see.
//!
//! A user sees the shops they own plus the shops whose `shared_with` lists
//! them. This only filters what is shown; the store's own access rules are
//! still needed to stop callers that query it directly.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{log_failure, Result};
use crate::models::{AccessibleShop, Shop};
use crate::store::ShopStore;

#[derive(Clone)]
pub struct AccessResolver {
    shops: Arc<dyn ShopStore>,
}

impl AccessResolver {
    pub fn new(shops: Arc<dyn ShopStore>) -> Self {
        Self { shops }
    }

    /// Owned shops followed by shared shops not already listed.
    ///
    /// Order follows the store; callers must not depend on it.
    pub async fn resolve_accessible_shops(&self, user_id: &str) -> Result<Vec<AccessibleShop>> {
        let (owned, shared) = tokio::try_join!(
            self.shops.list_owned_by(user_id),
            self.shops.list_shared_with(user_id),
        )
        .inspect_err(|e| log_failure("list_accessible_shops", e))?;

        tracing::debug!(
            owned = owned.len(),
            shared = shared.len(),
            "Resolved shops for {}",
            user_id
        );

        Ok(merge_accessible(owned, shared))
    }
}

/// Tags and merges the two query results.
///
/// A shop present in both sets keeps its owner tag.
pub fn merge_accessible(owned: Vec<Shop>, shared: Vec<Shop>) -> Vec<AccessibleShop> {
    let owned_ids: HashSet<_> = owned.iter().map(|shop| shop.id).collect();

    let mut result: Vec<AccessibleShop> = owned.into_iter().map(AccessibleShop::owned).collect();
    result.extend(
        shared
            .into_iter()
            .filter(|shop| !owned_ids.contains(&shop.id))
            .map(AccessibleShop::shared),
    );
    result
}

/// Tags a single shop for `user_id`, or `None` if they may not see it.
pub fn view_as(user_id: &str, shop: Shop) -> Option<AccessibleShop> {
    if shop.is_owned_by(user_id) {
        Some(AccessibleShop::owned(shop))
    } else if shop.is_shared_with(user_id) {
        Some(AccessibleShop::shared(shop))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[test]
    fn test_merge_owner_wins_on_collision() {
        // Pathological: owner also listed in its own shared_with
        let shop = Shop::new("Costco", "alice").with_shared_with(vec!["alice".into()]);
        let other = Shop::new("Aeon", "bob").with_shared_with(vec!["alice".into()]);

        let merged = merge_accessible(vec![shop.clone()], vec![shop.clone(), other.clone()]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id(), shop.id);
        assert!(merged[0].is_owner && !merged[0].is_shared);
        assert_eq!(merged[1].id(), other.id);
        assert!(merged[1].is_shared && !merged[1].is_owner);
    }

    #[test]
    fn test_view_as() {
        let shop = Shop::new("Costco", "alice").with_shared_with(vec!["bob".into()]);

        assert!(view_as("alice", shop.clone()).unwrap().is_owner);
        assert!(view_as("bob", shop.clone()).unwrap().is_shared);
        assert!(view_as("carol", shop).is_none());
    }

    #[tokio::test]
    async fn test_owner_member_and_outsider() {
        let ctx = TestContext::new().await;
        let shops = ctx.shops();
        let resolver = AccessResolver::new(shops.clone());

        let shop = Shop::new("Costco", "u1").with_shared_with(vec!["u2".into()]);
        shops.create(&shop).await.unwrap();

        let u1 = resolver.resolve_accessible_shops("u1").await.unwrap();
        assert_eq!(u1.len(), 1);
        assert!(u1[0].is_owner);

        let u2 = resolver.resolve_accessible_shops("u2").await.unwrap();
        assert_eq!(u2.len(), 1);
        assert!(u2[0].is_shared);
        assert_eq!(u2[0].id(), shop.id);

        assert!(resolver
            .resolve_accessible_shops("u3")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_owned_and_shared_combined() {
        let ctx = TestContext::new().await;
        let shops = ctx.shops();
        let resolver = AccessResolver::new(shops.clone());

        shops.create(&Shop::new("Mine", "alice")).await.unwrap();
        shops
            .create(&Shop::new("Bob's", "bob").with_shared_with(vec!["alice".into()]))
            .await
            .unwrap();
        shops.create(&Shop::new("Private", "bob")).await.unwrap();

        let visible = resolver.resolve_accessible_shops("alice").await.unwrap();
        let mut names: Vec<_> = visible.iter().map(|s| s.shop.name.as_str()).collect();
        names.sort();

        assert_eq!(names, vec!["Bob's", "Mine"]);
    }
}
