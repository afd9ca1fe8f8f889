//! Editing who a shop is shared with.

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use serde::Serialize;

use super::guard::{authorize, Action, AuthorizationGuard};
use crate::error::{log_failure, Result, ShareError};
use crate::models::{DerivedFriend, Shop};
use crate::store::ShopStore;

#[derive(Clone)]
pub struct ShareEditor {
    shops: Arc<dyn ShopStore>,
    guard: Arc<dyn AuthorizationGuard>,
}

/// What the owner sees when editing sharing: their friends, and which of
/// them currently have access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharingView {
    pub shop: Shop,
    pub friends: Vec<DerivedFriend>,
    pub selected: Vec<String>,
}

impl ShareEditor {
    pub fn new(shops: Arc<dyn ShopStore>, guard: Arc<dyn AuthorizationGuard>) -> Self {
        Self { shops, guard }
    }

    /// Replaces the shop's member list with `members`.
    ///
    /// This is a full overwrite: callers pass the complete desired set.
    /// Repeated ids are collapsed, keeping the first occurrence.
    pub async fn update_shared_with(
        &self,
        shop_id: Uuid,
        actor_id: &str,
        members: &[String],
    ) -> Result<()> {
        let shop = self
            .shops
            .get(shop_id)
            .await
            .inspect_err(|e| log_failure("update_shared_with", e))?
            .ok_or_else(|| ShareError::NotFound(format!("shop {}", shop_id)))?;

        authorize(self.guard.as_ref(), actor_id, Action::EditSharing(&shop))?;

        let members = dedup_members(members);
        self.shops
            .set_shared_with(shop_id, &members)
            .await
            .inspect_err(|e| log_failure("update_shared_with", e))?;

        tracing::info!(
            shop = %shop_id,
            members = members.len(),
            "Updated sharing for '{}'",
            shop.name
        );
        Ok(())
    }
}

/// Current members that are still friends, in friend-list order.
///
/// Used to seed the editor so ids of former friends silently drop out.
pub fn preselected_members(friends: &[DerivedFriend], current: &[String]) -> Vec<String> {
    friends
        .iter()
        .filter(|friend| current.contains(&friend.id))
        .map(|friend| friend.id.clone())
        .collect()
}

fn dedup_members(members: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    members
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}
