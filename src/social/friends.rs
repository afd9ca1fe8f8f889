//! Friend request lifecycle and the derived friends list.
//!
//! A friendship record is directed (requester -> receiver) and moves through
//! `pending -> accepted` or `pending -> deleted`. Nothing leaves `accepted`.
//! Once accepted the relation is treated as undirected, so the friends of a
//! user are gathered from both roles and deduplicated.

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::guard::{authorize, Action, AuthorizationGuard};
use crate::error::{log_failure, Result, ShareError};
use crate::models::{DerivedFriend, FriendshipRequest, User};
use crate::store::FriendshipStore;

#[derive(Clone)]
pub struct FriendshipService {
    store: Arc<dyn FriendshipStore>,
    guard: Arc<dyn AuthorizationGuard>,
}

impl FriendshipService {
    pub fn new(store: Arc<dyn FriendshipStore>, guard: Arc<dyn AuthorizationGuard>) -> Self {
        Self { store, guard }
    }

    /// Sends a request from `requester` to `receiver_id`.
    ///
    /// Only the requester -> receiver direction is checked for duplicates.
    /// A pending request the other way stays independent and is never
    /// turned into an acceptance.
    pub async fn send_request(
        &self,
        requester: &User,
        receiver_id: &str,
    ) -> Result<FriendshipRequest> {
        if requester.id == receiver_id {
            return Err(ShareError::SelfRequest);
        }

        authorize(
            self.guard.as_ref(),
            &requester.id,
            Action::SendRequest {
                requester_id: &requester.id,
                receiver_id,
            },
        )?;

        let result = self
            .create_unless_active(requester, receiver_id)
            .await
            .inspect_err(|e| log_failure("send_request", e))?;

        tracing::info!(
            request = %result.id,
            "Friend request sent from {} to {}",
            requester.id,
            receiver_id
        );
        Ok(result)
    }

    async fn create_unless_active(
        &self,
        requester: &User,
        receiver_id: &str,
    ) -> Result<FriendshipRequest> {
        if self
            .store
            .find_active_request(&requester.id, receiver_id)
            .await?
            .is_some()
        {
            return Err(ShareError::DuplicateRequest);
        }
        self.store
            .create_request(&requester.id, &requester.profile(), receiver_id)
            .await
    }

    pub async fn list_incoming(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.store
            .list_incoming_pending(user_id)
            .await
            .inspect_err(|e| log_failure("list_incoming_requests", e))
    }

    pub async fn list_outgoing(&self, user_id: &str) -> Result<Vec<FriendshipRequest>> {
        self.store
            .list_outgoing_pending(user_id)
            .await
            .inspect_err(|e| log_failure("list_sent_requests", e))
    }

    /// Accepts a pending request addressed to `receiver`.
    ///
    /// The receiver's current profile is copied into the record.
    pub async fn accept(&self, receiver: &User, record_id: Uuid) -> Result<()> {
        let request = self
            .store
            .get(record_id)
            .await
            .inspect_err(|e| log_failure("accept_request", e))?
            .ok_or_else(|| ShareError::NotFound(format!("friend request {}", record_id)))?;

        authorize(
            self.guard.as_ref(),
            &receiver.id,
            Action::AcceptRequest(&request),
        )?;

        self.store
            .accept(record_id, &receiver.profile())
            .await
            .inspect_err(|e| log_failure("accept_request", e))?;

        tracing::info!(
            request = %record_id,
            "{} accepted friend request from {}",
            receiver.id,
            request.requester_id
        );
        Ok(())
    }

    /// Rejects (deletes) a pending request.
    ///
    /// Rejecting a request that no longer exists succeeds. A rejected pair
    /// can send a fresh request afterwards.
    pub async fn reject(&self, actor_id: &str, record_id: Uuid) -> Result<()> {
        let request = self
            .store
            .get(record_id)
            .await
            .inspect_err(|e| log_failure("reject_request", e))?;

        let Some(request) = request else {
            tracing::debug!(request = %record_id, "Reject of absent friend request");
            return Ok(());
        };

        authorize(
            self.guard.as_ref(),
            actor_id,
            Action::RejectRequest(&request),
        )?;

        self.store
            .reject(record_id)
            .await
            .inspect_err(|e| log_failure("reject_request", e))?;

        tracing::info!(
            request = %record_id,
            "{} rejected friend request from {}",
            actor_id,
            request.requester_id
        );
        Ok(())
    }

    /// Computes the friends of `user_id` from accepted records.
    ///
    /// Recomputed on every call.
    pub async fn resolve_friends_of(&self, user_id: &str) -> Result<Vec<DerivedFriend>> {
        let (as_receiver, as_requester) = tokio::try_join!(
            self.store.list_accepted_as_receiver(user_id),
            self.store.list_accepted_as_requester(user_id),
        )
        .inspect_err(|e| log_failure("list_friends", e))?;

        Ok(merge_friends(as_receiver, as_requester))
    }
}

/// Merges accepted records from both roles into a friends list.
///
/// Records where the user is the receiver yield the requester's snapshot;
/// records where the user is the requester yield the receiver's snapshot.
/// The receiver-side entries come first and the first entry per id wins.
pub fn merge_friends(
    as_receiver: Vec<FriendshipRequest>,
    as_requester: Vec<FriendshipRequest>,
) -> Vec<DerivedFriend> {
    let from_received = as_receiver.into_iter().map(|r| DerivedFriend {
        id: r.requester_id,
        name: r.requester_name,
        email: r.requester_email,
    });
    let from_sent = as_requester.into_iter().map(|r| DerivedFriend {
        id: r.receiver_id,
        name: r.receiver_name.unwrap_or_default(),
        email: r.receiver_email.unwrap_or_default(),
    });

    let mut seen = HashSet::new();
    from_received
        .chain(from_sent)
        .filter(|friend| seen.insert(friend.id.clone()))
        .collect()
}
