//! Authorization checks run before every mutating operation.
//!
//! The guard sees the records an operation is about to touch and decides
//! whether the acting user may proceed. [`OwnershipGuard`] encodes the
//! default rules:
//!
//! - only the receiver of a friend request may accept or reject it
//! - only the owner of a shop may change who it is shared with
//! - anyone may send requests and create shops for themselves

use crate::error::ShareError;
use crate::models::{FriendshipRequest, Shop};

/// A mutating operation, with the records it targets.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    SendRequest {
        requester_id: &'a str,
        receiver_id: &'a str,
    },
    AcceptRequest(&'a FriendshipRequest),
    RejectRequest(&'a FriendshipRequest),
    CreateShop {
        owner_id: &'a str,
    },
    EditSharing(&'a Shop),
}

impl Action<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SendRequest { .. } => "send_request",
            Action::AcceptRequest(_) => "accept_request",
            Action::RejectRequest(_) => "reject_request",
            Action::CreateShop { .. } => "create_shop",
            Action::EditSharing(_) => "edit_sharing",
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Forbidden(String),
}

impl Authorization {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Authorization::Authorized)
    }

    pub fn into_result(self) -> Result<(), ShareError> {
        match self {
            Authorization::Authorized => Ok(()),
            Authorization::Forbidden(reason) => Err(ShareError::Forbidden(reason)),
        }
    }
}

/// Decides whether `actor_id` may perform `action`.
pub trait AuthorizationGuard: Send + Sync {
    fn check(&self, actor_id: &str, action: &Action<'_>) -> Authorization;
}

/// Default rules based on record ownership.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl AuthorizationGuard for OwnershipGuard {
    fn check(&self, actor_id: &str, action: &Action<'_>) -> Authorization {
        match action {
            Action::SendRequest { requester_id, .. } if *requester_id != actor_id => {
                Authorization::Forbidden("cannot send requests on behalf of another user".into())
            }
            Action::AcceptRequest(request) | Action::RejectRequest(request)
                if request.receiver_id != actor_id =>
            {
                Authorization::Forbidden(format!(
                    "only the receiver may answer friend request {}",
                    request.id
                ))
            }
            Action::CreateShop { owner_id } if *owner_id != actor_id => {
                Authorization::Forbidden("cannot create shops for another user".into())
            }
            Action::EditSharing(shop) if !shop.is_owned_by(actor_id) => Authorization::Forbidden(
                format!("only the owner may change sharing for shop {}", shop.id),
            ),
            _ => Authorization::Authorized,
        }
    }
}

/// Runs the guard and logs refusals.
pub(crate) fn authorize(
    guard: &dyn AuthorizationGuard,
    actor_id: &str,
    action: Action<'_>,
) -> Result<(), ShareError> {
    let decision = guard.check(actor_id, &action);
    if let Authorization::Forbidden(reason) = &decision {
        tracing::warn!(actor = actor_id, action = action.name(), "Forbidden: {}", reason);
    }
    decision.into_result()
}
