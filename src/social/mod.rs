//! Friendship lifecycle, shop access resolution and sharing.

pub mod access;
pub mod friends;
pub mod guard;
pub mod sharing;

pub use access::{merge_accessible, view_as, AccessResolver};
pub use friends::{merge_friends, FriendshipService};
pub use guard::{Action, Authorization, AuthorizationGuard, OwnershipGuard};
pub use sharing::{preselected_members, ShareEditor, SharingView};
