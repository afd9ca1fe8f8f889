//! Friends and per-shop sharing for a shared shopping-list application.
//!
//! Friendship requests are directed records that move from `pending` to
//! `accepted` or are deleted on rejection. The friends list is derived from
//! accepted records in both directions. Shops are visible to their owner and
//! to every user listed in their `shared_with` allow-list.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod service;
pub mod social;
pub mod store;

#[cfg(test)]
mod testing;

pub use db::init_db;
pub use error::{Result, ShareError};
pub use models::{
    AccessibleShop, DerivedFriend, FriendshipRequest, FriendshipStatus, Shop, User, UserProfile,
};
pub use service::ShareList;
