mod friend;
mod friendship;
mod shop;
mod user;

pub use friend::DerivedFriend;
pub use friendship::{FriendshipRequest, FriendshipStatus};
pub use shop::{AccessibleShop, Shop};
pub use user::{User, UserProfile};
