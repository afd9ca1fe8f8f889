use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::UserProfile;

/// Lifecycle state of a friendship record.
///
/// Rejection deletes the record, so there is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FriendshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            _ => Err(format!(
                "Invalid friendship status '{}'. Valid options: pending, accepted",
                s
            )),
        }
    }
}

/// A directed friend request from `requester_id` to `receiver_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendshipRequest {
    pub id: Uuid,
    pub requester_id: String,
    pub requester_name: String,
    pub requester_email: String,
    pub receiver_id: String,
    /// Filled in when the receiver accepts.
    pub receiver_name: Option<String>,
    pub receiver_email: Option<String>,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FriendshipRequest {
    /// Creates a new pending request.
    pub fn new(
        requester_id: impl Into<String>,
        requester: &UserProfile,
        receiver_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            requester_id: requester_id.into(),
            requester_name: requester.name.clone(),
            requester_email: requester.email.clone(),
            receiver_id: receiver_id.into(),
            receiver_name: None,
            receiver_email: None,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == FriendshipStatus::Pending
    }
}

impl fmt::Display for FriendshipRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> -> {} [{}]",
            self.requester_name, self.requester_email, self.receiver_id, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_is_pending() {
        let profile = UserProfile::new("Alice", "alice@example.com");
        let request = FriendshipRequest::new("alice", &profile, "bob");

        assert!(request.is_pending());
        assert_eq!(request.requester_name, "Alice");
        assert_eq!(request.requester_email, "alice@example.com");
        assert!(request.receiver_name.is_none());
        assert!(request.receiver_email.is_none());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            FriendshipStatus::from_str("pending").unwrap(),
            FriendshipStatus::Pending
        );
        assert_eq!(
            FriendshipStatus::from_str("ACCEPTED").unwrap(),
            FriendshipStatus::Accepted
        );
        assert!(FriendshipStatus::from_str("rejected").is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&FriendshipStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");
    }
}
