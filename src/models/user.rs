use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user. A blank display name falls back to the email.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        let email = email.into().trim().to_string();
        let display_name = display_name.into().trim().to_string();
        let display_name = if display_name.is_empty() {
            email.clone()
        } else {
            display_name
        };
        let now = Utc::now();
        Self {
            id: id.into(),
            email,
            display_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the fields copied into friendship records.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.display_name, self.email, self.id)
    }
}

/// Display fields captured at request or accept time.
///
/// Stored by value; later profile edits do not touch existing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
