use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A named shopping list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub owner_id: String,
    /// Members granted access by the owner. The owner is not listed here.
    pub shared_with: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner_id: owner_id.into(),
            shared_with: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_shared_with(mut self, members: Vec<String>) -> Self {
        self.shared_with = members;
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn is_shared_with(&self, user_id: &str) -> bool {
        self.shared_with.iter().any(|id| id == user_id)
    }
}

impl fmt::Display for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Owner: {}", self.owner_id)?;
        writeln!(f, "Created: {}", self.created_at.format("%Y-%m-%d %H:%M"))?;

        if !self.shared_with.is_empty() {
            writeln!(f, "\nShared with:")?;
            for member in &self.shared_with {
                writeln!(f, "  - {}", member)?;
            }
        }

        Ok(())
    }
}

/// A shop as seen by a particular viewer.
///
/// Exactly one of `is_owner` and `is_shared` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibleShop {
    #[serde(flatten)]
    pub shop: Shop,
    pub is_owner: bool,
    pub is_shared: bool,
}

impl AccessibleShop {
    pub fn owned(shop: Shop) -> Self {
        Self {
            shop,
            is_owner: true,
            is_shared: false,
        }
    }

    pub fn shared(shop: Shop) -> Self {
        Self {
            shop,
            is_owner: false,
            is_shared: true,
        }
    }

    pub fn id(&self) -> Uuid {
        self.shop.id
    }
}
