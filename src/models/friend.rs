use serde::{Deserialize, Serialize};
use std::fmt;

/// The other party of an accepted friendship, seen from one user.
///
/// Computed from friendship records on every call and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFriend {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl fmt::Display for DerivedFriend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> ({})", self.name, self.email, self.id)
    }
}
