//! Account-linking collaborator data.
//!
//! These types are *referenced* by the routing core but owned by the domain
//! layer: the user service guarantees at most one [`Account`] per
//! ([`Provider`], external id) pair via a storage-level unique constraint.

use serde::{Deserialize, Serialize};

/// External platform an internal account can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// The Discord gateway.
    Discord,
}

impl Provider {
    /// Returns the stable identifier persisted by the identity mapping.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discord => "discord",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An internal account, as handed out by the user service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Internal account id.
    pub id: i64,
    /// Display name chosen at registration time.
    pub name: String,
}
