//! Identities under which configurations are listed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the caller on whose behalf work runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Principal {
    /// Unauthenticated caller, such as an inbound webhook.
    #[default]
    Anonymous,
    /// Named user.
    User(String),
    /// Internal identity that sees every configuration.
    System,
}

impl Principal {
    /// Returns `true` for the system identity.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("anonymous"),
            Self::User(name) => f.write_str(name),
            Self::System => f.write_str("SYSTEM"),
        }
    }
}
