//! Domain identifier types for externally-owned policies.
//!
//! The archive stores lightweight identifiers and delegates actual parameter
//! storage and lifetime to the external training collaborator.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Opaque handle to a policy owned by the external training collaborator.
///
/// The archive never holds policy parameters, only this identifier. Handles
/// are compared and hashed by value, so the training collaborator is free to
/// use whatever naming scheme it likes (indices, UUIDs, file names).
///
/// # Examples
///
/// ```
/// use morl::identifiers::PolicyId;
///
/// let policy = PolicyId::new("ppo-worker-3/gen-12");
/// assert_eq!(policy.as_str(), "ppo-worker-3/gen-12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyId(String);

impl PolicyId {
    /// Create a new policy identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the identifier into its inner String.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<&str> for PolicyId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<PolicyId> for &str {
    fn eq(&self, other: &PolicyId) -> bool {
        *self == other.as_str()
    }
}

impl Borrow<str> for PolicyId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for PolicyId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for PolicyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for PolicyId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
