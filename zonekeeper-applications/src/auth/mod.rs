//! Authentication and authorization primitives
//!
//! The permission model is a closed enumeration stratified over two axes
//! (timezone records and user details) with three escalating tiers. The
//! evaluator turns a caller's claims plus a target identity into an
//! allow/deny decision.

pub mod evaluator;
pub mod password;
pub mod permissions;

use permissions::{Axis, Permission, Tier};
use serde::{Deserialize, Serialize};

/// The identity and permission set a request acts under.
///
/// Derived from a verified token, never from storage, and passed explicitly
/// into every evaluator and operation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerClaims {
    /// Caller username (token subject)
    pub username: String,
    /// Caller role name
    pub role: String,
    /// Caller permission set
    pub permissions: Vec<Permission>,
}

impl CallerClaims {
    pub fn new(username: impl Into<String>, role: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            permissions,
        }
    }

    /// Check if the caller holds a specific permission token
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Highest user-details tier present in the claims; the broadest grant
    /// wins.
    pub fn user_details_tier(&self) -> Tier {
        self.permissions
            .iter()
            .filter_map(|p| p.scope())
            .filter(|(axis, _)| *axis == Axis::UserDetails)
            .map(|(_, tier)| tier)
            .max()
            .unwrap_or(Tier::Own)
    }
}
