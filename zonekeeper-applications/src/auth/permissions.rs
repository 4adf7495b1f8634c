//! Permission model
//!
//! Six fixed permission tokens stratify two axes: "records" (a user's own
//! timezone entries) and "user details" (accounts and roles). Each axis has
//! three escalating tiers with an explicit total order, so "highest tier
//! wins" is an `Ord` comparison rather than string containment.

use serde::{Deserialize, Serialize};
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "permissions";

/// The fixed permission enumeration. The serialized forms are the seeded
/// string tokens stored on roles and embedded in token claims.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    /// CRUD on the caller's own timezone records
    #[serde(rename = "CRUD-own-records")]
    OwnRecords,
    /// CRUD on any user's timezone records
    #[serde(rename = "CRUD-all-records")]
    AllRecords,
    /// CRUD on the caller's own account details
    #[serde(rename = "CRUD-own-user-details")]
    OwnUserDetails,
    /// CRUD on non-privileged accounts (those whose role is own-tier only)
    #[serde(rename = "CRUD-non-privileged-user-details")]
    NonPrivilegedUserDetails,
    /// CRUD on any account
    #[serde(rename = "CRUD-all-user-details")]
    AllUserDetails,
    /// Create and delete roles
    #[serde(rename = "CRUD-user-roles")]
    ManageRoles,
}

/// Permission axis: which kind of resource a token governs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Records,
    UserDetails,
}

/// Escalation tier within an axis, ordered `Own < NonPrivileged < All`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Own,
    NonPrivileged,
    All,
}

impl Permission {
    /// Every token in the enumeration, in seeding order
    pub const ALL: [Permission; 6] = [
        Permission::OwnRecords,
        Permission::AllRecords,
        Permission::OwnUserDetails,
        Permission::NonPrivilegedUserDetails,
        Permission::AllUserDetails,
        Permission::ManageRoles,
    ];

    /// The axis and tier a token grants. `ManageRoles` sits outside the
    /// two-axis stratification and is checked by plain membership.
    pub fn scope(&self) -> Option<(Axis, Tier)> {
        match self {
            Permission::OwnRecords => Some((Axis::Records, Tier::Own)),
            Permission::AllRecords => Some((Axis::Records, Tier::All)),
            Permission::OwnUserDetails => Some((Axis::UserDetails, Tier::Own)),
            Permission::NonPrivilegedUserDetails => Some((Axis::UserDetails, Tier::NonPrivileged)),
            Permission::AllUserDetails => Some((Axis::UserDetails, Tier::All)),
            Permission::ManageRoles => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::OwnRecords => "CRUD-own-records",
            Permission::AllRecords => "CRUD-all-records",
            Permission::OwnUserDetails => "CRUD-own-user-details",
            Permission::NonPrivilegedUserDetails => "CRUD-non-privileged-user-details",
            Permission::AllUserDetails => "CRUD-all-user-details",
            Permission::ManageRoles => "CRUD-user-roles",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

/// Parse a role's requested permission tokens, rejecting anything outside
/// the fixed enumeration.
pub fn parse_permission_tokens(tokens: &[String]) -> ZonekeeperResult<Vec<Permission>> {
    tokens
        .iter()
        .map(|token| {
            token.parse::<Permission>().map_err(|_| {
                ZonekeeperError::validation(
                    format!("Invalid permission value requested: {}", token),
                    Some("permissions"),
                    COMPONENT,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_display_and_parse() {
        for permission in Permission::ALL {
            let parsed: Permission = permission.as_str().parse().unwrap();
            assert_eq!(parsed, permission);
        }
    }

    #[test]
    fn serde_uses_the_seeded_token_strings() {
        let json = serde_json::to_string(&Permission::NonPrivilegedUserDetails).unwrap();
        assert_eq!(json, "\"CRUD-non-privileged-user-details\"");

        let parsed: Permission = serde_json::from_str("\"CRUD-own-records\"").unwrap();
        assert_eq!(parsed, Permission::OwnRecords);
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert!("CRUD-everything".parse::<Permission>().is_err());
        let err = parse_permission_tokens(&["CRUD-own-records".into(), "bogus".into()]);
        assert!(err.is_err());
    }

    #[test]
    fn tiers_order_own_below_privileged_below_all() {
        assert!(Tier::Own < Tier::NonPrivileged);
        assert!(Tier::NonPrivileged < Tier::All);
    }

    #[test]
    fn scope_maps_tokens_to_axis_and_tier() {
        assert_eq!(
            Permission::AllRecords.scope(),
            Some((Axis::Records, Tier::All))
        );
        assert_eq!(
            Permission::OwnUserDetails.scope(),
            Some((Axis::UserDetails, Tier::Own))
        );
        assert_eq!(Permission::ManageRoles.scope(), None);
    }
}
