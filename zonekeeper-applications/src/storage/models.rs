//! Domain records stored in the credential store
//!
//! Each entity has a raw database row type (`sqlx::FromRow`) and a domain
//! type; role permission sets are persisted as JSON arrays of the seeded
//! token strings and parsed into the closed enumeration on the way out.

use crate::auth::permissions::{Axis, Permission, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "storage";

/// A user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<i64>,
    pub enabled: bool,
}

/// A role: a unique name plus a permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl Role {
    /// True when the role grants an elevated user-details tier.
    ///
    /// Accounts holding such a role are "privileged": only an all-tier
    /// caller may act on them.
    pub fn is_privileged(&self) -> bool {
        self.permissions
            .iter()
            .filter_map(|p| p.scope())
            .any(|(axis, tier)| axis == Axis::UserDetails && tier > Tier::Own)
    }
}

/// Raw role row; permissions held as a JSON array string
#[derive(Debug, sqlx::FromRow)]
pub struct RoleRecord {
    pub id: i64,
    pub name: String,
    pub permissions: String,
}

impl RoleRecord {
    pub fn into_role(self) -> ZonekeeperResult<Role> {
        let permissions: Vec<Permission> = serde_json::from_str(&self.permissions).map_err(|e| {
            ZonekeeperError::internal(
                format!("Role {} carries an unparsable permission set: {}", self.name, e),
                COMPONENT,
            )
        })?;
        Ok(Role {
            id: self.id,
            name: self.name,
            permissions,
        })
    }
}

/// An entry in the reference timezone catalog
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimezoneEntry {
    pub id: i64,
    pub location: String,
    pub city: String,
    pub relative_to_gmt: String,
}

/// A user-owned timezone record; (user_id, name) is unique
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserTimezone {
    pub id: i64,
    pub user_id: i64,
    pub timezone_id: i64,
    pub name: String,
}

/// A revoked token identifier. Append-only; presence means the token is
/// permanently rejected.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RevokedToken {
    pub id: i64,
    pub jti: String,
    pub revoked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_record_parses_json_permission_sets() {
        let record = RoleRecord {
            id: 1,
            name: "manager".to_string(),
            permissions: "[\"CRUD-own-records\",\"CRUD-non-privileged-user-details\"]".to_string(),
        };
        let role = record.into_role().unwrap();
        assert_eq!(role.permissions.len(), 2);
        assert!(role.is_privileged());
    }

    #[test]
    fn own_tier_role_is_not_privileged() {
        let role = Role {
            id: 1,
            name: "user".to_string(),
            permissions: vec![Permission::OwnRecords, Permission::OwnUserDetails],
        };
        assert!(!role.is_privileged());
    }

    #[test]
    fn garbage_permission_set_is_an_integrity_fault() {
        let record = RoleRecord {
            id: 1,
            name: "broken".to_string(),
            permissions: "[\"CRUD-everything\"]".to_string(),
        };
        assert!(record.into_role().is_err());
    }
}
