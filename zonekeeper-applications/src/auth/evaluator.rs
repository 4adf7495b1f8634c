//! Permission evaluator
//!
//! The policy core: pure decision functions over a caller's claims plus, for
//! cross-user checks, one two-step credential-store lookup (user, then
//! role). Every deny surfaces as a permissions error, distinct from a
//! missing record and from storage faults. Nothing here mutates state.

use super::permissions::{Permission, Tier};
use super::CallerClaims;
use crate::storage::CredentialStore;
use tracing::warn;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "evaluator";

/// Effective visibility for account-listing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    /// Only the caller's own account
    OwnOnly,
    /// Accounts whose role is own-tier only (excludes other privileged and
    /// admin accounts)
    NonPrivileged,
    /// No filter
    All,
}

/// Deny unless the caller holds the given permission token.
///
/// Used for operations with no ownership concept: role management and
/// account enable/disable.
pub fn require_permission(claims: &CallerClaims, required: Permission) -> ZonekeeperResult<()> {
    if claims.has_permission(required) {
        Ok(())
    } else {
        warn!(
            "unauthorized: user {} lacks required permission {}",
            claims.username, required
        );
        Err(ZonekeeperError::permissions(
            "insufficient permissions",
            COMPONENT,
        ))
    }
}

/// Records-axis check: self-access is always permitted; acting on another
/// user's records requires the all-records tier.
pub fn authorize_record_access(claims: &CallerClaims, target_username: &str) -> ZonekeeperResult<()> {
    if claims.username == target_username {
        return Ok(());
    }
    if claims.has_permission(Permission::AllRecords) {
        Ok(())
    } else {
        warn!(
            "unauthorized: user {} cannot access other users records",
            claims.username
        );
        Err(ZonekeeperError::permissions(
            "insufficient permissions",
            COMPONENT,
        ))
    }
}

/// User-details-axis check: may the caller act on the target account?
///
/// Self-access is always permitted. Cross-user access is denied outright at
/// the own tier, before the target's role is ever consulted. Above that, the
/// target's role is resolved: a target holding either elevated user-details
/// tier is reachable only by an all-tier caller.
pub async fn authorize_user_access(
    store: &CredentialStore,
    claims: &CallerClaims,
    target_username: &str,
) -> ZonekeeperResult<()> {
    if claims.username == target_username {
        return Ok(());
    }

    let caller_tier = claims.user_details_tier();
    if caller_tier == Tier::Own {
        warn!(
            "unauthorized: user {} cannot access other users data",
            claims.username
        );
        return Err(ZonekeeperError::permissions(
            "insufficient permissions",
            COMPONENT,
        ));
    }

    let target = store
        .user_by_username(target_username)
        .await?
        .ok_or_else(|| {
            ZonekeeperError::not_found(format!("username {} not found", target_username), COMPONENT)
        })?;

    if let Some(role_id) = target.role_id {
        // A non-null but unresolvable role reference is a data-integrity
        // fault, not a missing record.
        let role = store.role_by_id(role_id).await?.ok_or_else(|| {
            ZonekeeperError::internal(
                format!("user {} references missing role {}", target_username, role_id),
                COMPONENT,
            )
        })?;

        if role.is_privileged() && caller_tier != Tier::All {
            warn!(
                "unauthorized: user {} cannot access privileged account {}",
                claims.username, target_username
            );
            return Err(ZonekeeperError::permissions(
                "insufficient permissions",
                COMPONENT,
            ));
        }
    }

    Ok(())
}

/// The visibility scope a caller gets on listing operations, chosen by the
/// highest user-details tier in their claims.
pub fn effective_listing_scope(claims: &CallerClaims) -> ListingScope {
    match claims.user_details_tier() {
        Tier::Own => ListingScope::OwnOnly,
        Tier::NonPrivileged => ListingScope::NonPrivileged,
        Tier::All => ListingScope::All,
    }
}

/// Mandatory first step of every authenticated operation: the caller's
/// account must exist and be enabled, independent of the permission
/// required.
pub async fn require_account_enabled(
    store: &CredentialStore,
    username: &str,
) -> ZonekeeperResult<()> {
    let user = store.user_by_username(username).await?.ok_or_else(|| {
        // A validly issued token always names an existing account.
        ZonekeeperError::internal("Could not identify caller account", COMPONENT)
    })?;

    if !user.enabled {
        return Err(ZonekeeperError::permissions(
            "Account is disabled; please contact support for further details",
            COMPONENT,
        ));
    }

    Ok(())
}
