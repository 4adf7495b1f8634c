//! Login and token revocation use-cases
//!
//! Authentication failures are enumeration-resistant: an unknown username, a
//! disabled account, an unassigned role, and a bad password all surface the
//! same error.

use crate::auth::password;
use crate::storage::models::{Role, UserAccount};
use crate::storage::CredentialStore;
use tracing::info;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "operations::auth";

/// The single externally visible login failure
pub const INVALID_CREDENTIALS: &str = "invalid user credentials";

/// A fully resolved, authenticated account: the user plus its role
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: UserAccount,
    pub role: Role,
}

/// Validate credentials and resolve the caller's role and permission set.
///
/// Exactly one error shape leaves this function for any credential problem.
pub async fn authenticate(
    store: &CredentialStore,
    username: &str,
    password: &str,
) -> ZonekeeperResult<AuthenticatedUser> {
    let bad_credentials = || ZonekeeperError::auth(INVALID_CREDENTIALS, COMPONENT);

    let Some(user) = store.user_by_username(username).await? else {
        return Err(bad_credentials());
    };

    if !user.enabled {
        return Err(bad_credentials());
    }

    let Some(role_id) = user.role_id else {
        return Err(bad_credentials());
    };

    if !password::verify_password(password, &user.password_hash) {
        return Err(bad_credentials());
    }

    let role = store.role_by_id(role_id).await?.ok_or_else(|| {
        ZonekeeperError::internal(
            format!("user {} references missing role {}", username, role_id),
            COMPONENT,
        )
    })?;

    info!("User {} authenticated", username);
    Ok(AuthenticatedUser { user, role })
}

/// Insert a token id into the revocation ledger
pub async fn revoke_token(store: &CredentialStore, jti: &str) -> ZonekeeperResult<()> {
    store.revoke_jti(jti).await?;
    info!("Token {} revoked", jti);
    Ok(())
}

/// Whether a token id has been revoked
pub async fn is_token_revoked(store: &CredentialStore, jti: &str) -> ZonekeeperResult<bool> {
    store.is_jti_revoked(jti).await
}
