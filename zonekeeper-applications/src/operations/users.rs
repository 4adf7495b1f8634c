//! User account operations

use crate::auth::evaluator::{self, ListingScope};
use crate::auth::password;
use crate::auth::permissions::Permission;
use crate::auth::CallerClaims;
use crate::storage::models::{Role, UserAccount};
use crate::storage::users::NewUserAccount;
use crate::storage::CredentialStore;
use crate::validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "operations::users";

/// Public view of a user account; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: Option<String>,
    pub enabled: bool,
}

impl UserView {
    fn from_account(user: UserAccount, role: Option<String>) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
            role,
            enabled: user.enabled,
        }
    }
}

/// Fields a user update may carry; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Create a new account via signup. Unauthenticated; the account starts
/// disabled with no role and must be enabled by an administrator.
pub async fn create_user(
    store: &CredentialStore,
    first_name: &str,
    last_name: &str,
    username: &str,
    email: &str,
    password: &str,
) -> ZonekeeperResult<UserView> {
    validate::check_name_field("first_name", first_name, validate::MIN_NAME_LEN)?;
    validate::check_name_field("last_name", last_name, validate::MIN_NAME_LEN)?;
    validate::check_name_field("username", username, validate::MIN_USERNAME_LEN)?;
    validate::check_email_format(email)?;
    validate::check_password_field(password)?;

    if store.user_by_username(username).await?.is_some() {
        return Err(ZonekeeperError::conflict("username already exists", COMPONENT));
    }
    if store.user_by_email(email).await?.is_some() {
        return Err(ZonekeeperError::conflict("email already registered", COMPONENT));
    }

    let user = store
        .insert_user(&NewUserAccount {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password::hash_password(password)?,
            role_id: None,
            enabled: false,
        })
        .await?;

    info!("User {} created", username);
    Ok(UserView::from_account(user, None))
}

/// List accounts visible to the caller under their effective listing scope
pub async fn list_users(
    store: &CredentialStore,
    claims: &CallerClaims,
) -> ZonekeeperResult<Vec<UserView>> {
    evaluator::require_account_enabled(store, &claims.username).await?;

    let scope = evaluator::effective_listing_scope(claims);
    let roles: HashMap<i64, Role> = store
        .list_roles()
        .await?
        .into_iter()
        .map(|role| (role.id, role))
        .collect();

    let views = store
        .list_users()
        .await?
        .into_iter()
        .filter(|user| match scope {
            ListingScope::OwnOnly => user.username == claims.username,
            ListingScope::NonPrivileged => user
                .role_id
                .and_then(|id| roles.get(&id))
                .is_some_and(|role| role.permissions.contains(&Permission::OwnUserDetails)),
            ListingScope::All => true,
        })
        .map(|user| {
            let role = user
                .role_id
                .and_then(|id| roles.get(&id))
                .map(|role| role.name.clone());
            UserView::from_account(user, role)
        })
        .collect();

    Ok(views)
}

/// Fetch a single account the caller is authorized to see
pub async fn get_user(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
) -> ZonekeeperResult<UserView> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_user_access(store, claims, username).await?;

    let user = store.user_by_username(username).await?.ok_or_else(|| {
        ZonekeeperError::not_found(format!("username {} not found", username), COMPONENT)
    })?;

    let role = resolve_role_name(store, &user).await?;
    Ok(UserView::from_account(user, role))
}

/// Apply a partial update to an account.
///
/// A role reassignment additionally requires the all-tier user-details
/// permission, independent of the self/other check; a caller cannot
/// self-promote without it.
pub async fn update_user(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
    update: UserUpdate,
) -> ZonekeeperResult<()> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_user_access(store, claims, username).await?;

    for provided in [
        update.first_name.as_deref(),
        update.last_name.as_deref(),
        update.email.as_deref(),
        update.password.as_deref(),
        update.role.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if provided.is_empty() {
            return Err(ZonekeeperError::validation(
                "Invalid input values",
                None,
                COMPONENT,
            ));
        }
    }

    let role_id = match &update.role {
        Some(role_name) => {
            if !claims.has_permission(Permission::AllUserDetails) {
                return Err(ZonekeeperError::permissions(
                    "insufficient permissions to update role",
                    COMPONENT,
                ));
            }
            let role = store.role_by_name(role_name).await?.ok_or_else(|| {
                ZonekeeperError::not_found(format!("role {} not found", role_name), COMPONENT)
            })?;
            Some(role.id)
        }
        None => None,
    };

    if let Some(email) = &update.email {
        validate::check_email_format(email)?;
    }

    let mut user = store.user_by_username(username).await?.ok_or_else(|| {
        ZonekeeperError::not_found(format!("username {} not found", username), COMPONENT)
    })?;

    let mut changed = false;

    if let Some(role_id) = role_id {
        if user.role_id != Some(role_id) {
            user.role_id = Some(role_id);
            changed = true;
        }
    }

    if let Some(first_name) = update.first_name {
        if user.first_name != first_name {
            validate::check_name_field("first_name", &first_name, validate::MIN_NAME_LEN)?;
            user.first_name = first_name;
            changed = true;
        }
    }

    if let Some(last_name) = update.last_name {
        if user.last_name != last_name {
            validate::check_name_field("last_name", &last_name, validate::MIN_NAME_LEN)?;
            user.last_name = last_name;
            changed = true;
        }
    }

    if let Some(email) = update.email {
        if user.email != email {
            user.email = email;
            changed = true;
        }
    }

    if let Some(password) = update.password {
        // Unchanged passwords are left alone so the stored salt survives
        if !password::verify_password(&password, &user.password_hash) {
            validate::check_password_field(&password)?;
            user.password_hash = password::hash_password(&password)?;
            changed = true;
        }
    }

    if changed {
        store.update_user(&user).await?;
    }

    info!("User {} updated", username);
    Ok(())
}

/// Delete an account the caller is authorized to act on
pub async fn delete_user(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
) -> ZonekeeperResult<()> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_user_access(store, claims, username).await?;

    if store.user_by_username(username).await?.is_none() {
        return Err(ZonekeeperError::not_found(
            format!("username {} not found", username),
            COMPONENT,
        ));
    }

    store.delete_user(username).await?;
    info!("User {} deleted", username);
    Ok(())
}

/// Flip an account's enabled flag. Requires the all-tier user-details
/// permission.
pub async fn set_user_enabled(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
    enabled: bool,
) -> ZonekeeperResult<()> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::require_permission(claims, Permission::AllUserDetails)?;

    let mut user = store.user_by_username(username).await?.ok_or_else(|| {
        ZonekeeperError::not_found(format!("username {} not found", username), COMPONENT)
    })?;

    if user.enabled != enabled {
        user.enabled = enabled;
        store.update_user(&user).await?;
    }

    info!(
        "User {} {}",
        username,
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

async fn resolve_role_name(
    store: &CredentialStore,
    user: &UserAccount,
) -> ZonekeeperResult<Option<String>> {
    match user.role_id {
        Some(role_id) => {
            let role = store.role_by_id(role_id).await?.ok_or_else(|| {
                ZonekeeperError::internal(
                    format!("user {} references missing role {}", user.username, role_id),
                    COMPONENT,
                )
            })?;
            Ok(Some(role.name))
        }
        None => Ok(None),
    }
}
