//! Role management operations
//!
//! All of these require the role-management permission; roles have no
//! ownership concept.

use crate::auth::evaluator;
use crate::auth::permissions::{self, Permission};
use crate::auth::CallerClaims;
use crate::storage::models::Role;
use crate::storage::CredentialStore;
use tracing::info;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "operations::roles";

/// All roles
pub async fn list_roles(
    store: &CredentialStore,
    claims: &CallerClaims,
) -> ZonekeeperResult<Vec<Role>> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::require_permission(claims, Permission::ManageRoles)?;

    store.list_roles().await
}

/// A single role by name
pub async fn get_role(
    store: &CredentialStore,
    claims: &CallerClaims,
    name: &str,
) -> ZonekeeperResult<Role> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::require_permission(claims, Permission::ManageRoles)?;

    store
        .role_by_name(name)
        .await?
        .ok_or_else(|| ZonekeeperError::not_found("User role not found", COMPONENT))
}

/// Create a role from a name and a list of permission tokens. Tokens outside
/// the fixed enumeration are rejected before any storage call.
pub async fn create_role(
    store: &CredentialStore,
    claims: &CallerClaims,
    name: &str,
    permission_tokens: &[String],
) -> ZonekeeperResult<Role> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::require_permission(claims, Permission::ManageRoles)?;

    if name.is_empty() || permission_tokens.is_empty() {
        return Err(ZonekeeperError::validation(
            "Invalid input values",
            None,
            COMPONENT,
        ));
    }

    let parsed = permissions::parse_permission_tokens(permission_tokens)?;
    let role = store.insert_role(name, &parsed).await?;

    info!("New user role {} successfully added", name);
    Ok(role)
}

/// Delete a role by name
pub async fn delete_role(
    store: &CredentialStore,
    claims: &CallerClaims,
    name: &str,
) -> ZonekeeperResult<()> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::require_permission(claims, Permission::ManageRoles)?;

    if store.role_by_name(name).await?.is_none() {
        return Err(ZonekeeperError::not_found("User role not found", COMPONENT));
    }

    store.delete_role(name).await?;
    info!("User role {} deleted", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::bootstrap::BOOTSTRAP_ADMIN_USERNAME;

    async fn store_with_seed() -> CredentialStore {
        let store = CredentialStore::connect("sqlite::memory:").await.unwrap();
        store.create_tables().await.unwrap();
        store.bootstrap().await.unwrap();
        store
    }

    fn admin_claims() -> CallerClaims {
        CallerClaims::new(
            BOOTSTRAP_ADMIN_USERNAME,
            "admin",
            vec![
                Permission::ManageRoles,
                Permission::AllRecords,
                Permission::AllUserDetails,
            ],
        )
    }

    #[tokio::test]
    async fn role_creation_validates_tokens_against_the_enumeration() {
        let store = store_with_seed().await;

        let role = create_role(
            &store,
            &admin_claims(),
            "auditor",
            &["CRUD-own-records".to_string(), "CRUD-all-records".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(role.permissions.len(), 2);

        let err = create_role(
            &store,
            &admin_claims(),
            "hacker",
            &["CRUD-everything".to_string()],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ZonekeeperError::Validation { .. }));
    }

    #[tokio::test]
    async fn duplicate_role_names_conflict() {
        let store = store_with_seed().await;
        let err = create_role(
            &store,
            &admin_claims(),
            "user",
            &["CRUD-own-records".to_string()],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ZonekeeperError::Conflict { .. }));
    }

    #[tokio::test]
    async fn role_management_requires_the_role_permission() {
        let store = store_with_seed().await;
        // Seeded admin account, but claims without the role-management token
        let claims = CallerClaims::new(
            BOOTSTRAP_ADMIN_USERNAME,
            "admin",
            vec![Permission::AllUserDetails],
        );

        let err = list_roles(&store, &claims).await.unwrap_err();
        assert!(matches!(err, ZonekeeperError::Permissions { .. }));

        let err = delete_role(&store, &claims, "user").await.unwrap_err();
        assert!(matches!(err, ZonekeeperError::Permissions { .. }));
    }

    #[tokio::test]
    async fn deleting_a_missing_role_is_not_found() {
        let store = store_with_seed().await;
        let err = delete_role(&store, &admin_claims(), "wizard").await.unwrap_err();
        assert!(matches!(err, ZonekeeperError::NotFound { .. }));
    }
}
