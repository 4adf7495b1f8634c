//! Timezone operations: the shared reference catalog and per-user records

use crate::auth::evaluator;
use crate::auth::CallerClaims;
use crate::storage::models::{TimezoneEntry, UserTimezone};
use crate::storage::CredentialStore;
use serde::{Deserialize, Serialize};
use tracing::info;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "operations::timezones";

/// A user's timezone record joined with its catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserTimezoneView {
    pub id: i64,
    pub name: String,
    pub timezone_id: i64,
    pub location: String,
    pub city: String,
    pub relative_to_gmt: String,
    pub username: String,
}

impl UserTimezoneView {
    fn new(record: UserTimezone, entry: TimezoneEntry, username: &str) -> Self {
        Self {
            id: record.id,
            name: record.name,
            timezone_id: record.timezone_id,
            location: entry.location,
            city: entry.city,
            relative_to_gmt: entry.relative_to_gmt,
            username: username.to_string(),
        }
    }
}

/// Fields a timezone-record update may carry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserTimezoneUpdate {
    pub name: Option<String>,
    pub timezone_id: Option<i64>,
}

/// The reference catalog, visible to any enabled authenticated caller
pub async fn list_reference_timezones(
    store: &CredentialStore,
    claims: &CallerClaims,
) -> ZonekeeperResult<Vec<TimezoneEntry>> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    store.list_timezones().await
}

/// All timezone records owned by a user
pub async fn list_user_timezones(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
) -> ZonekeeperResult<Vec<UserTimezoneView>> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_record_access(claims, username)?;

    require_user_exists(store, username).await?;

    let views = store
        .list_user_timezones(username)
        .await?
        .into_iter()
        .map(|(record, entry)| UserTimezoneView::new(record, entry, username))
        .collect();

    Ok(views)
}

/// A single timezone record by its per-owner label
pub async fn get_user_timezone(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
    name: &str,
) -> ZonekeeperResult<UserTimezoneView> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_record_access(claims, username)?;

    require_user_exists(store, username).await?;

    let record = store
        .user_timezone_by_owner_and_name(username, name)
        .await?
        .ok_or_else(|| {
            ZonekeeperError::not_found(
                format!("user {} timezone {} not found", username, name),
                COMPONENT,
            )
        })?;

    let entry = resolve_catalog_entry(store, &record).await?;
    Ok(UserTimezoneView::new(record, entry, username))
}

/// Create a timezone record. The label is unique per owner, not globally,
/// and the referenced timezone must exist in the catalog.
pub async fn create_user_timezone(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
    name: &str,
    timezone_id: i64,
) -> ZonekeeperResult<UserTimezoneView> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_record_access(claims, username)?;

    if name.is_empty() {
        return Err(ZonekeeperError::validation(
            "Invalid input values",
            Some("name"),
            COMPONENT,
        ));
    }

    let owner = store.user_by_username(username).await?.ok_or_else(|| {
        ZonekeeperError::not_found(format!("username {} not found", username), COMPONENT)
    })?;

    let entry = store.timezone_by_id(timezone_id).await?.ok_or_else(|| {
        ZonekeeperError::not_found("requested timezone not found", COMPONENT)
    })?;

    if store
        .user_timezone_by_owner_and_name(username, name)
        .await?
        .is_some()
    {
        return Err(ZonekeeperError::conflict(
            format!("timezone {} already exists", name),
            COMPONENT,
        ));
    }

    let record = store.insert_user_timezone(owner.id, name, timezone_id).await?;

    info!("Timezone {} created for user {}", name, username);
    Ok(UserTimezoneView::new(record, entry, username))
}

/// Rename a record or point it at a different catalog entry
pub async fn update_user_timezone(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
    name: &str,
    update: UserTimezoneUpdate,
) -> ZonekeeperResult<()> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_record_access(claims, username)?;

    require_user_exists(store, username).await?;

    let mut record = store
        .user_timezone_by_owner_and_name(username, name)
        .await?
        .ok_or_else(|| {
            ZonekeeperError::not_found(format!("timezone {} not found", name), COMPONENT)
        })?;

    let mut changed = false;

    if let Some(new_name) = update.name {
        if new_name.is_empty() {
            return Err(ZonekeeperError::validation(
                "Invalid input values",
                Some("name"),
                COMPONENT,
            ));
        }
        if record.name != new_name {
            if store
                .user_timezone_by_owner_and_name(username, &new_name)
                .await?
                .is_some()
            {
                return Err(ZonekeeperError::conflict(
                    format!("timezone {} already exists", new_name),
                    COMPONENT,
                ));
            }
            record.name = new_name;
            changed = true;
        }
    }

    if let Some(timezone_id) = update.timezone_id {
        if record.timezone_id != timezone_id {
            if store.timezone_by_id(timezone_id).await?.is_none() {
                return Err(ZonekeeperError::not_found(
                    "requested timezone not found",
                    COMPONENT,
                ));
            }
            record.timezone_id = timezone_id;
            changed = true;
        }
    }

    if changed {
        store.update_user_timezone(&record).await?;
    }

    info!("Timezone {} updated for user {}", name, username);
    Ok(())
}

/// Delete a record by its per-owner label
pub async fn delete_user_timezone(
    store: &CredentialStore,
    claims: &CallerClaims,
    username: &str,
    name: &str,
) -> ZonekeeperResult<()> {
    evaluator::require_account_enabled(store, &claims.username).await?;
    evaluator::authorize_record_access(claims, username)?;

    require_user_exists(store, username).await?;

    let record = store
        .user_timezone_by_owner_and_name(username, name)
        .await?
        .ok_or_else(|| {
            ZonekeeperError::not_found(format!("timezone {} not found", name), COMPONENT)
        })?;

    store.delete_user_timezone(record.id).await?;
    info!("Timezone {} deleted for user {}", name, username);
    Ok(())
}

async fn require_user_exists(store: &CredentialStore, username: &str) -> ZonekeeperResult<()> {
    if store.user_by_username(username).await?.is_none() {
        return Err(ZonekeeperError::not_found(
            format!("username {} not found", username),
            COMPONENT,
        ));
    }
    Ok(())
}

async fn resolve_catalog_entry(
    store: &CredentialStore,
    record: &UserTimezone,
) -> ZonekeeperResult<TimezoneEntry> {
    store.timezone_by_id(record.timezone_id).await?.ok_or_else(|| {
        ZonekeeperError::internal(
            format!(
                "timezone record {} references missing catalog entry {}",
                record.id, record.timezone_id
            ),
            COMPONENT,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password;
    use crate::auth::permissions::Permission;
    use crate::storage::bootstrap::BOOTSTRAP_ADMIN_USERNAME;
    use crate::storage::users::NewUserAccount;

    async fn store_with_seed() -> CredentialStore {
        let store = CredentialStore::connect("sqlite::memory:").await.unwrap();
        store.create_tables().await.unwrap();
        store.bootstrap().await.unwrap();
        store
    }

    async fn add_active_user(store: &CredentialStore, username: &str) {
        let role_id = store.role_by_name("user").await.unwrap().unwrap().id;
        store
            .insert_user(&NewUserAccount {
                first_name: format!("{}_first", username),
                last_name: format!("{}_last", username),
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: password::hash_password("password-123").unwrap(),
                role_id: Some(role_id),
                enabled: true,
            })
            .await
            .unwrap();
    }

    fn user_claims(username: &str) -> CallerClaims {
        CallerClaims::new(
            username,
            "user",
            vec![Permission::OwnRecords, Permission::OwnUserDetails],
        )
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
    async fn labels_are_unique_per_owner_not_globally() {
        let store = store_with_seed().await;
        add_active_user(&store, "alice1").await;
        add_active_user(&store, "bobby1").await;

        let tz = store.list_timezones().await.unwrap()[0].id;

        create_user_timezone(&store, &user_claims("alice1"), "alice1", "Home", tz)
            .await
            .unwrap();
        // Same label, different owner: fine
        create_user_timezone(&store, &user_claims("bobby1"), "bobby1", "Home", tz)
            .await
            .unwrap();
        // Same label, same owner: conflict
        let err = create_user_timezone(&store, &user_claims("alice1"), "alice1", "Home", tz)
            .await
            .unwrap_err();
        assert!(matches!(err, ZonekeeperError::Conflict { .. }));
    }

    #[tokio::test]
    async fn cross_user_record_access_requires_all_records() {
        let store = store_with_seed().await;
        add_active_user(&store, "alice1").await;
        add_active_user(&store, "bobby1").await;

        let tz = store.list_timezones().await.unwrap()[0].id;
        create_user_timezone(&store, &user_claims("bobby1"), "bobby1", "Home", tz)
            .await
            .unwrap();

        let err = list_user_timezones(&store, &user_claims("alice1"), "bobby1")
            .await
            .unwrap_err();
        assert!(matches!(err, ZonekeeperError::Permissions { .. }));

        // Admin holds the all-records tier
        let records = list_user_timezones(&store, &admin_claims(), "bobby1")
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Home");
    }

    #[tokio::test]
    async fn unknown_catalog_entry_is_not_found_on_create_and_update() {
        let store = store_with_seed().await;
        add_active_user(&store, "alice1").await;

        let err = create_user_timezone(&store, &user_claims("alice1"), "alice1", "Home", 99999)
            .await
            .unwrap_err();
        assert!(matches!(err, ZonekeeperError::NotFound { .. }));

        let tz = store.list_timezones().await.unwrap()[0].id;
        create_user_timezone(&store, &user_claims("alice1"), "alice1", "Home", tz)
            .await
            .unwrap();

        let err = update_user_timezone(
            &store,
            &user_claims("alice1"),
            "alice1",
            "Home",
            UserTimezoneUpdate {
                timezone_id: Some(99999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ZonekeeperError::NotFound { .. }));
    }

    #[tokio::test]
    async fn rename_checks_the_new_label_for_conflicts() {
        let store = store_with_seed().await;
        add_active_user(&store, "alice1").await;

        let tz = store.list_timezones().await.unwrap()[0].id;
        create_user_timezone(&store, &user_claims("alice1"), "alice1", "Home", tz)
            .await
            .unwrap();
        create_user_timezone(&store, &user_claims("alice1"), "alice1", "Office", tz)
            .await
            .unwrap();

        let err = update_user_timezone(
            &store,
            &user_claims("alice1"),
            "alice1",
            "Office",
            UserTimezoneUpdate {
                name: Some("Home".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ZonekeeperError::Conflict { .. }));

        update_user_timezone(
            &store,
            &user_claims("alice1"),
            "alice1",
            "Office",
            UserTimezoneUpdate {
                name: Some("Work".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        get_user_timezone(&store, &user_claims("alice1"), "alice1", "Work")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = store_with_seed().await;
        add_active_user(&store, "alice1").await;

        let tz = store.list_timezones().await.unwrap()[0].id;
        create_user_timezone(&store, &user_claims("alice1"), "alice1", "Home", tz)
            .await
            .unwrap();

        delete_user_timezone(&store, &user_claims("alice1"), "alice1", "Home")
            .await
            .unwrap();

        let err = get_user_timezone(&store, &user_claims("alice1"), "alice1", "Home")
            .await
            .unwrap_err();
        assert!(matches!(err, ZonekeeperError::NotFound { .. }));
    }
}
