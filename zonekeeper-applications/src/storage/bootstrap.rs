//! Idempotent first-boot seeding
//!
//! Invoked once at startup after schema creation. Each seed step inserts
//! only when its table is empty, so restarting against an existing database
//! is a no-op.

use super::users::NewUserAccount;
use super::CredentialStore;
use crate::auth::password;
use crate::auth::permissions::Permission;
use tracing::info;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "bootstrap";

/// Bootstrap administrator credentials. Operational deployments must rotate
/// this password immediately.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin";
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@zonekeeper.local";

/// Built-in reference timezone catalog, seeded when the table is empty
const REFERENCE_TIMEZONES: &[(&str, &str, &str)] = &[
    ("Africa", "Cairo", "+02:00"),
    ("Africa", "Lagos", "+01:00"),
    ("America", "Chicago", "-06:00"),
    ("America", "Los_Angeles", "-08:00"),
    ("America", "New_York", "-05:00"),
    ("America", "Sao_Paulo", "-03:00"),
    ("Asia", "Dubai", "+04:00"),
    ("Asia", "Kolkata", "+05:30"),
    ("Asia", "Shanghai", "+08:00"),
    ("Asia", "Tokyo", "+09:00"),
    ("Australia", "Sydney", "+10:00"),
    ("Europe", "Berlin", "+01:00"),
    ("Europe", "Bucharest", "+02:00"),
    ("Europe", "London", "+00:00"),
    ("Europe", "Moscow", "+03:00"),
    ("Pacific", "Auckland", "+12:00"),
];

impl CredentialStore {
    /// Seed the built-in roles, the bootstrap administrator, and the
    /// reference timezone catalog.
    pub async fn bootstrap(&self) -> ZonekeeperResult<()> {
        self.seed_roles().await?;
        self.seed_admin_account().await?;
        self.seed_timezone_catalog().await?;
        Ok(())
    }

    async fn seed_roles(&self) -> ZonekeeperResult<()> {
        if !self.list_roles().await?.is_empty() {
            return Ok(());
        }

        info!("Populating roles table");
        self.insert_role("user", &[Permission::OwnRecords, Permission::OwnUserDetails])
            .await?;
        self.insert_role(
            "manager",
            &[Permission::OwnRecords, Permission::NonPrivilegedUserDetails],
        )
        .await?;
        self.insert_role(
            "admin",
            &[
                Permission::ManageRoles,
                Permission::AllRecords,
                Permission::AllUserDetails,
            ],
        )
        .await?;

        Ok(())
    }

    async fn seed_admin_account(&self) -> ZonekeeperResult<()> {
        if !self.list_users().await?.is_empty() {
            return Ok(());
        }

        let admin_role = self
            .role_by_name("admin")
            .await?
            .ok_or_else(|| ZonekeeperError::internal("admin role missing during bootstrap", COMPONENT))?;

        info!("Creating bootstrap administrator account");
        self.insert_user(&NewUserAccount {
            first_name: "Administrator".to_string(),
            last_name: "SuperUser".to_string(),
            username: BOOTSTRAP_ADMIN_USERNAME.to_string(),
            email: BOOTSTRAP_ADMIN_EMAIL.to_string(),
            password_hash: password::hash_password(BOOTSTRAP_ADMIN_PASSWORD)?,
            role_id: Some(admin_role.id),
            enabled: true,
        })
        .await?;

        Ok(())
    }

    async fn seed_timezone_catalog(&self) -> ZonekeeperResult<()> {
        if !self.list_timezones().await?.is_empty() {
            return Ok(());
        }

        info!("Populating reference timezone catalog");
        for (location, city, offset) in REFERENCE_TIMEZONES {
            self.insert_timezone(location, city, offset).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fresh_store() -> CredentialStore {
        let store = CredentialStore::connect("sqlite::memory:").await.unwrap();
        store.create_tables().await.unwrap();
        store
    }

    #[tokio::test]
    async fn bootstrap_seeds_roles_admin_and_catalog() {
        let store = fresh_store().await;
        store.bootstrap().await.unwrap();

        let roles = store.list_roles().await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["user", "manager", "admin"]);

        let admin = store
            .user_by_username(BOOTSTRAP_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.enabled);
        assert!(admin.role_id.is_some());
        assert!(password::verify_password(
            BOOTSTRAP_ADMIN_PASSWORD,
            &admin.password_hash
        ));

        assert!(!store.list_timezones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store = fresh_store().await;
        store.bootstrap().await.unwrap();
        store.bootstrap().await.unwrap();

        assert_eq!(store.list_roles().await.unwrap().len(), 3);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn maintenance_reset_clears_tables_and_reseeding_works() {
        let store = fresh_store().await;
        store.bootstrap().await.unwrap();
        store.revoke_jti("jti-1").await.unwrap();

        assert_eq!(store.delete_all_user_timezones().await.unwrap(), 0);
        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert_eq!(store.delete_all_roles().await.unwrap(), 3);
        assert_eq!(store.delete_all_revocations().await.unwrap(), 1);
        assert!(store.list_revocations().await.unwrap().is_empty());

        store.bootstrap().await.unwrap();
        assert_eq!(store.list_roles().await.unwrap().len(), 3);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seeded_role_permissions_match_the_fixed_sets() {
        let store = fresh_store().await;
        store.bootstrap().await.unwrap();

        let user = store.role_by_name("user").await.unwrap().unwrap();
        assert_eq!(
            user.permissions,
            vec![Permission::OwnRecords, Permission::OwnUserDetails]
        );

        let manager = store.role_by_name("manager").await.unwrap().unwrap();
        assert_eq!(
            manager.permissions,
            vec![Permission::OwnRecords, Permission::NonPrivilegedUserDetails]
        );

        let admin = store.role_by_name("admin").await.unwrap().unwrap();
        assert_eq!(
            admin.permissions,
            vec![
                Permission::ManageRoles,
                Permission::AllRecords,
                Permission::AllUserDetails,
            ]
        );
    }
}
