//! User account queries

use super::models::UserAccount;
use super::{map_storage_error, storage_error, CredentialStore};
use tracing::debug;
use zonekeeper_core::ZonekeeperResult;

/// Fields for a user row about to be inserted
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: Option<i64>,
    pub enabled: bool,
}

impl CredentialStore {
    /// Look up a user by username
    pub async fn user_by_username(&self, username: &str) -> ZonekeeperResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving user details"))
    }

    /// Look up a user by email
    pub async fn user_by_email(&self, email: &str) -> ZonekeeperResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserAccount>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving user details"))
    }

    /// All user accounts
    pub async fn list_users(&self) -> ZonekeeperResult<Vec<UserAccount>> {
        sqlx::query_as::<_, UserAccount>("SELECT * FROM users ORDER BY id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving user details"))
    }

    /// Insert a user, mapping a username/email collision to a conflict
    pub async fn insert_user(&self, new: &NewUserAccount) -> ZonekeeperResult<UserAccount> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, username, email, password_hash, role_id, enabled)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role_id)
        .bind(new.enabled)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_storage_error(e, "username or email already exists", "Could not add user"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Could not add user"))?;

        let id = result.last_insert_rowid();
        debug!("User {} inserted with id {}", new.username, id);

        Ok(UserAccount {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            username: new.username.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            role_id: new.role_id,
            enabled: new.enabled,
        })
    }

    /// Persist the mutable fields of an existing user
    pub async fn update_user(&self, user: &UserAccount) -> ZonekeeperResult<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, password_hash = ?, role_id = ?, enabled = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role_id)
        .bind(user.enabled)
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_storage_error(e, "email already registered", "Could not update user"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Could not update user"))?;

        Ok(())
    }

    /// Delete a user and their timezone records
    pub async fn delete_user(&self, username: &str) -> ZonekeeperResult<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        sqlx::query(
            "DELETE FROM user_timezones WHERE user_id IN (SELECT id FROM users WHERE username = ?)",
        )
        .bind(username)
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error(e, "Error while deleting user"))?;

        sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "Error while deleting user"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Error while deleting user"))?;

        Ok(())
    }

    /// Remove every user account (maintenance/test path)
    pub async fn delete_all_users(&self) -> ZonekeeperResult<u64> {
        let result = sqlx::query("DELETE FROM users")
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while deleting users"))?;
        Ok(result.rows_affected())
    }
}
