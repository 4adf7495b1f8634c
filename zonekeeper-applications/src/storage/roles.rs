//! Role queries

use super::models::{Role, RoleRecord};
use super::{map_storage_error, storage_error, CredentialStore};
use crate::auth::permissions::Permission;
use tracing::debug;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "storage";

impl CredentialStore {
    /// Look up a role by name
    pub async fn role_by_name(&self, name: &str) -> ZonekeeperResult<Option<Role>> {
        let record = sqlx::query_as::<_, RoleRecord>("SELECT * FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving role"))?;

        record.map(RoleRecord::into_role).transpose()
    }

    /// Look up a role by id
    pub async fn role_by_id(&self, id: i64) -> ZonekeeperResult<Option<Role>> {
        let record = sqlx::query_as::<_, RoleRecord>("SELECT * FROM roles WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving role"))?;

        record.map(RoleRecord::into_role).transpose()
    }

    /// All roles
    pub async fn list_roles(&self) -> ZonekeeperResult<Vec<Role>> {
        let records = sqlx::query_as::<_, RoleRecord>("SELECT * FROM roles ORDER BY id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving roles"))?;

        records.into_iter().map(RoleRecord::into_role).collect()
    }

    /// Insert a role, mapping a name collision to a conflict
    pub async fn insert_role(&self, name: &str, permissions: &[Permission]) -> ZonekeeperResult<Role> {
        let permissions_json = serde_json::to_string(permissions).map_err(|e| {
            ZonekeeperError::internal(format!("Failed to serialize permissions: {}", e), COMPONENT)
        })?;

        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        let result = sqlx::query("INSERT INTO roles (name, permissions) VALUES (?, ?)")
            .bind(name)
            .bind(&permissions_json)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_storage_error(e, "role already exists", "Could not create role"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Could not create role"))?;

        let id = result.last_insert_rowid();
        debug!("Role {} inserted with id {}", name, id);

        Ok(Role {
            id,
            name: name.to_string(),
            permissions: permissions.to_vec(),
        })
    }

    /// Delete a role by name
    pub async fn delete_role(&self, name: &str) -> ZonekeeperResult<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        sqlx::query("DELETE FROM roles WHERE name = ?")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "Error while deleting role"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Error while deleting role"))?;

        Ok(())
    }

    /// Remove every role (maintenance/test path)
    pub async fn delete_all_roles(&self) -> ZonekeeperResult<u64> {
        let result = sqlx::query("DELETE FROM roles")
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while deleting roles"))?;
        Ok(result.rows_affected())
    }
}
