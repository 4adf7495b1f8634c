//! Reference timezone catalog and per-user timezone record queries

use super::models::{TimezoneEntry, UserTimezone};
use super::{map_storage_error, storage_error, CredentialStore};
use tracing::debug;
use zonekeeper_core::ZonekeeperResult;

impl CredentialStore {
    /// Look up a reference timezone by id
    pub async fn timezone_by_id(&self, id: i64) -> ZonekeeperResult<Option<TimezoneEntry>> {
        sqlx::query_as::<_, TimezoneEntry>("SELECT * FROM timezones WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving timezones"))
    }

    /// The whole reference catalog
    pub async fn list_timezones(&self) -> ZonekeeperResult<Vec<TimezoneEntry>> {
        sqlx::query_as::<_, TimezoneEntry>("SELECT * FROM timezones ORDER BY id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving timezones"))
    }

    /// Insert a catalog entry (bootstrap path)
    pub async fn insert_timezone(
        &self,
        location: &str,
        city: &str,
        relative_to_gmt: &str,
    ) -> ZonekeeperResult<TimezoneEntry> {
        let result =
            sqlx::query("INSERT INTO timezones (location, city, relative_to_gmt) VALUES (?, ?, ?)")
                .bind(location)
                .bind(city)
                .bind(relative_to_gmt)
                .execute(self.pool())
                .await
                .map_err(|e| storage_error(e, "Could not add timezone"))?;

        Ok(TimezoneEntry {
            id: result.last_insert_rowid(),
            location: location.to_string(),
            city: city.to_string(),
            relative_to_gmt: relative_to_gmt.to_string(),
        })
    }

    /// A user's timezone record by its per-owner label
    pub async fn user_timezone_by_owner_and_name(
        &self,
        username: &str,
        name: &str,
    ) -> ZonekeeperResult<Option<UserTimezone>> {
        sqlx::query_as::<_, UserTimezone>(
            r#"
            SELECT ut.id, ut.user_id, ut.timezone_id, ut.name
            FROM user_timezones ut
            JOIN users u ON ut.user_id = u.id
            WHERE u.username = ? AND ut.name = ?
            "#,
        )
        .bind(username)
        .bind(name)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error(e, "Error while retrieving user timezones"))
    }

    /// All timezone records owned by a user, joined with their catalog entries
    pub async fn list_user_timezones(
        &self,
        username: &str,
    ) -> ZonekeeperResult<Vec<(UserTimezone, TimezoneEntry)>> {
        let rows = sqlx::query_as::<_, UserTimezoneJoinRow>(
            r#"
            SELECT ut.id, ut.user_id, ut.timezone_id, ut.name,
                   tz.location, tz.city, tz.relative_to_gmt
            FROM user_timezones ut
            JOIN users u ON ut.user_id = u.id
            JOIN timezones tz ON ut.timezone_id = tz.id
            WHERE u.username = ?
            ORDER BY ut.id
            "#,
        )
        .bind(username)
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error(e, "Error while retrieving user timezones"))?;

        Ok(rows.into_iter().map(UserTimezoneJoinRow::split).collect())
    }

    /// Insert a timezone record, mapping a duplicate (owner, label) pair to
    /// a conflict
    pub async fn insert_user_timezone(
        &self,
        user_id: i64,
        name: &str,
        timezone_id: i64,
    ) -> ZonekeeperResult<UserTimezone> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        let result =
            sqlx::query("INSERT INTO user_timezones (user_id, name, timezone_id) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(name)
                .bind(timezone_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    map_storage_error(e, "timezone name already exists", "Could not add timezone")
                })?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Could not add timezone"))?;

        let id = result.last_insert_rowid();
        debug!("User timezone {} inserted with id {}", name, id);

        Ok(UserTimezone {
            id,
            user_id,
            timezone_id,
            name: name.to_string(),
        })
    }

    /// Persist the mutable fields of a timezone record
    pub async fn update_user_timezone(&self, record: &UserTimezone) -> ZonekeeperResult<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        sqlx::query("UPDATE user_timezones SET name = ?, timezone_id = ? WHERE id = ?")
            .bind(&record.name)
            .bind(record.timezone_id)
            .bind(record.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_storage_error(e, "timezone name already exists", "Could not update timezone")
            })?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Could not update timezone"))?;

        Ok(())
    }

    /// Delete a timezone record by id
    pub async fn delete_user_timezone(&self, id: i64) -> ZonekeeperResult<()> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        sqlx::query("DELETE FROM user_timezones WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error(e, "Error while deleting timezone"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "Error while deleting timezone"))?;

        Ok(())
    }

    /// Remove every timezone record (maintenance/test path)
    pub async fn delete_all_user_timezones(&self) -> ZonekeeperResult<u64> {
        let result = sqlx::query("DELETE FROM user_timezones")
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while deleting timezones"))?;
        Ok(result.rows_affected())
    }
}

/// Flattened join row for a record plus its catalog entry
#[derive(sqlx::FromRow)]
struct UserTimezoneJoinRow {
    id: i64,
    user_id: i64,
    timezone_id: i64,
    name: String,
    location: String,
    city: String,
    relative_to_gmt: String,
}

impl UserTimezoneJoinRow {
    fn split(self) -> (UserTimezone, TimezoneEntry) {
        (
            UserTimezone {
                id: self.id,
                user_id: self.user_id,
                timezone_id: self.timezone_id,
                name: self.name,
            },
            TimezoneEntry {
                id: self.timezone_id,
                location: self.location,
                city: self.city,
                relative_to_gmt: self.relative_to_gmt,
            },
        )
    }
}
