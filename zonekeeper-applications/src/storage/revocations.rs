//! Token revocation ledger queries
//!
//! Append-only: a jti present here is permanently rejected. The only
//! removal path is the maintenance bulk clear.

use super::models::RevokedToken;
use super::{map_storage_error, storage_error, CredentialStore};
use chrono::Utc;
use tracing::debug;
use zonekeeper_core::ZonekeeperResult;

impl CredentialStore {
    /// Record a token id as revoked.
    ///
    /// Revoking an id twice maps to a conflict, though in practice a revoked
    /// token never reaches this path because verification rejects it first.
    pub async fn revoke_jti(&self, jti: &str) -> ZonekeeperResult<RevokedToken> {
        let revoked_at = Utc::now();

        let mut tx = self.pool().begin().await.map_err(|e| {
            storage_error(e, "Could not start transaction")
        })?;

        let result = sqlx::query("INSERT INTO revoked_tokens (jti, revoked_at) VALUES (?, ?)")
            .bind(jti)
            .bind(revoked_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_storage_error(e, "token already revoked", "problem revoking token"))?;

        tx.commit()
            .await
            .map_err(|e| storage_error(e, "problem revoking token"))?;

        debug!("Token {} revoked", jti);

        Ok(RevokedToken {
            id: result.last_insert_rowid(),
            jti: jti.to_string(),
            revoked_at,
        })
    }

    /// Whether a token id is in the ledger
    pub async fn is_jti_revoked(&self, jti: &str) -> ZonekeeperResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM revoked_tokens WHERE jti = ?")
            .bind(jti)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while checking revoked tokens"))?;
        Ok(row.is_some())
    }

    /// Every revocation entry (maintenance/test path)
    pub async fn list_revocations(&self) -> ZonekeeperResult<Vec<RevokedToken>> {
        sqlx::query_as::<_, RevokedToken>("SELECT * FROM revoked_tokens ORDER BY id")
            .fetch_all(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while retrieving revoked tokens"))
    }

    /// Bulk-clear the ledger (maintenance/test path)
    pub async fn delete_all_revocations(&self) -> ZonekeeperResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens")
            .execute(self.pool())
            .await
            .map_err(|e| storage_error(e, "Error while clearing revoked tokens"))?;
        Ok(result.rows_affected())
    }
}
