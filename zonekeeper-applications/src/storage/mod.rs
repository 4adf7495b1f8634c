//! Credential store: SQLite-backed persistence for users, roles, the
//! reference timezone catalog, per-user timezone records, and the token
//! revocation ledger.
//!
//! Pure data access; no policy. Uniqueness is enforced by `UNIQUE`
//! constraints so racing writers resolve to exactly one success, and every
//! mutation runs inside a transaction that rolls back on fault.

pub mod bootstrap;
pub mod models;
pub mod revocations;
pub mod roles;
pub mod timezones;
pub mod users;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "storage";

/// Handle to the shared credential store
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    /// Connect to a SQLite database, creating the file if needed.
    ///
    /// In-memory databases get a single connection: each SQLite `:memory:`
    /// connection is its own database.
    pub async fn connect(url: &str) -> ZonekeeperResult<Self> {
        // Foreign keys stay unenforced: deleting a role leaves any referencing
        // accounts with a dangling role id, which the evaluator surfaces as an
        // integrity fault when resolved.
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| ZonekeeperError::storage_with_source("Invalid database URL", e, COMPONENT))?
            .create_if_missing(true)
            .foreign_keys(false);

        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                ZonekeeperError::storage_with_source("Failed to open database", e, COMPONENT)
            })?;

        info!("Connected to credential store: {}", url);
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema. Idempotent.
    pub async fn create_tables(&self) -> ZonekeeperResult<()> {
        let schema = r#"
            CREATE TABLE IF NOT EXISTS roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                permissions TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role_id INTEGER REFERENCES roles(id),
                enabled BOOLEAN NOT NULL DEFAULT FALSE
            );

            CREATE TABLE IF NOT EXISTS timezones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                location TEXT NOT NULL,
                city TEXT NOT NULL,
                relative_to_gmt TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_timezones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                timezone_id INTEGER NOT NULL REFERENCES timezones(id),
                name TEXT NOT NULL,
                UNIQUE(user_id, name)
            );

            CREATE TABLE IF NOT EXISTS revoked_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                jti TEXT NOT NULL UNIQUE,
                revoked_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_revoked_tokens_jti ON revoked_tokens(jti);
        "#;

        sqlx::raw_sql(schema).execute(&self.pool).await.map_err(|e| {
            ZonekeeperError::storage_with_source("Failed to create schema", e, COMPONENT)
        })?;

        Ok(())
    }
}

/// Map a storage fault to the domain taxonomy: uniqueness violations become
/// conflicts (with the supplied message), anything else a generic storage
/// error carrying the source.
pub(crate) fn map_storage_error(
    err: sqlx::Error,
    conflict_message: &str,
    failure_message: &str,
) -> ZonekeeperError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ZonekeeperError::conflict(conflict_message, COMPONENT);
        }
    }
    ZonekeeperError::storage_with_source(failure_message.to_string(), err, COMPONENT)
}

/// Plain storage fault with no conflict interpretation
pub(crate) fn storage_error(err: sqlx::Error, failure_message: &str) -> ZonekeeperError {
    ZonekeeperError::storage_with_source(failure_message.to_string(), err, COMPONENT)
}
