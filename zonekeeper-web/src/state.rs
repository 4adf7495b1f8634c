//! Application state shared across handlers

use crate::{WebConfig, WebError, WebResult};
use tracing::info;
use zonekeeper_applications::CredentialStore;

/// Shared state: configuration plus the credential store handle
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Credential store backing every operation
    pub store: CredentialStore,
}

impl AppState {
    /// Connect the credential store, create the schema, and run the
    /// idempotent first-boot seeding.
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let database_url = config
            .database_url
            .clone()
            .unwrap_or_else(|| "sqlite::memory:".to_string());

        let store = CredentialStore::connect(&database_url)
            .await
            .map_err(|e| WebError::Database(e.to_string()))?;

        store
            .create_tables()
            .await
            .map_err(|e| WebError::Database(e.to_string()))?;

        store
            .bootstrap()
            .await
            .map_err(|e| WebError::Database(e.to_string()))?;

        info!("Application state initialized");
        Ok(Self { config, store })
    }
}
