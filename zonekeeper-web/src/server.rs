//! Main web server implementation using Axum

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Zonekeeper web server
pub struct ZonekeeperServer {
    config: WebConfig,
    state: AppState,
}

impl ZonekeeperServer {
    /// Create a new server: connects the store and runs first-boot seeding
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Start serving requests
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("Starting Zonekeeper web server on http://{}", address);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address).await.map_err(WebError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for ZonekeeperServer
pub struct ZonekeeperServerBuilder {
    config: WebConfig,
}

impl ZonekeeperServerBuilder {
    /// Create a new server builder from environment defaults
    pub fn new() -> Self {
        Self {
            config: WebConfig::from_env(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the database URL
    pub fn database_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<ZonekeeperServer> {
        ZonekeeperServer::new(self.config).await
    }
}

impl Default for ZonekeeperServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
