//! Zonekeeper Web Server
//!
//! RBAC-guarded user, role, and timezone management behind a JWT-protected
//! REST API.

use clap::Parser;
use tracing::error;
use zonekeeper_core::LoggingConfig;
use zonekeeper_web::server::ZonekeeperServerBuilder;

/// Zonekeeper web server
#[derive(Parser)]
#[command(name = "zonekeeper-web")]
#[command(about = "RBAC-guarded user and timezone management API")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Database URL (defaults to DATABASE_URL or an in-memory database)
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    zonekeeper_core::init_logging(&LoggingConfig {
        level: args.log_level.clone(),
        ..LoggingConfig::default()
    });

    let mut builder = ZonekeeperServerBuilder::new()
        .host(args.host)
        .port(args.port);
    if let Some(database_url) = args.database_url {
        builder = builder.database_url(database_url);
    }

    let server = match builder.build().await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to initialize server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
