//! Unified logging system
//!
//! Provides structured logging with configurable level and output format.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Whether to include file and line information
    pub include_location: bool,
    /// Custom filter directives, appended after the base level
    pub filter_directives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            filter_directives: vec![
                "zonekeeper_core=debug".to_string(),
                "zonekeeper_applications=debug".to_string(),
                "zonekeeper_web=debug".to_string(),
                "tower_http=debug".to_string(),
            ],
        }
    }
}

impl LoggingConfig {
    fn env_filter(&self) -> EnvFilter {
        let mut directives = self.level.clone();
        for directive in &self.filter_directives {
            directives.push(',');
            directives.push_str(directive);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    }
}

/// Initialize the global tracing subscriber from a logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Initialize logging with default settings
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
