//! Zonekeeper Core - shared error handling and logging
//!
//! This crate defines the error taxonomy used across the whole system and the
//! structured-logging bootstrap. Domain logic lives in the application layer.

pub mod error;
pub mod logging;

pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
