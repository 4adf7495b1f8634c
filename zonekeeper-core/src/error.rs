//! Unified error handling system
//!
//! Provides the error taxonomy shared by every crate: authentication and
//! permission failures, missing records, uniqueness conflicts, field
//! validation failures, and storage faults, each carrying a context that
//! identifies the component and operation that raised it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type ZonekeeperResult<T> = Result<T, ZonekeeperError>;

/// Error context providing additional information for debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }
}

/// Main error type for the Zonekeeper system
#[derive(Error, Debug)]
pub enum ZonekeeperError {
    /// Login-path failure: bad credentials or an account that cannot
    /// authenticate. All root causes share one externally visible message.
    #[error("Authentication error: {message}")]
    Auth {
        message: String,
        context: ErrorContext,
    },

    /// Authenticated but not authorized for the requested action
    #[error("Permission denied: {message}")]
    Permissions {
        message: String,
        context: ErrorContext,
    },

    #[error("Record not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    /// Uniqueness violation on a stored entity
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// Input rejected before any storage call
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    /// Unexpected persistence fault, raised after the transaction rolled back
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// Data-integrity or programming fault that should never surface in
    /// normal operation
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl ZonekeeperError {
    pub fn auth(message: impl Into<String>, component: &str) -> Self {
        ZonekeeperError::Auth {
            message: message.into(),
            context: ErrorContext::new(component),
        }
    }

    pub fn permissions(message: impl Into<String>, component: &str) -> Self {
        ZonekeeperError::Permissions {
            message: message.into(),
            context: ErrorContext::new(component),
        }
    }

    pub fn not_found(resource: impl Into<String>, component: &str) -> Self {
        ZonekeeperError::NotFound {
            resource: resource.into(),
            context: ErrorContext::new(component),
        }
    }

    pub fn conflict(message: impl Into<String>, component: &str) -> Self {
        ZonekeeperError::Conflict {
            message: message.into(),
            context: ErrorContext::new(component),
        }
    }

    pub fn validation(message: impl Into<String>, field: Option<&str>, component: &str) -> Self {
        ZonekeeperError::Validation {
            message: message.into(),
            field: field.map(|f| f.to_string()),
            context: ErrorContext::new(component),
        }
    }

    pub fn storage(message: impl Into<String>, component: &str) -> Self {
        ZonekeeperError::Storage {
            message: message.into(),
            source: None,
            context: ErrorContext::new(component),
        }
    }

    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
        component: &str,
    ) -> Self {
        ZonekeeperError::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(component),
        }
    }

    pub fn internal(message: impl Into<String>, component: &str) -> Self {
        ZonekeeperError::Internal {
            message: message.into(),
            source: None,
            context: ErrorContext::new(component),
        }
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            ZonekeeperError::Auth { context, .. } => context,
            ZonekeeperError::Permissions { context, .. } => context,
            ZonekeeperError::NotFound { context, .. } => context,
            ZonekeeperError::Conflict { context, .. } => context,
            ZonekeeperError::Validation { context, .. } => context,
            ZonekeeperError::Storage { context, .. } => context,
            ZonekeeperError::Internal { context, .. } => context,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            ZonekeeperError::Storage { .. } | ZonekeeperError::Internal { .. } => {
                error!(
                    error_id = %self.context().error_id,
                    error = %self,
                    "Error occurred"
                );
            }
            _ => {
                warn!(
                    error_id = %self.context().error_id,
                    error = %self,
                    "Request rejected"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_carries_component_and_operation() {
        let err = ZonekeeperError::not_found("username bob not found", "storage");
        assert_eq!(err.context().component, "storage");

        let ctx = ErrorContext::new("operations").with_operation("create_user");
        assert_eq!(ctx.operation.as_deref(), Some("create_user"));
    }

    #[test]
    fn display_includes_message() {
        let err = ZonekeeperError::conflict("username already exists", "storage");
        assert!(err.to_string().contains("username already exists"));
    }
}
