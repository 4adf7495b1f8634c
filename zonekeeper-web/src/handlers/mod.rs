//! Request handlers
//!
//! Thin translation between HTTP and the resource operations: extract
//! verified claims, call the operation, map domain errors onto statuses.

pub mod auth;
pub mod roles;
pub mod timezones;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use zonekeeper_core::ZonekeeperError;

/// Domain error wrapped for the wire.
///
/// RecordNotFound maps to 404, Conflict to 409, validation and storage
/// faults to 400, authentication to 401, permission denials to 403, and
/// anything internal to 500.
#[derive(Debug)]
pub struct ApiError(pub ZonekeeperError);

impl From<ZonekeeperError> for ApiError {
    fn from(err: ZonekeeperError) -> Self {
        ApiError(err)
    }
}

// Token-path failures that surface inside a handler (rather than at
// extraction) are claims-format or key problems, not caller mistakes.
impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        ApiError(ZonekeeperError::internal(err.to_string(), "handlers"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log();

        let (status, error_code, message) = match &self.0 {
            ZonekeeperError::Auth { message, .. } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message.clone())
            }
            ZonekeeperError::Permissions { message, .. } => {
                (StatusCode::FORBIDDEN, "permission_denied", message.clone())
            }
            ZonekeeperError::NotFound { resource, .. } => {
                (StatusCode::NOT_FOUND, "not_found", resource.clone())
            }
            ZonekeeperError::Conflict { message, .. } => {
                (StatusCode::CONFLICT, "conflict", message.clone())
            }
            ZonekeeperError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, "invalid_field_format", message.clone())
            }
            ZonekeeperError::Storage { message, .. } => {
                (StatusCode::BAD_REQUEST, "storage_error", message.clone())
            }
            ZonekeeperError::Internal { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Collection responses wrap their items the way the original wire format
/// does, and an empty collection is reported as not found.
pub(crate) fn data_response<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "data": items })).into_response()
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
