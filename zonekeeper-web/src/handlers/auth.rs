//! Authentication handlers: login and logout

use super::ApiResult;
use crate::auth::{Claims, JwtService};
use crate::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use zonekeeper_applications::operations;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Issue a signed access token for valid credentials.
///
/// Every credential failure returns the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let authenticated =
        operations::auth::authenticate(&state.store, &request.username, &request.password).await?;

    let (access_token, _claims) = JwtService::generate_access_token(&authenticated)?;

    info!("Created access token for user {}", request.username);
    Ok(Json(LoginResponse { access_token }))
}

/// Revoke the current token's id. The token fails verification on every
/// subsequent use, even before its natural expiry.
pub async fn logout(State(state): State<AppState>, claims: Claims) -> ApiResult<Json<Value>> {
    operations::auth::revoke_token(&state.store, &claims.jti).await?;

    info!("Successfully logged out user {}", claims.sub);
    Ok(Json(json!({})))
}
