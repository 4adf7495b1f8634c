//! User management handlers

use super::{data_response, ApiResult};
use crate::auth::Claims;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use zonekeeper_applications::operations::users::{self, UserUpdate, UserView};

/// Signup request body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// List the accounts visible under the caller's effective scope
pub async fn list_users(State(state): State<AppState>, claims: Claims) -> ApiResult<Response> {
    let caller = claims.to_caller_claims()?;
    let views = users::list_users(&state.store, &caller).await?;
    Ok(data_response(views))
}

/// Self-service signup. The new account starts disabled with no role.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let view = users::create_user(
        &state.store,
        &request.first_name,
        &request.last_name,
        &request.username,
        &request.email,
        &request.password,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Fetch a single account
pub async fn get_user(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
) -> ApiResult<Json<UserView>> {
    let caller = claims.to_caller_claims()?;
    let view = users::get_user(&state.store, &caller, &username).await?;
    Ok(Json(view))
}

/// Partially update an account
pub async fn update_user(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    users::update_user(&state.store, &caller, &username, update).await?;
    Ok(Json(json!({})))
}

/// Delete an account
pub async fn delete_user(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    users::delete_user(&state.store, &caller, &username).await?;
    Ok(Json(json!({})))
}

/// Enable a user account
pub async fn enable_user(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    users::set_user_enabled(&state.store, &caller, &username, true).await?;
    Ok(Json(json!({})))
}

/// Disable a user account
pub async fn disable_user(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    users::set_user_enabled(&state.store, &caller, &username, false).await?;
    Ok(Json(json!({})))
}
