//! Timezone handlers: the reference catalog and per-user records

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
use zonekeeper_applications::operations::timezones::{self, UserTimezoneUpdate, UserTimezoneView};

/// Timezone record creation request body
#[derive(Debug, Deserialize)]
pub struct CreateUserTimezoneRequest {
    pub name: String,
    pub timezone_id: i64,
}

/// List the reference timezone catalog
pub async fn list_timezones(State(state): State<AppState>, claims: Claims) -> ApiResult<Response> {
    let caller = claims.to_caller_claims()?;
    let entries = timezones::list_reference_timezones(&state.store, &caller).await?;
    Ok(data_response(entries))
}

/// List a user's timezone records
pub async fn list_user_timezones(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
) -> ApiResult<Response> {
    let caller = claims.to_caller_claims()?;
    let views = timezones::list_user_timezones(&state.store, &caller, &username).await?;
    Ok(data_response(views))
}

/// Create a timezone record for a user
pub async fn create_user_timezone(
    State(state): State<AppState>,
    claims: Claims,
    Path(username): Path<String>,
    Json(request): Json<CreateUserTimezoneRequest>,
) -> ApiResult<(StatusCode, Json<UserTimezoneView>)> {
    let caller = claims.to_caller_claims()?;
    let view = timezones::create_user_timezone(
        &state.store,
        &caller,
        &username,
        &request.name,
        request.timezone_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Fetch a single timezone record by its per-owner label
pub async fn get_user_timezone(
    State(state): State<AppState>,
    claims: Claims,
    Path((username, name)): Path<(String, String)>,
) -> ApiResult<Json<UserTimezoneView>> {
    let caller = claims.to_caller_claims()?;
    let view = timezones::get_user_timezone(&state.store, &caller, &username, &name).await?;
    Ok(Json(view))
}

/// Rename a record or point it at a different catalog entry
pub async fn update_user_timezone(
    State(state): State<AppState>,
    claims: Claims,
    Path((username, name)): Path<(String, String)>,
    Json(update): Json<UserTimezoneUpdate>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    timezones::update_user_timezone(&state.store, &caller, &username, &name, update).await?;
    Ok(Json(json!({})))
}

/// Delete a timezone record
pub async fn delete_user_timezone(
    State(state): State<AppState>,
    claims: Claims,
    Path((username, name)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    timezones::delete_user_timezone(&state.store, &caller, &username, &name).await?;
    Ok(Json(json!({})))
}
