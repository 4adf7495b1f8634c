//! Role management handlers

use super::{data_response, ApiResult};
use crate::auth::Claims;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use zonekeeper_applications::operations::roles;
use zonekeeper_applications::Role;

/// Role creation request body
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub role: String,
    pub permissions: Vec<String>,
}

/// Wire view of a role
#[derive(Debug, Serialize)]
pub struct RoleView {
    pub id: i64,
    pub role: String,
    pub permissions: Vec<String>,
}

impl From<Role> for RoleView {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            role: role.name,
            permissions: role.permissions.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// List every role
pub async fn list_roles(State(state): State<AppState>, claims: Claims) -> ApiResult<Response> {
    let caller = claims.to_caller_claims()?;
    let views: Vec<RoleView> = roles::list_roles(&state.store, &caller)
        .await?
        .into_iter()
        .map(RoleView::from)
        .collect();
    Ok(data_response(views))
}

/// Create a role from a name and permission tokens
pub async fn create_role(
    State(state): State<AppState>,
    claims: Claims,
    Json(request): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleView>)> {
    let caller = claims.to_caller_claims()?;
    let role = roles::create_role(&state.store, &caller, &request.role, &request.permissions).await?;
    Ok((StatusCode::CREATED, Json(RoleView::from(role))))
}

/// Fetch a single role
pub async fn get_role(
    State(state): State<AppState>,
    claims: Claims,
    Path(role): Path<String>,
) -> ApiResult<Json<RoleView>> {
    let caller = claims.to_caller_claims()?;
    let role = roles::get_role(&state.store, &caller, &role).await?;
    Ok(Json(RoleView::from(role)))
}

/// Delete a role
pub async fn delete_role(
    State(state): State<AppState>,
    claims: Claims,
    Path(role): Path<String>,
) -> ApiResult<Json<Value>> {
    let caller = claims.to_caller_claims()?;
    roles::delete_role(&state.store, &caller, &role).await?;
    Ok(Json(json!({})))
}
