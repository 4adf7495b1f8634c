//! Shared helpers for the API integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use zonekeeper_web::{create_app, AppState, WebConfig};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

/// Build an app backed by a fresh in-memory database with seeded roles, the
/// bootstrap administrator, and the reference timezone catalog.
pub async fn spawn_app() -> Router {
    let state = AppState::new(WebConfig::default()).await.unwrap();
    create_app(state)
}

/// Fire a single request at the app
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = if let Some(body) = body {
        builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Extract a JSON body
pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Log in and return the access token
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = request(
        app,
        "POST",
        "/api/v1/auth/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login failed for {}", username);

    let body = response_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn admin_login(app: &Router) -> String {
    login(app, ADMIN_USERNAME, ADMIN_PASSWORD).await
}

/// Sign up a new account (starts disabled with no role)
pub async fn signup(app: &Router, username: &str) {
    let response = request(
        app,
        "POST",
        "/api/v1/user",
        Some(json!({
            "first_name": format!("{}_first", username),
            "last_name": format!("{}_last", username),
            "username": username,
            "email": format!("{}@example.com", username),
            "password": default_password(username),
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// The password `signup` registers for a username
pub fn default_password(username: &str) -> String {
    format!("{}-password", username)
}

/// Assign a role and enable the account, as the administrator
pub async fn assign_role_and_enable(app: &Router, admin_token: &str, username: &str, role: &str) {
    let response = request(
        app,
        "PUT",
        &format!("/api/v1/user/{}", username),
        Some(json!({ "role": role })),
        Some(admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        app,
        "POST",
        &format!("/api/v1/user/{}/enable", username),
        None,
        Some(admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Sign up, assign a role, and enable in one go; returns the user's token
pub async fn create_active_user(app: &Router, admin_token: &str, username: &str, role: &str) -> String {
    signup(app, username).await;
    assign_role_and_enable(app, admin_token, username, role).await;
    login(app, username, &default_password(username)).await
}

/// First catalog entry id, for creating timezone records
pub async fn first_catalog_id(app: &Router, token: &str) -> i64 {
    let response = request(app, "GET", "/api/v1/timezone", None, Some(token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    body["data"][0]["id"].as_i64().unwrap()
}
