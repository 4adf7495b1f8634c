//! Route definitions for the Zonekeeper web server

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // User management
        .route(
            "/user",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/user/{username}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/user/{username}/enable", post(handlers::users::enable_user))
        .route("/user/{username}/disable", post(handlers::users::disable_user))
        // Role management
        .route(
            "/user_role",
            get(handlers::roles::list_roles).post(handlers::roles::create_role),
        )
        .route(
            "/user_role/{role}",
            get(handlers::roles::get_role).delete(handlers::roles::delete_role),
        )
        // Timezones
        .route("/timezone", get(handlers::timezones::list_timezones))
        .route(
            "/timezone/{username}",
            get(handlers::timezones::list_user_timezones)
                .post(handlers::timezones::create_user_timezone),
        )
        .route(
            "/timezone/{username}/{name}",
            get(handlers::timezones::get_user_timezone)
                .put(handlers::timezones::update_user_timezone)
                .delete(handlers::timezones::delete_user_timezone),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppState, WebConfig};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_check_route_responds() {
        let state = AppState::new(WebConfig::default()).await.unwrap();
        let app = api_routes().with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
