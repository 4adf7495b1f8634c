//! Timezone API integration tests: the reference catalog and per-user
//! records

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn catalog_is_visible_to_any_enabled_account() {
    let app = spawn_app().await;
    let admin_token = admin_login(&app).await;
    let alice_token = create_active_user(&app, &admin_token, "alice1", "user").await;

    let response = request(&app, "GET", "/api/v1/timezone", None, Some(&alice_token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let entries = body["data"].as_array().unwrap();
    assert!(!entries.is_empty());
    for entry in entries {
        assert!(entry["location"].is_string());
        assert!(entry["city"].is_string());
        assert!(entry["relative_to_gmt"].is_string());
    }

    // But not without a token
    let response = request(&app, "GET", "/api/v1/timezone", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn labels_are_unique_per_owner_not_globally() {
    let app = spawn_app().await;
    let admin_token = admin_login(&app).await;
    let alice_token = create_active_user(&app, &admin_token, "alice1", "user").await;
    let bobby_token = create_active_user(&app, &admin_token, "bobby1", "user").await;

    let tz = first_catalog_id(&app, &alice_token).await;

    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/alice1",
        Some(json!({ "name": "Home", "timezone_id": tz })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // A different owner may reuse the label
    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/bobby1",
        Some(json!({ "name": "Home", "timezone_id": tz })),
        Some(&bobby_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The same owner may not
    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/alice1",
        Some(json!({ "name": "Home", "timezone_id": tz })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn cross_user_records_require_the_all_records_tier() {
    let app = spawn_app().await;
    let admin_token = admin_login(&app).await;
    let alice_token = create_active_user(&app, &admin_token, "alice1", "user").await;
    let bobby_token = create_active_user(&app, &admin_token, "bobby1", "user").await;

    let tz = first_catalog_id(&app, &bobby_token).await;
    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/bobby1",
        Some(json!({ "name": "Home", "timezone_id": tz })),
        Some(&bobby_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // An own-tier caller cannot read or write another user's records
    let response = request(&app, "GET", "/api/v1/timezone/bobby1", None, Some(&alice_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/bobby1",
        Some(json!({ "name": "Work", "timezone_id": tz })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = request(
        &app,
        "DELETE",
        "/api/v1/timezone/bobby1/Home",
        None,
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The admin's all-records tier reaches everything
    let response = request(&app, "GET", "/api/v1/timezone/bobby1", None, Some(&admin_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["name"], "Home");
    assert_eq!(body["data"][0]["username"], "bobby1");

    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/bobby1",
        Some(json!({ "name": "Work", "timezone_id": tz })),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn single_record_fetch_update_and_delete() {
    let app = spawn_app().await;
    let admin_token = admin_login(&app).await;
    let alice_token = create_active_user(&app, &admin_token, "alice1", "user").await;

    let tz = first_catalog_id(&app, &alice_token).await;
    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/alice1",
        Some(json!({ "name": "Home", "timezone_id": tz })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(
        &app,
        "GET",
        "/api/v1/timezone/alice1/Home",
        None,
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["name"], "Home");
    assert_eq!(body["timezone_id"], tz);
    assert!(body["relative_to_gmt"].is_string());

    // Rename, then the old label is gone
    let response = request(
        &app,
        "PUT",
        "/api/v1/timezone/alice1/Home",
        Some(json!({ "name": "Base" })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        &app,
        "GET",
        "/api/v1/timezone/alice1/Base",
        None,
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = request(
        &app,
        "GET",
        "/api/v1/timezone/alice1/Home",
        None,
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = request(
        &app,
        "DELETE",
        "/api/v1/timezone/alice1/Base",
        None,
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // No records left: the collection reports not found
    let response = request(&app, "GET", "/api/v1/timezone/alice1", None, Some(&alice_token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_to_an_existing_label_conflicts() {
    let app = spawn_app().await;
    let admin_token = admin_login(&app).await;
    let alice_token = create_active_user(&app, &admin_token, "alice1", "user").await;

    let tz = first_catalog_id(&app, &alice_token).await;
    for name in ["Home", "Office"] {
        let response = request(
            &app,
            "POST",
            "/api/v1/timezone/alice1",
            Some(json!({ "name": name, "timezone_id": tz })),
            Some(&alice_token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = request(
        &app,
        "PUT",
        "/api/v1/timezone/alice1/Office",
        Some(json!({ "name": "Home" })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_catalog_references_are_not_found() {
    let app = spawn_app().await;
    let admin_token = admin_login(&app).await;
    let alice_token = create_active_user(&app, &admin_token, "alice1", "user").await;

    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/alice1",
        Some(json!({ "name": "Nowhere", "timezone_id": 99999 })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let tz = first_catalog_id(&app, &alice_token).await;
    let response = request(
        &app,
        "POST",
        "/api/v1/timezone/alice1",
        Some(json!({ "name": "Home", "timezone_id": tz })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = request(
        &app,
        "PUT",
        "/api/v1/timezone/alice1/Home",
        Some(json!({ "timezone_id": 99999 })),
        Some(&alice_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
