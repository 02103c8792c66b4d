//! End-to-end account lifecycle over the router: register, blocked login,
//! admin activation, successful login with a session cookie.

mod common;

use common::{body_json, json_request, login, seed_admin, send, test_app};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn registration_activation_login_lifecycle() {
    let harness = test_app().await;
    let app = &harness.app;

    // 1. Register: account is created inactive
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Test Cafe",
                "phone": "09121110000",
                "password": "secret",
                "subscription_tier": "BASIC"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["active"], json!(false));
    let user_id = body["id"].as_i64().expect("user id");

    // 2. Login before activation fails with an "account not active" reason
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "phone": "09121110000", "password": "secret" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .to_lowercase()
            .contains("not active")
    );

    // 3. Admin activates the account
    seed_admin(&harness.state, "09129999999", "admin-pass").await;
    let admin_cookie = login(app, "09129999999", "admin-pass").await;
    let response = send(
        app,
        json_request(
            "POST",
            "/api/admin/users/activate",
            Some(&admin_cookie),
            Some(json!({ "user_id": user_id, "active": true })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 4. The same credentials now succeed and set the session cookie
    let cookie = login(app, "09121110000", "secret").await;
    assert!(cookie.starts_with("sarv-session="));

    let response = send(
        app,
        json_request("GET", "/api/auth/me", Some(&cookie), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["phone"], json!("09121110000"));
    assert_eq!(me["subscription_tier"], json!("BASIC"));
}

#[tokio::test]
async fn registration_rejects_bad_phone_and_short_password() {
    let harness = test_app().await;
    let app = &harness.app;

    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Test Cafe",
                "phone": "08123456789",
                "password": "secret",
                "subscription_tier": "BASIC"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Test Cafe",
                "phone": "09121110001",
                "password": "short",
                "subscription_tier": "BASIC"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registration_normalizes_the_phone_for_login() {
    let harness = test_app().await;
    let app = &harness.app;

    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Test Cafe",
                "phone": "+989121110002",
                "password": "secret",
                "subscription_tier": "PROFESSIONAL"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["phone"], json!("09121110002"));

    // duplicate registration under another accepted spelling conflicts
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Copy Cafe",
                "phone": "09121110002",
                "password": "secret",
                "subscription_tier": "BASIC"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_credentials_share_one_message() {
    let harness = test_app().await;
    let app = &harness.app;
    common::seed_user(
        &harness.state,
        "09121110003",
        "secret1",
        sarv_server::db::models::SubscriptionTier::Basic,
        true,
    )
    .await;

    let wrong_password = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "phone": "09121110003", "password": "nope12" })),
        ),
    )
    .await;
    let unknown_user = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "phone": "09121110004", "password": "nope12" })),
        ),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_user).await;
    assert_eq!(a["message"], b["message"], "no account enumeration");
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let harness = test_app().await;
    let app = &harness.app;

    let response = send(app, json_request("POST", "/api/auth/logout", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(http::header::SET_COOKIE)
        .expect("clear cookie")
        .to_str()
        .expect("str");
    assert!(set_cookie.starts_with("sarv-session="));
    assert!(set_cookie.contains("Max-Age=0"));
}
