//! Shared test harness: in-memory state, seeded accounts, router helpers.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, Response, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sarv_server::core::{Config, ServerState};
use sarv_server::db::models::{Role, SubscriptionTier, User};
use sarv_server::db::repository::user as user_repo;
use sarv_server::utils::{now_millis, snowflake_id};

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    _work_dir: tempfile::TempDir,
}

pub async fn test_app() -> TestApp {
    let work_dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(work_dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize_in_memory(&config)
        .await
        .expect("state init");
    let app = sarv_server::api::build_app(&state);
    TestApp {
        state,
        app,
        _work_dir: work_dir,
    }
}

/// Plain in-memory state for repository-level tests
pub async fn test_state() -> ServerState {
    let config = Config::with_overrides("/tmp/sarv-test", 0);
    ServerState::initialize_in_memory(&config)
        .await
        .expect("state init")
}

/// Register a tenant account and optionally flip it active.
pub async fn seed_user(
    state: &ServerState,
    phone: &str,
    password: &str,
    tier: SubscriptionTier,
    active: bool,
) -> i64 {
    let user = user_repo::register(state.pool(), "Test Cafe", phone, password, tier)
        .await
        .expect("register");
    if active {
        user_repo::set_active(state.pool(), user.id, true)
            .await
            .expect("activate");
    }
    user.id
}

/// Insert an admin account directly (registration only creates tenants).
pub async fn seed_admin(state: &ServerState, phone: &str, password: &str) -> i64 {
    let id = snowflake_id();
    let hash = User::hash_password(password).expect("hash");
    sqlx::query(
        "INSERT INTO user (id, phone, hash_pass, name, role, subscription_tier, active, has_online_menu, created_at) \
         VALUES (?, ?, ?, 'Console Admin', ?, ?, 1, 0, ?)",
    )
    .bind(id)
    .bind(phone)
    .bind(&hash)
    .bind(Role::Admin)
    .bind(SubscriptionTier::Professional)
    .bind(now_millis())
    .execute(state.pool())
    .await
    .expect("seed admin");
    id
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<axum::body::Body> {
    app.clone().oneshot(request).await.expect("infallible")
}

pub async fn body_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    }
}

/// Log a user in over the router and return the session cookie pair.
pub async fn login(app: &Router, phone: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(serde_json::json!({ "phone": phone, "password": password })),
        ),
    )
    .await;
    assert_eq!(response.status(), http::StatusCode::OK, "login failed");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .expect("cookie str")
        .to_string();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}
