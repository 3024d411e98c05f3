//! Shared helpers for the API integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use bakehouse_api::auth::jwt::{generate_access_token, JwtConfig};
use bakehouse_api::auth::password::hash_password;
use bakehouse_api::config::ServerConfig;
use bakehouse_api::media::LocalImageStore;
use bakehouse_api::router::build_app_router;
use bakehouse_api::state::AppState;
use bakehouse_core::roles::{ROLE_ADMIN, ROLE_BAKER};
use bakehouse_db::models::user::{CreateUser, User};
use bakehouse_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "masa-madre-123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_dir,
        media_base_url: "/media".to_string(),
        max_image_bytes: 1024,
        jwt: JwtConfig {
            secret: "bakehouse-integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router around `pool`, storing media in a
/// throwaway directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let media_dir = std::env::temp_dir().join(format!("bakehouse-test-{}", uuid::Uuid::new_v4()));
    build_test_app_with_media(pool, media_dir)
}

/// Same as [`build_test_app`] with an explicit media directory.
pub fn build_test_app_with_media(pool: PgPool, media_dir: PathBuf) -> Router {
    std::fs::create_dir_all(&media_dir).expect("media dir should be creatable");
    let config = test_config(media_dir);
    let state = AppState {
        pool,
        images: Arc::new(LocalImageStore::from_config(&config)),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config).expect("test router should build")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::POST, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// POST a single-file multipart form.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    field: &str,
    filename: &str,
    bytes: &[u8],
    token: &str,
) -> Response<Body> {
    let boundary = "bakehouse-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user directly, hashing [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: &str, is_approved: bool) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        is_approved,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for `user` without going through `/auth/login`.
pub fn token_for(user: &User) -> String {
    let config = test_config(PathBuf::new());
    generate_access_token(user.id, &user.role, &config.jwt).expect("token generation should succeed")
}

/// An approved baker and its token.
pub async fn baker_token(pool: &PgPool) -> String {
    let user = create_user(pool, "panadera@bakehouse.test", ROLE_BAKER, true).await;
    token_for(&user)
}

/// An approved admin and its token.
pub async fn admin_token(pool: &PgPool) -> (User, String) {
    let user = create_user(pool, "jefa@bakehouse.test", ROLE_ADMIN, true).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Inventory fixtures
// ---------------------------------------------------------------------------

/// Create an ingredient through the API and return its id.
pub async fn create_ingredient(
    app: Router,
    token: &str,
    name: &str,
    unit: &str,
    quantity: f64,
    cost: f64,
) -> i64 {
    let body = serde_json::json!({ "name": name, "unit": unit, "quantity": quantity, "cost": cost });
    let response = post_json_auth(app, "/api/v1/ingredients", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Flour, butter, sugar and eggs: `[flour, butter, sugar, eggs]`.
///
/// | name        | unit   | quantity | cost  |
/// |-------------|--------|----------|-------|
/// | Harina      | grams  | 1000     | 50.00 |
/// | Mantequilla | grams  | 100      | 15.00 |
/// | Azúcar      | grams  | 200      | 8.50  |
/// | Huevo       | pieces | 12       | 36.00 |
pub async fn seed_inventory(app: &Router, token: &str) -> [i64; 4] {
    [
        create_ingredient(app.clone(), token, "Harina", "grams", 1000.0, 50.0).await,
        create_ingredient(app.clone(), token, "Mantequilla", "grams", 100.0, 15.0).await,
        create_ingredient(app.clone(), token, "Azúcar", "grams", 200.0, 8.5).await,
        create_ingredient(app.clone(), token, "Huevo", "pieces", 12.0, 36.0).await,
    ]
}

/// Create a recipe through the API and return the `data` object.
pub async fn create_recipe(
    app: Router,
    token: &str,
    name: &str,
    recipe_type: &str,
    portions: i32,
    lines: &[(i64, f64)],
) -> Value {
    let ingredients: Vec<Value> = lines
        .iter()
        .map(|(id, q)| serde_json::json!({ "ingredient_id": id, "quantity_used": q }))
        .collect();
    let body = serde_json::json!({
        "name": name,
        "recipe_type": recipe_type,
        "quantity_portions": portions,
        "ingredients": ingredients,
    });
    let response = post_json_auth(app, "/api/v1/recipes", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
