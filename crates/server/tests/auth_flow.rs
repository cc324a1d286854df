use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use common::utils::id::make_id;
use server::auth::{AppState, AuthConfig};
use server::routes;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

async fn build_app() -> anyhow::Result<Router> {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db = models::db::connect_to(&uri, "carhub_test").await?;
    let state = AppState { db, auth: AuthConfig { jwt_secret: "test-secret".into() } };
    Ok(routes::build_router(cors(), state))
}

async fn body_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn test_health_ok() -> anyhow::Result<()> {
    let app = build_app().await?;
    let req = Request::builder().uri("/health").body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await?;
    assert_eq!(json["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn test_signup_and_login_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let username = format!("user_{}", make_id(8));
    let password = "S3curePass!";

    // Signup
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "username": username, "password": password, "fullname": "Tester"
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("set-cookie").is_some());
    let user = body_json(resp).await?;
    assert!(user.get("password").is_none());
    assert_eq!(user["isAdmin"], json!(false));

    // Duplicate signup is rejected
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "username": username, "password": password, "fullname": "Clone"
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Login
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "username": username, "password": password
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    // Must set cookie
    assert!(resp.headers().get("set-cookie").is_some());
    let user = body_json(resp).await?;
    assert!(user.get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let username = format!("user_{}", make_id(8));

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "username": username, "password": "StrongPass123", "fullname": "Tester"
        }))?))?;
    let _ = app.clone().call(req).await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "username": username, "password": "wrong"
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_signup_short_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "username": format!("user_{}", make_id(8)), "password": "short", "fullname": "A"
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_mutation_requires_login() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let req = Request::builder()
        .method("POST")
        .uri("/api/car")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({
            "vendor": "Susita", "speed": 45
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
