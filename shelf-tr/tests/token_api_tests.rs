//! Integration tests for shelf-tr endpoints
//!
//! Tests cover:
//! - Token exchange against a fake identity service (success, rejection, unreachable)
//! - Missing credentials never leak the configured secret
//! - Fresh exchange per request (no caching)
//! - Diagnostic token-config endpoint
//! - Health endpoint
//! - Static asset serving with a configurable index file

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    routing::post,
    Form, Json, Router,
};
use serde_json::{json, Value};
use serial_test::serial;
use shelf_common::api::TokenResponse;
use shelf_tr::{build_router, AppState, ClientCredentials, CredentialSource, RelayConfig};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Basic auth header for `test-id:test-secret`
const EXPECTED_AUTH: &str = "Basic dGVzdC1pZDp0ZXN0LXNlY3JldA==";

/// Test helper: fake identity service counting its hits
async fn spawn_identity_service(hits: Arc<AtomicUsize>) -> String {
    async fn issue(
        State(hits): State<Arc<AtomicUsize>>,
        headers: HeaderMap,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        hits.fetch_add(1, Ordering::SeqCst);

        let auth_ok = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == EXPECTED_AUTH)
            .unwrap_or(false);
        let grant_ok = form.get("grant_type").map(String::as_str) == Some("client_credentials");

        if auth_ok && grant_ok {
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": "fake-access-token",
                    "token_type": "Bearer",
                    "expires_in": 3600
                })),
            )
        } else {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_client",
                    "error_description": "Invalid client secret"
                })),
            )
        }
    }

    let app = Router::new()
        .route("/api/token", post(issue))
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api/token", addr)
}

/// Test helper: app wired to a token URL, fixed credentials and a static dir
fn setup_app(token_url: &str, creds: ClientCredentials, static_dir: &Path) -> Router {
    let config = RelayConfig {
        token_url: token_url.to_string(),
        static_dir: static_dir.to_path_buf(),
        index_file: "index.html".to_string(),
    };
    build_router(AppState::new(config, CredentialSource::Fixed(creds)))
}

fn valid_creds() -> ClientCredentials {
    ClientCredentials::new(Some("test-id".into()), Some("test-secret".into()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

async fn body_json(body: Body) -> Value {
    serde_json::from_str(&body_text(body).await).expect("Should parse JSON")
}

// =============================================================================
// /api/token
// =============================================================================

#[tokio::test]
async fn test_token_success_forwards_upstream_body() {
    let hits = Arc::new(AtomicUsize::new(0));
    let token_url = spawn_identity_service(hits.clone()).await;
    let dir = TempDir::new().unwrap();
    let app = setup_app(&token_url, valid_creds(), dir.path());

    let response = app.oneshot(get("/api/token")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap().to_string();
    assert!(content_type.contains("application/json"));

    let token: TokenResponse = serde_json::from_value(body_json(response.into_body()).await).unwrap();
    assert_eq!(token.access_token, "fake-access-token");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 3600);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_token_upstream_rejection_forwarded_verbatim() {
    let hits = Arc::new(AtomicUsize::new(0));
    let token_url = spawn_identity_service(hits).await;
    let dir = TempDir::new().unwrap();
    let creds = ClientCredentials::new(Some("test-id".into()), Some("wrong".into()));
    let app = setup_app(&token_url, creds, dir.path());

    let response = app.oneshot(get("/api/token")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({"error": "invalid_client", "error_description": "Invalid client secret"})
    );
}

#[tokio::test]
async fn test_token_missing_credentials_is_config_error_without_secret() {
    let hits = Arc::new(AtomicUsize::new(0));
    let token_url = spawn_identity_service(hits.clone()).await;
    let dir = TempDir::new().unwrap();
    // Secret present, id missing: the secret must not show up anywhere
    let creds = ClientCredentials::new(None, Some("super-secret-value".into()));
    let app = setup_app(&token_url, creds, dir.path());

    let response = app.oneshot(get("/api/token")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_text(response.into_body()).await;
    assert!(!text.contains("super-secret-value"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"], "missing_client_credentials");
    assert!(body["message"].as_str().unwrap().contains("SPOTIFY_CLIENT_ID"));
    assert_eq!(hits.load(Ordering::SeqCst), 0, "No exchange without credentials");
}

#[tokio::test]
async fn test_token_both_missing() {
    let dir = TempDir::new().unwrap();
    let app = setup_app("http://127.0.0.1:9/unused", ClientCredentials::default(), dir.path());

    let response = app.oneshot(get("/api/token")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response.into_body()).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("SPOTIFY_CLIENT_ID"));
    assert!(message.contains("SPOTIFY_CLIENT_SECRET"));
}

#[tokio::test]
async fn test_token_unreachable_upstream_is_bad_gateway() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let app = setup_app(&format!("http://{}/api/token", addr), valid_creds(), dir.path());

    let response = app.oneshot(get("/api/token")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let text = body_text(response.into_body()).await;
    assert!(!text.contains("test-secret"));
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["error"], "token_exchange_failed");
}

#[tokio::test]
async fn test_every_request_performs_fresh_exchange() {
    let hits = Arc::new(AtomicUsize::new(0));
    let token_url = spawn_identity_service(hits.clone()).await;
    let dir = TempDir::new().unwrap();
    let app = setup_app(&token_url, valid_creds(), dir.path());

    for _ in 0..3 {
        let response = app.clone().oneshot(get("/api/token")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

// =============================================================================
// /api/token-config
// =============================================================================

#[tokio::test]
async fn test_token_config_reports_presence_only() {
    let dir = TempDir::new().unwrap();
    let creds = ClientCredentials::new(Some("abcdef".into()), Some("topsecret".into()));
    let app = setup_app("http://127.0.0.1:9/unused", creds, dir.path());

    let response = app.oneshot(get("/api/token-config")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response.into_body()).await;
    assert!(!text.contains("abcdef"));
    assert!(!text.contains("topsecret"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["clientIdPresent"], true);
    assert_eq!(body["clientSecretPresent"], true);
    assert_eq!(body["clientIdLength"], 6);
    assert_eq!(body["clientSecretLength"], 9);
}

#[tokio::test]
#[serial]
async fn test_environment_source_reads_fallback_names() {
    std::env::remove_var("SPOTIFY_CLIENT_ID");
    std::env::remove_var("SPOTIFY_CLIENT_SECRET");
    std::env::set_var("VITE_SPOTIFY_CLIENT_ID", "vite-id");
    std::env::remove_var("VITE_SPOTIFY_CLIENT_SECRET");

    let dir = TempDir::new().unwrap();
    let config = RelayConfig {
        static_dir: dir.path().to_path_buf(),
        ..RelayConfig::default()
    };
    let app = build_router(AppState::new(config, CredentialSource::Environment));

    let response = app.oneshot(get("/api/token-config")).await.unwrap();
    let body = body_json(response.into_body()).await;
    assert_eq!(body["clientIdPresent"], true);
    assert_eq!(body["clientIdLength"], 7);
    assert_eq!(body["clientSecretPresent"], false);

    std::env::remove_var("VITE_SPOTIFY_CLIENT_ID");
}

// =============================================================================
// /health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = setup_app("http://127.0.0.1:9/unused", valid_creds(), dir.path());

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shelf-tr");
    assert!(body["version"].is_string());
}

// =============================================================================
// Static assets
// =============================================================================

#[tokio::test]
async fn test_static_index_and_assets() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>shelf</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('shelf');").unwrap();
    let app = setup_app("http://127.0.0.1:9/unused", valid_creds(), dir.path());

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response.into_body()).await, "<html>shelf</html>");

    let response = app.clone().oneshot(get("/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response.into_body()).await, "console.log('shelf');");

    let response = app.oneshot(get("/missing.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_index_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.html"), "<html>custom</html>").unwrap();
    let config = RelayConfig {
        token_url: "http://127.0.0.1:9/unused".to_string(),
        static_dir: dir.path().to_path_buf(),
        index_file: "main.html".to_string(),
    };
    let app = build_router(AppState::new(config, CredentialSource::Fixed(valid_creds())));

    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response.into_body()).await, "<html>custom</html>");
}
