//! Integration tests for the outbound HTTP clients
//!
//! Both clients run against small axum servers on an ephemeral port:
//! - catalog client: query parameters, bearer header, 401 and error mapping
//! - relay token client: success body, error body, unreachable relay

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shelf_cb::services::{CatalogApi, CatalogError, RelayTokenClient, SpotifyCatalogClient, TokenError, TokenSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What the fake catalog saw: path, query and authorization header
type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>, String)>>>;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn auth(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Test helper: fake catalog recording every request
async fn spawn_catalog(seen: Seen) -> String {
    async fn search(
        State(seen): State<Seen>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock().unwrap().push(("/search".to_string(), params, auth(&headers)));
        Json(json!({
            "albums": {"items": [
                {"id": "kid-a", "name": "Kid A", "release_date": "2000-10-02",
                 "artists": [{"id": "radiohead", "name": "Radiohead"}],
                 "images": [{"url": "https://i.scdn.co/image/kid-a-640"}, {"url": "https://i.scdn.co/image/kid-a-300"}],
                 "external_urls": {"spotify": "https://open.spotify.com/album/kid-a"}},
                null
            ]},
            "artists": {"items": [{"id": "radiohead", "name": "Radiohead"}]}
        }))
    }

    async fn artist_albums(
        State(seen): State<Seen>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        seen.lock()
            .unwrap()
            .push((format!("/artists/{}/albums", id), params, auth(&headers)));
        Json(json!({
            "items": [{"id": "in-rainbows", "name": "In Rainbows", "release_date": "2007-10-10"}],
            "total": 1
        }))
    }

    let app = Router::new()
        .route("/search", get(search))
        .route("/artists/:id/albums", get(artist_albums))
        .with_state(seen);
    spawn(app).await
}

#[tokio::test]
async fn test_search_sends_expected_query() {
    let seen: Seen = Arc::default();
    let base = spawn_catalog(seen.clone()).await;
    let client = SpotifyCatalogClient::new(&base, "GB", 20);

    let page = client.search("tok-123", "Radiohead").await.unwrap();

    assert_eq!(page.albums.len(), 1);
    assert_eq!(page.albums[0].name, "Kid A");
    assert_eq!(page.albums[0].first_image(), Some("https://i.scdn.co/image/kid-a-640"));
    assert_eq!(page.artists[0].id, "radiohead");

    let seen = seen.lock().unwrap();
    let (path, params, authorization) = &seen[0];
    assert_eq!(path, "/search");
    assert_eq!(params.get("q").map(String::as_str), Some("Radiohead"));
    assert_eq!(params.get("type").map(String::as_str), Some("album,artist"));
    assert_eq!(params.get("market").map(String::as_str), Some("GB"));
    assert_eq!(params.get("limit").map(String::as_str), Some("20"));
    assert_eq!(authorization, "Bearer tok-123");
}

#[tokio::test]
async fn test_artist_albums_restricted_to_albums() {
    let seen: Seen = Arc::default();
    let base = spawn_catalog(seen.clone()).await;
    let client = SpotifyCatalogClient::new(&format!("{}/", base), "US", 50);

    let albums = client.artist_albums("tok-123", "radiohead").await.unwrap();

    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].id, "in-rainbows");

    let seen = seen.lock().unwrap();
    let (path, params, _) = &seen[0];
    assert_eq!(path, "/artists/radiohead/albums");
    assert_eq!(params.get("include_groups").map(String::as_str), Some("album"));
    assert_eq!(params.get("market").map(String::as_str), Some("US"));
    assert_eq!(params.get("limit").map(String::as_str), Some("50"));
}

#[tokio::test]
async fn test_catalog_status_mapping() {
    let app = Router::new()
        .route(
            "/search",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": {"status": 401}}))) }),
        )
        .route(
            "/artists/:id/albums",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
    let base = spawn(app).await;
    let client = SpotifyCatalogClient::new(&base, "US", 50);

    assert!(matches!(client.search("old", "x").await, Err(CatalogError::Unauthorized)));
    match client.artist_albums("tok", "a").await {
        Err(CatalogError::ApiError(status, body)) => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_relay_token_success() {
    let app = Router::new().route(
        "/api/token",
        get(|| async {
            Json(json!({"access_token": "fresh", "token_type": "Bearer", "expires_in": 3600}))
        }),
    );
    let base = spawn(app).await;
    let client = RelayTokenClient::new(&base);
    assert_eq!(client.token_url(), format!("{}/api/token", base));

    let token = client.fetch_token().await.unwrap();

    assert_eq!(token.access_token(), "fresh");
    assert_eq!(token.token_type(), "Bearer");
    assert!(token.expires_at().is_some());
    assert!(!token.is_expired_at(chrono::Utc::now()));
}

#[tokio::test]
async fn test_relay_error_body_is_reported() {
    let app = Router::new().route(
        "/api/token",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "missing_client_credentials",
                    "message": "Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET"
                })),
            )
        }),
    );
    let base = spawn(app).await;

    match RelayTokenClient::new(&base).fetch_token().await {
        Err(TokenError::UnexpectedResponse { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("missing_client_credentials"));
        }
        other => panic!("expected UnexpectedResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_relay_non_json_is_parse_error() {
    let app = Router::new().route("/api/token", get(|| async { "<html>oops</html>" }));
    let base = spawn(app).await;

    assert!(matches!(
        RelayTokenClient::new(&base).fetch_token().await,
        Err(TokenError::ParseError(_))
    ));
}

#[tokio::test]
async fn test_relay_unreachable_is_network_error() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RelayTokenClient::new(&format!("http://{}", addr));
    assert!(matches!(client.fetch_token().await, Err(TokenError::NetworkError(_))));
}
