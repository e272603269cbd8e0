//! Common test utilities for E2E tests

#![allow(dead_code)]

use axum::{Json, Router, extract::Query, routing::get};
use beethoven::{AppState, config};
use serde::Deserialize;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const PASSWORD: &str = "correct horse battery staple";
pub const PLACEHOLDER_IMAGE: &str = "https://placeholder.test/artist.png";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

/// Canned Deezer-style track search
///
/// "daft" matches two tracks, "many" matches twelve, "boom" fails with a
/// 500, anything else matches nothing.
async fn fake_track_search(
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, axum::http::StatusCode> {
    match query.q.to_lowercase().as_str() {
        "daft" => Ok(Json(json!({
            "data": [
                {
                    "title": "One More Time",
                    "artist": {"name": "Daft Punk"},
                    "album": {"cover_medium": "https://cdn.test/discovery.jpg"}
                },
                {
                    "title": "Around the World",
                    "artist": {"name": "Daft Punk"},
                    "album": {"cover_medium": "https://cdn.test/homework.jpg"}
                }
            ],
            "total": 2
        }))),
        "many" => Ok(Json(json!({
            "data": (1..=12)
                .map(|n| json!({"title": format!("Track {n}"), "artist": {"name": "Many"}}))
                .collect::<Vec<_>>(),
            "total": 12
        }))),
        "boom" => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
        _ => Ok(Json(json!({"data": [], "total": 0}))),
    }
}

/// Canned Deezer-style artist search
async fn fake_artist_search(Query(query): Query<SearchQuery>) -> Json<Value> {
    match query.q.to_lowercase().as_str() {
        "daft punk" | "daft" => Json(json!({
            "data": [{"name": "Daft Punk", "picture_medium": "https://cdn.test/daft.jpg"}]
        })),
        "air" => Json(json!({"data": [{"name": "Air"}]})),
        _ => Json(json!({"data": []})),
    }
}

async fn spawn_fake_provider() -> String {
    let app = Router::new()
        .route("/search", get(fake_track_search))
        .route("/search/artist", get(fake_artist_search));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn test_config(data_dir: &std::path::Path, music_base_url: &str) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let OS assign port
            domain: "localhost".to_string(),
            protocol: "http".to_string(),
        },
        storage: config::StorageConfig {
            data_dir: data_dir.to_path_buf(),
        },
        music: config::MusicConfig {
            base_url: music_base_url.to_string(),
            search_limit: 10,
            placeholder_image_url: PLACEHOLDER_IMAGE.to_string(),
            timeout_seconds: Some(5),
        },
        auth: config::AuthConfig {
            session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
            session_max_age: 604800,
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}

impl TestServer {
    /// Create a new test server instance backed by a fresh data directory
    pub async fn new() -> Self {
        let provider = spawn_fake_provider().await;
        Self::with_music_provider(&provider).await
    }

    pub async fn with_music_provider(music_base_url: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir.path().join("data"), music_base_url);

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = beethoven::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({"username": username, "password": password}))
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({"username": username, "password": password}))
            .send()
            .await
            .unwrap()
    }

    /// Register `username` and return a bearer token for a fresh session
    pub async fn sign_up(&self, username: &str) -> String {
        assert_eq!(self.register(username, PASSWORD).await.status(), 201);
        let response = self.login(username, PASSWORD).await;
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    /// Search for "daft", keep result `index` selected and publish a review
    pub async fn publish_review(
        &self,
        token: &str,
        index: usize,
        rating: f64,
        body: &str,
    ) -> Value {
        assert_eq!(
            self.post("/api/v1/rate/search", token, json!({"query": "daft"}))
                .await
                .status(),
            200
        );
        assert_eq!(
            self.post("/api/v1/rate/select", token, json!({"index": index}))
                .await
                .status(),
            200
        );
        let response = self
            .post(
                "/api/v1/reviews",
                token,
                json!({"rating": rating, "body": body}),
            )
            .await;
        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }
}
