//! Beethoven - a small social network for music reviews
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - JSON API v1                                              │
//! │  - Login page and server-rendered views                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Accounts, profiles, feed, reviews, listen list           │
//! │  - View routing over per-session navigation state           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────┐ ┌────────────────────────────┐
//! │          Data Layer           │ │        Music lookup         │
//! │  - Flat-file JSON datasets    │ │  - Deezer-compatible search │
//! │  - Session cache (moka)       │ │                             │
//! └──────────────────────────────┘ └────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers and page rendering
//! - `auth`: Password hashing, session tokens and extractors
//! - `service`: Business logic layer
//! - `navigation`: Per-session view and search state
//! - `music`: Music search provider client
//! - `data`: Record store and session cache
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod music;
pub mod navigation;
pub mod service;

use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// The five flat-file datasets
    pub store: Arc<data::RecordStore>,

    /// Logged-in sessions and their navigation state (volatile)
    pub sessions: Arc<data::SessionCache>,

    /// Music search provider client
    pub music: Arc<music::MusicLookup>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Open the record store (creating missing dataset files)
    /// 2. Initialize the session cache
    /// 3. Build the music lookup client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Open record store
        let store = data::RecordStore::open(&config.storage.data_dir).await?;
        let users = store.load::<data::User>().await?;
        let reviews = store.load::<data::Review>().await?;
        metrics::USERS_TOTAL.set(users.len() as i64);
        metrics::REVIEWS_TOTAL.set(reviews.len() as i64);
        tracing::info!(
            users = users.len(),
            reviews = reviews.len(),
            "Record store ready"
        );

        // 2. Initialize session cache
        let sessions = data::SessionCache::new(config.auth.session_max_age.max(1) as u64);
        tracing::info!("Session cache initialized");

        // 3. Initialize music lookup
        let music = music::MusicLookup::new(&config.music)?;
        tracing::info!(base_url = %config.music.base_url, "Music lookup initialized");

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            sessions: Arc::new(sessions),
            music: Arc::new(music),
        })
    }
}

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{
        compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
    };

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(api::pages_router())
        .nest("/api", api::v1_router())
        .route_layer(axum::middleware::from_fn(api::track_requests))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    if !server.protocol.eq_ignore_ascii_case("https") {
        return CorsLayer::permissive();
    }

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from server base URL; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
