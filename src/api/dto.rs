//! API request and response DTOs

use serde::{Deserialize, Serialize};

use crate::navigation::{FeedMode, View};
use crate::service::FeedEntry;

/// GET /api/v1/session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: String,
    pub active_view: View,
    pub pending_review_results: usize,
    pub pending_listen_results: usize,
}

/// Body of the two search actions
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// Body of the two select actions
#[derive(Debug, Clone, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// POST /api/v1/reviews
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishReviewRequest {
    /// Defaults to 2.5
    pub rating: Option<f64>,
    #[serde(default)]
    pub body: String,
}

/// PUT /api/v1/favorites
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesRequest {
    /// One to three artist names; blank entries leave their slot empty
    pub artists: Vec<String>,
}

/// GET /api/v1/feed query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub mode: Option<FeedMode>,
}

/// GET /api/v1/feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub mode: FeedMode,
    pub entries: Vec<FeedEntry>,
}

/// GET /api/v1/users/:username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
}
