//! Feed endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::AppState;
use crate::api::dto::{FeedParams, FeedResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::{FeedEntry, FeedService};

/// GET /api/v1/feed?mode=everyone|following
pub async fn get_feed(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
    let mode = params.mode.unwrap_or_default();
    let entries = FeedService::new(state.store.clone())
        .feed(user.username(), mode)
        .await?;

    Ok(Json(FeedResponse { mode, entries }))
}

/// POST /api/v1/reviews/:id/like
///
/// Toggles the viewer's like.
pub async fn toggle_like(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<FeedEntry>, AppError> {
    let review = FeedService::new(state.store.clone())
        .toggle_like(user.username(), &id)
        .await?;

    Ok(Json(FeedEntry {
        liked: review.is_liked_by(user.username()),
        review,
    }))
}
