//! Rate-a-track endpoints
//!
//! Search results and the selection live in the caller's session, so the
//! session lock is held across each step.

use axum::{extract::State, http::StatusCode, response::Json};

use crate::AppState;
use crate::api::dto::{PublishReviewRequest, SearchRequest, SelectRequest};
use crate::auth::CurrentUser;
use crate::data::Review;
use crate::error::AppError;
use crate::service::{RateTrackPage, ReviewService};

fn reviews(state: &AppState) -> ReviewService {
    ReviewService::new(state.store.clone(), state.music.clone())
}

/// GET /api/v1/rate
pub async fn get_rate_page(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<RateTrackPage>, AppError> {
    let ctx = user.context.lock().await;
    Ok(Json(reviews(&state).page(&ctx)))
}

/// POST /api/v1/rate/search
pub async fn search(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SearchRequest>,
) -> Result<Json<RateTrackPage>, AppError> {
    let mut ctx = user.context.lock().await;
    Ok(Json(reviews(&state).search(&mut ctx, &req.query).await))
}

/// POST /api/v1/rate/select
pub async fn select(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SelectRequest>,
) -> Result<Json<RateTrackPage>, AppError> {
    let mut ctx = user.context.lock().await;
    Ok(Json(reviews(&state).select(&mut ctx, req.index)?))
}

/// POST /api/v1/rate/reset
pub async fn reset(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<RateTrackPage>, AppError> {
    let mut ctx = user.context.lock().await;
    Ok(Json(reviews(&state).reset(&mut ctx)))
}

/// POST /api/v1/reviews
///
/// Publishes a review of the selected track.
pub async fn publish(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PublishReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let mut ctx = user.context.lock().await;
    let review = reviews(&state)
        .publish(&mut ctx, req.rating, &req.body)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}
