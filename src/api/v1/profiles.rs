//! Profile, subscription and favorite-artist endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::AppState;
use crate::api::dto::FavoritesRequest;
use crate::auth::CurrentUser;
use crate::data::FavoriteTriple;
use crate::error::AppError;
use crate::service::{ProfilePage, ProfileService};

fn profiles(state: &AppState) -> ProfileService {
    ProfileService::new(state.store.clone(), state.music.clone())
}

/// GET /api/v1/profiles/:username
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<ProfilePage>, AppError> {
    let page = profiles(&state).profile(user.username(), &username).await?;
    Ok(Json(page))
}

/// POST /api/v1/profiles/:username/subscribe
///
/// Idempotent; returns the refreshed profile.
pub async fn subscribe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<ProfilePage>, AppError> {
    let service = profiles(&state);
    service.subscribe(user.username(), &username).await?;
    Ok(Json(service.profile(user.username(), &username).await?))
}

/// POST /api/v1/profiles/:username/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<ProfilePage>, AppError> {
    let service = profiles(&state);
    service.unsubscribe(user.username(), &username).await?;
    Ok(Json(service.profile(user.username(), &username).await?))
}

/// PUT /api/v1/favorites
pub async fn update_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<FavoritesRequest>,
) -> Result<Json<FavoriteTriple>, AppError> {
    let triple = profiles(&state)
        .save_favorites(user.username(), &req.artists)
        .await?;
    Ok(Json(triple))
}
