//! Session, navigation and view rendering endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::AppState;
use crate::api::dto::{SessionResponse, UserResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::navigation::View;
use crate::service::{AccountService, Page, ViewRouter};

/// GET /api/v1/session
pub async fn get_session(user: CurrentUser) -> Result<Json<SessionResponse>, AppError> {
    let ctx = user.context.lock().await;

    Ok(Json(SessionResponse {
        username: ctx.user()?.to_string(),
        active_view: ctx.active_view.clone(),
        pending_review_results: ctx.review_search.results.len(),
        pending_listen_results: ctx.listen_search.results.len(),
    }))
}

/// POST /api/v1/navigate
///
/// Switches the active view and returns it rendered.
pub async fn navigate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(view): Json<View>,
) -> Result<Json<Page>, AppError> {
    let mut ctx = user.context.lock().await;
    let router = ViewRouter::new(state.store.clone(), state.music.clone());

    router.navigate(&mut ctx, view).await?;
    Ok(Json(router.render(&ctx).await?))
}

/// GET /api/v1/view
pub async fn current_view(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Page>, AppError> {
    let ctx = user.context.lock().await;
    let router = ViewRouter::new(state.store.clone(), state.music.clone());

    Ok(Json(router.render(&ctx).await?))
}

/// GET /api/v1/users/:username
///
/// Profile search: 404 unless the username is registered.
pub async fn lookup_user(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    if !AccountService::new(state.store.clone())
        .user_exists(&username)
        .await?
    {
        return Err(AppError::NotFound);
    }

    Ok(Json(UserResponse { username }))
}
