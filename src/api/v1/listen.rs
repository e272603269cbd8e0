//! Listen-list endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::AppState;
use crate::api::dto::{SearchRequest, SelectRequest};
use crate::auth::CurrentUser;
use crate::data::ListenEntry;
use crate::error::AppError;
use crate::service::{ListenListPage, ListenService};

fn listen(state: &AppState) -> ListenService {
    ListenService::new(state.store.clone(), state.music.clone())
}

/// GET /api/v1/listen
pub async fn get_listen_page(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ListenListPage>, AppError> {
    let ctx = user.context.lock().await;
    Ok(Json(listen(&state).page(&ctx).await?))
}

/// POST /api/v1/listen/search
pub async fn search(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SearchRequest>,
) -> Result<Json<ListenListPage>, AppError> {
    let mut ctx = user.context.lock().await;
    Ok(Json(listen(&state).search(&mut ctx, &req.query).await?))
}

/// POST /api/v1/listen/select
pub async fn select(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SelectRequest>,
) -> Result<Json<ListenListPage>, AppError> {
    let mut ctx = user.context.lock().await;
    Ok(Json(listen(&state).select(&mut ctx, req.index).await?))
}

/// POST /api/v1/listen/reset
pub async fn reset(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ListenListPage>, AppError> {
    let mut ctx = user.context.lock().await;
    Ok(Json(listen(&state).reset(&mut ctx).await?))
}

/// POST /api/v1/listen
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<(StatusCode, Json<ListenEntry>), AppError> {
    let mut ctx = user.context.lock().await;
    let entry = listen(&state).add(&mut ctx).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/listen/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    listen(&state).delete(user.username(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
