//! Beethoven JSON API, version 1
//!
//! Every endpoint here requires a logged-in session. Handlers hold the
//! session's navigation state for the whole request.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::AppState;

pub mod feed;
pub mod listen;
pub mod navigation;
pub mod profiles;
pub mod rate;

/// Create the v1 API router
pub fn v1_router() -> Router<AppState> {
    Router::new()
        // Session and navigation
        .route("/v1/session", get(navigation::get_session))
        .route("/v1/navigate", post(navigation::navigate))
        .route("/v1/view", get(navigation::current_view))
        .route("/v1/users/:username", get(navigation::lookup_user))
        // Profiles
        .route("/v1/profiles/:username", get(profiles::get_profile))
        .route("/v1/profiles/:username/subscribe", post(profiles::subscribe))
        .route(
            "/v1/profiles/:username/unsubscribe",
            post(profiles::unsubscribe),
        )
        .route("/v1/favorites", put(profiles::update_favorites))
        // Feed
        .route("/v1/feed", get(feed::get_feed))
        .route("/v1/reviews/:id/like", post(feed::toggle_like))
        // Rate a track
        .route("/v1/rate", get(rate::get_rate_page))
        .route("/v1/rate/search", post(rate::search))
        .route("/v1/rate/select", post(rate::select))
        .route("/v1/rate/reset", post(rate::reset))
        .route("/v1/reviews", post(rate::publish))
        // Listen list
        .route("/v1/listen", get(listen::get_listen_page).post(listen::add))
        .route("/v1/listen/search", post(listen::search))
        .route("/v1/listen/select", post(listen::select))
        .route("/v1/listen/reset", post(listen::reset))
        .route("/v1/listen/:id", delete(listen::remove))
}
