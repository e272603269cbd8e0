//! View router
//!
//! Picks the page logic for a session's active view.

use serde::Serialize;
use std::sync::Arc;

use super::{
    AccountService, FeedEntry, FeedService, ListenListPage, ListenService, ProfilePage,
    ProfileService, RateTrackPage, ReviewService,
};
use crate::data::RecordStore;
use crate::error::AppError;
use crate::music::MusicLookup;
use crate::navigation::{FeedMode, SessionContext, View};

/// A rendered page
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Page {
    Feed {
        mode: FeedMode,
        entries: Vec<FeedEntry>,
    },
    Profile(ProfilePage),
    RateTrack(RateTrackPage),
    ListenList(ListenListPage),
}

/// View router
pub struct ViewRouter {
    store: Arc<RecordStore>,
    music: Arc<MusicLookup>,
}

impl ViewRouter {
    /// Create new view router
    pub fn new(store: Arc<RecordStore>, music: Arc<MusicLookup>) -> Self {
        Self { store, music }
    }

    /// Switch the active view
    ///
    /// Navigating to a profile requires the user to exist.
    pub async fn navigate(&self, ctx: &mut SessionContext, view: View) -> Result<(), AppError> {
        if let View::Profile { username } = &view {
            let accounts = AccountService::new(self.store.clone());
            if !accounts.user_exists(username).await? {
                return Err(AppError::NotFound);
            }
        }

        tracing::debug!(view = ?view, "Navigate");
        ctx.navigate(view);
        Ok(())
    }

    /// Render the active view from freshly loaded data
    pub async fn render(&self, ctx: &SessionContext) -> Result<Page, AppError> {
        let viewer = ctx.user()?;

        match &ctx.active_view {
            View::Feed { mode } => {
                let entries = FeedService::new(self.store.clone())
                    .feed(viewer, *mode)
                    .await?;
                Ok(Page::Feed {
                    mode: *mode,
                    entries,
                })
            }
            View::Profile { username } => {
                let page = ProfileService::new(self.store.clone(), self.music.clone())
                    .profile(viewer, username)
                    .await?;
                Ok(Page::Profile(page))
            }
            View::RateTrack => Ok(Page::RateTrack(
                ReviewService::new(self.store.clone(), self.music.clone()).page(ctx),
            )),
            View::ListenList => Ok(Page::ListenList(
                ListenService::new(self.store.clone(), self.music.clone())
                    .page(ctx)
                    .await?,
            )),
        }
    }
}
