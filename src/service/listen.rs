//! Listen-list service

use serde::Serialize;
use std::sync::Arc;

use super::review::SearchResult;
use crate::data::{EntityId, ListenEntry, RecordStore, today};
use crate::error::AppError;
use crate::music::{MusicLookup, Track};
use crate::navigation::SessionContext;

/// State of the listen-list page
#[derive(Debug, Clone, Serialize)]
pub struct ListenListPage {
    pub results: Vec<SearchResult>,
    pub selected: Option<usize>,
    pub preview: Option<Track>,
    /// The viewer's entries in insertion order
    pub entries: Vec<ListenEntry>,
}

/// Listen-list service
pub struct ListenService {
    store: Arc<RecordStore>,
    music: Arc<MusicLookup>,
}

impl ListenService {
    /// Create new listen-list service
    pub fn new(store: Arc<RecordStore>, music: Arc<MusicLookup>) -> Self {
        Self { store, music }
    }

    /// Entries owned by `username`, insertion order
    pub async fn entries(&self, username: &str) -> Result<Vec<ListenEntry>, AppError> {
        let entries = self.store.load::<ListenEntry>().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.username == username)
            .collect())
    }

    /// Current page state
    pub async fn page(&self, ctx: &SessionContext) -> Result<ListenListPage, AppError> {
        let slot = &ctx.listen_search;
        Ok(ListenListPage {
            results: SearchResult::from_tracks(&slot.results),
            selected: (!slot.is_empty()).then_some(slot.selected),
            preview: slot.selection().cloned(),
            entries: self.entries(ctx.user()?).await?,
        })
    }

    /// Run a track search and keep the results in the session
    pub async fn search(
        &self,
        ctx: &mut SessionContext,
        query: &str,
    ) -> Result<ListenListPage, AppError> {
        let results = self.music.search_tracks(query).await;
        tracing::debug!(query = %query, results = results.len(), "Listen-list track search");
        ctx.listen_search.set_results(results);
        self.page(ctx).await
    }

    /// Pick one of the search results
    pub async fn select(
        &self,
        ctx: &mut SessionContext,
        index: usize,
    ) -> Result<ListenListPage, AppError> {
        ctx.listen_search.select(index)?;
        self.page(ctx).await
    }

    /// Drop pending search results
    pub async fn reset(&self, ctx: &mut SessionContext) -> Result<ListenListPage, AppError> {
        ctx.listen_search.clear();
        self.page(ctx).await
    }

    /// Queue the selected track
    ///
    /// # Errors
    /// `Validation` if there is no selected search result
    pub async fn add(&self, ctx: &mut SessionContext) -> Result<ListenEntry, AppError> {
        let owner = ctx.user()?.to_string();
        let track = ctx.listen_search.selection().cloned().ok_or_else(|| {
            AppError::Validation("search for a track and select it before adding".to_string())
        })?;

        let entry = ListenEntry {
            id: EntityId::new().0,
            username: owner,
            artist: track.artist,
            track: track.title,
            image: track.cover,
            added_date: today(),
        };

        let row = entry.clone();
        self.store
            .update(move |entries: &mut Vec<ListenEntry>| {
                entries.push(row);
                Ok(())
            })
            .await?;

        ctx.listen_search.clear();
        tracing::info!(username = %entry.username, track = %entry.track, "Added to listen list");
        Ok(entry)
    }

    /// Remove one of `owner`'s entries
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Forbidden` for someone else's entry
    pub async fn delete(&self, owner: &str, entry_id: &str) -> Result<(), AppError> {
        self.store
            .update(|entries: &mut Vec<ListenEntry>| {
                let position = entries
                    .iter()
                    .position(|entry| entry.id == entry_id)
                    .ok_or(AppError::NotFound)?;
                if entries[position].username != owner {
                    return Err(AppError::Forbidden);
                }
                entries.remove(position);
                Ok(())
            })
            .await?;

        tracing::info!(username = %owner, entry_id = %entry_id, "Removed from listen list");
        Ok(())
    }
}
