//! Review service
//!
//! The rate-a-track flow: search, select, publish.

use serde::Serialize;
use std::sync::Arc;

use crate::data::{EntityId, RecordStore, Review, today};
use crate::error::AppError;
use crate::metrics::REVIEWS_TOTAL;
use crate::music::{MusicLookup, Track};
use crate::navigation::SessionContext;

/// Rating preselected in the form
pub const DEFAULT_RATING: f64 = 2.5;

/// State of the rate-a-track page
#[derive(Debug, Clone, Serialize)]
pub struct RateTrackPage {
    pub results: Vec<SearchResult>,
    pub selected: Option<usize>,
    /// The track a publish would review
    pub preview: Option<Track>,
    pub default_rating: f64,
}

/// A search result with its selection-list label
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub label: String,
    #[serde(flatten)]
    pub track: Track,
}

impl SearchResult {
    pub fn from_tracks(tracks: &[Track]) -> Vec<Self> {
        tracks
            .iter()
            .map(|track| SearchResult {
                label: track.label(),
                track: track.clone(),
            })
            .collect()
    }
}

/// Ratings go from 0 to 5 in half steps
pub fn validate_rating(rating: f64) -> Result<f64, AppError> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) || (rating * 2.0).fract() != 0.0 {
        return Err(AppError::Validation(format!(
            "rating must be between 0 and 5 in steps of 0.5, got {rating}"
        )));
    }
    Ok(rating)
}

/// Review service
pub struct ReviewService {
    store: Arc<RecordStore>,
    music: Arc<MusicLookup>,
}

impl ReviewService {
    /// Create new review service
    pub fn new(store: Arc<RecordStore>, music: Arc<MusicLookup>) -> Self {
        Self { store, music }
    }

    /// Current page state
    pub fn page(&self, ctx: &SessionContext) -> RateTrackPage {
        let slot = &ctx.review_search;
        RateTrackPage {
            results: SearchResult::from_tracks(&slot.results),
            selected: (!slot.is_empty()).then_some(slot.selected),
            preview: slot.selection().cloned(),
            default_rating: DEFAULT_RATING,
        }
    }

    /// Run a track search and keep the results in the session
    pub async fn search(&self, ctx: &mut SessionContext, query: &str) -> RateTrackPage {
        let results = self.music.search_tracks(query).await;
        tracing::debug!(query = %query, results = results.len(), "Review track search");
        ctx.review_search.set_results(results);
        self.page(ctx)
    }

    /// Pick one of the search results
    pub fn select(
        &self,
        ctx: &mut SessionContext,
        index: usize,
    ) -> Result<RateTrackPage, AppError> {
        ctx.review_search.select(index)?;
        Ok(self.page(ctx))
    }

    /// Drop pending search results
    pub fn reset(&self, ctx: &mut SessionContext) -> RateTrackPage {
        ctx.review_search.clear();
        self.page(ctx)
    }

    /// Publish a review of the selected track
    ///
    /// # Errors
    /// `Validation` if no track is selected or the rating is out of range;
    /// no review is written in that case.
    pub async fn publish(
        &self,
        ctx: &mut SessionContext,
        rating: Option<f64>,
        body: &str,
    ) -> Result<Review, AppError> {
        let author = ctx.user()?.to_string();
        let track = ctx.review_search.selection().cloned().ok_or_else(|| {
            AppError::Validation("search for a track and select it before publishing".to_string())
        })?;
        let rating = validate_rating(rating.unwrap_or(DEFAULT_RATING))?;

        let review = Review {
            id: EntityId::new().0,
            username: author,
            date: today(),
            artist: track.artist,
            track: track.title,
            image: track.cover,
            rating,
            review: body.to_string(),
            likes: 0,
            liked_by: Vec::new(),
        };

        let row = review.clone();
        let total = self
            .store
            .update(move |reviews: &mut Vec<Review>| {
                reviews.push(row);
                Ok(reviews.len())
            })
            .await?;

        ctx.review_search.clear();
        REVIEWS_TOTAL.set(total as i64);
        tracing::info!(
            username = %review.username,
            artist = %review.artist,
            track = %review.track,
            rating = review.rating,
            "Review published"
        );
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_accepts_half_steps() {
        for rating in [0.0, 0.5, 2.5, 4.0, 5.0] {
            assert_eq!(validate_rating(rating).unwrap(), rating);
        }
    }

    #[test]
    fn rating_rejects_out_of_range_and_odd_steps() {
        for rating in [-0.5, 5.5, 3.3, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_rating(rating),
                Err(AppError::Validation(_))
            ));
        }
    }
}
