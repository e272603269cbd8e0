//! Feed service
//!
//! Reverse-chronological review feed and like toggling.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::data::{FollowEdge, RecordStore, Review};
use crate::error::AppError;
use crate::navigation::FeedMode;

/// One review in the feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub review: Review,
    /// Whether the viewer has liked this review
    pub liked: bool,
}

/// Feed service
pub struct FeedService {
    store: Arc<RecordStore>,
}

/// Reviews visible to `viewer`, newest first
///
/// The viewer's own reviews are dropped before the following filter.
pub fn build_feed(
    reviews: Vec<Review>,
    follows: &[FollowEdge],
    viewer: &str,
    mode: FeedMode,
) -> Vec<FeedEntry> {
    let followed: HashSet<&str> = follows
        .iter()
        .filter(|edge| edge.follower == viewer)
        .map(|edge| edge.following.as_str())
        .collect();

    reviews
        .into_iter()
        .filter(|review| review.username != viewer)
        .filter(|review| match mode {
            FeedMode::Everyone => true,
            FeedMode::Following => followed.contains(review.username.as_str()),
        })
        .rev()
        .map(|review| FeedEntry {
            liked: review.is_liked_by(viewer),
            review,
        })
        .collect()
}

impl FeedService {
    /// Create new feed service
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Get the feed for `viewer`
    pub async fn feed(&self, viewer: &str, mode: FeedMode) -> Result<Vec<FeedEntry>, AppError> {
        let reviews = self.store.load::<Review>().await?;
        let follows = self.store.load::<FollowEdge>().await?;
        Ok(build_feed(reviews, &follows, viewer, mode))
    }

    /// Like or unlike a review
    ///
    /// Returns the updated review.
    pub async fn toggle_like(&self, viewer: &str, review_id: &str) -> Result<Review, AppError> {
        let review = self
            .store
            .update(|reviews: &mut Vec<Review>| {
                let review = reviews
                    .iter_mut()
                    .find(|review| review.id == review_id)
                    .ok_or(AppError::NotFound)?;
                review.toggle_like(viewer);
                Ok(review.clone())
            })
            .await?;

        tracing::debug!(
            review_id = %review_id,
            viewer = %viewer,
            likes = review.likes,
            "Like toggled"
        );
        Ok(review)
    }
}
