//! Profile service
//!
//! Profile statistics, subscriptions and the favorite-artist triple.

use serde::Serialize;
use std::sync::Arc;

use crate::data::{
    FavoriteArtist, FavoriteTriple, FollowEdge, ListenEntry, RecordStore, Review, User,
};
use crate::error::AppError;
use crate::music::MusicLookup;

/// Number of reviews shown on a profile
const RECENT_REVIEWS: usize = 5;

/// Everything a profile page shows
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub username: String,
    /// true when the viewer is looking at their own profile
    pub is_self: bool,
    /// Whether the viewer follows this profile; absent on one's own profile
    pub is_subscribed: Option<bool>,
    pub subscribers: usize,
    pub review_count: usize,
    /// Mean rating rounded to 2 decimals, 0 without reviews
    pub mean_rating: f64,
    pub listen_count: usize,
    pub favorites: Option<[Option<FavoriteArtist>; 3]>,
    /// Newest first
    pub recent_reviews: Vec<Review>,
}

/// Mean of the ratings rounded to 2 decimals; 0 for an empty slice
pub fn mean_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Profile service
pub struct ProfileService {
    store: Arc<RecordStore>,
    music: Arc<MusicLookup>,
}

impl ProfileService {
    /// Create new profile service
    pub fn new(store: Arc<RecordStore>, music: Arc<MusicLookup>) -> Self {
        Self { store, music }
    }

    async fn ensure_user(&self, username: &str) -> Result<(), AppError> {
        let users = self.store.load::<User>().await?;
        if users.iter().any(|user| user.username == username) {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Build the profile of `target` as seen by `viewer`
    pub async fn profile(&self, viewer: &str, target: &str) -> Result<ProfilePage, AppError> {
        self.ensure_user(target).await?;

        let follows = self.store.load::<FollowEdge>().await?;
        let reviews = self.store.load::<Review>().await?;
        let listen = self.store.load::<ListenEntry>().await?;
        let favorites = self.store.load::<FavoriteTriple>().await?;

        let is_self = viewer == target;
        let subscribers = follows.iter().filter(|edge| edge.following == target).count();
        let is_subscribed =
            (!is_self).then(|| follows.iter().any(|edge| edge.matches(viewer, target)));

        let own_reviews: Vec<Review> = reviews
            .into_iter()
            .filter(|review| review.username == target)
            .collect();
        let ratings: Vec<f64> = own_reviews.iter().map(|review| review.rating).collect();
        let recent_reviews = own_reviews
            .iter()
            .rev()
            .take(RECENT_REVIEWS)
            .cloned()
            .collect();

        Ok(ProfilePage {
            username: target.to_string(),
            is_self,
            is_subscribed,
            subscribers,
            review_count: own_reviews.len(),
            mean_rating: mean_rating(&ratings),
            listen_count: listen.iter().filter(|entry| entry.username == target).count(),
            favorites: favorites
                .into_iter()
                .find(|triple| triple.username == target)
                .map(|triple| triple.artists),
            recent_reviews,
        })
    }

    /// Follow `target`
    ///
    /// Returns false if the edge already existed (no second edge is added).
    pub async fn subscribe(&self, follower: &str, target: &str) -> Result<bool, AppError> {
        if follower == target {
            return Err(AppError::Validation("cannot subscribe to yourself".to_string()));
        }
        self.ensure_user(target).await?;

        let inserted = self
            .store
            .update(|edges: &mut Vec<FollowEdge>| {
                if edges.iter().any(|edge| edge.matches(follower, target)) {
                    return Ok(false);
                }
                edges.push(FollowEdge {
                    follower: follower.to_string(),
                    following: target.to_string(),
                });
                Ok(true)
            })
            .await?;

        if inserted {
            tracing::info!(follower = %follower, following = %target, "Subscribed");
        }
        Ok(inserted)
    }

    /// Stop following `target`
    ///
    /// Returns false if there was no edge to remove.
    pub async fn unsubscribe(&self, follower: &str, target: &str) -> Result<bool, AppError> {
        let removed = self
            .store
            .update(|edges: &mut Vec<FollowEdge>| {
                let before = edges.len();
                edges.retain(|edge| !edge.matches(follower, target));
                Ok(edges.len() != before)
            })
            .await?;

        if removed {
            tracing::info!(follower = %follower, following = %target, "Unsubscribed");
        }
        Ok(removed)
    }

    /// Replace `username`'s favorite artists
    ///
    /// Each non-empty name is resolved through the music lookup; empty or
    /// missing names leave their slot empty.
    pub async fn save_favorites(
        &self,
        username: &str,
        names: &[String],
    ) -> Result<FavoriteTriple, AppError> {
        if names.len() > 3 {
            return Err(AppError::Validation(
                "at most three favorite artists".to_string(),
            ));
        }
        if names.iter().all(|name| name.trim().is_empty()) {
            return Err(AppError::Validation(
                "at least one artist name is required".to_string(),
            ));
        }

        let mut artists: [Option<FavoriteArtist>; 3] = Default::default();
        for (slot, name) in artists.iter_mut().zip(names) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let found = self.music.search_artist(name).await;
            *slot = Some(FavoriteArtist {
                name: found.name,
                image: Some(found.image),
            });
        }

        let triple = FavoriteTriple {
            username: username.to_string(),
            artists,
        };

        let row = triple.clone();
        self.store
            .update(move |rows: &mut Vec<FavoriteTriple>| {
                rows.retain(|existing| existing.username != row.username);
                rows.push(row);
                Ok(())
            })
            .await?;

        tracing::info!(username = %username, "Favorite artists updated");
        Ok(triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_rating_of_three_reviews() {
        assert_eq!(mean_rating(&[3.0, 4.0, 5.0]), 4.0);
    }

    #[test]
    fn mean_rating_without_reviews_is_zero() {
        assert_eq!(mean_rating(&[]), 0.0);
    }

    #[test]
    fn mean_rating_rounds_to_two_decimals() {
        assert_eq!(mean_rating(&[1.0, 1.0, 2.5]), 1.5);
        assert_eq!(mean_rating(&[0.5, 1.0, 1.0]), 0.83);
    }
}
