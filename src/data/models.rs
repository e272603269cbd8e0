//! Data models
//!
//! Rust structs representing dataset rows.
//! Rows that need addressing over HTTP carry a ULID; everything else is
//! keyed by username.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

// =============================================================================
// Datasets
// =============================================================================

/// One of the five flat tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Users,
    Reviews,
    ListenList,
    Follows,
    Favorites,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::Users,
        Dataset::Reviews,
        Dataset::ListenList,
        Dataset::Follows,
        Dataset::Favorites,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Reviews => "reviews",
            Self::ListenList => "listenlist",
            Self::Follows => "follows",
            Self::Favorites => "favorites",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

/// A row type persisted in exactly one dataset
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const DATASET: Dataset;
}

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current calendar day in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// =============================================================================
// User
// =============================================================================

/// A registered user
///
/// Immutable after sign-up. The password is stored as an Argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
}

impl Record for User {
    const DATASET: Dataset = Dataset::Users;
}

// =============================================================================
// Review
// =============================================================================

/// A published track review
///
/// Only `likes` and `liked_by` change after publishing, and always together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub username: String,
    pub date: NaiveDate,
    pub artist: String,
    pub track: String,
    pub image: Option<String>,
    /// 0.0 to 5.0 in steps of 0.5
    pub rating: f64,
    pub review: String,
    pub likes: u32,
    pub liked_by: Vec<String>,
}

impl Record for Review {
    const DATASET: Dataset = Dataset::Reviews;
}

impl Review {
    pub fn is_liked_by(&self, username: &str) -> bool {
        self.liked_by.iter().any(|liker| liker == username)
    }

    /// Flip `username`'s like, keeping `likes == liked_by.len()`.
    ///
    /// Returns true if the review is liked afterwards.
    pub fn toggle_like(&mut self, username: &str) -> bool {
        let liked = if self.is_liked_by(username) {
            self.liked_by.retain(|liker| liker != username);
            false
        } else {
            self.liked_by.push(username.to_string());
            true
        };
        self.likes = self.liked_by.len() as u32;
        liked
    }
}

// =============================================================================
// Listen list
// =============================================================================

/// A track queued to listen to later
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenEntry {
    pub id: String,
    pub username: String,
    pub artist: String,
    pub track: String,
    pub image: Option<String>,
    pub added_date: NaiveDate,
}

impl Record for ListenEntry {
    const DATASET: Dataset = Dataset::ListenList;
}

// =============================================================================
// Follow relationships
// =============================================================================

/// Directed edge: `follower` sees `following` in the following feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower: String,
    pub following: String,
}

impl Record for FollowEdge {
    const DATASET: Dataset = Dataset::Follows;
}

impl FollowEdge {
    pub fn matches(&self, follower: &str, following: &str) -> bool {
        self.follower == follower && self.following == following
    }
}

// =============================================================================
// Favorite artists
// =============================================================================

/// One resolved favorite artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteArtist {
    pub name: String,
    pub image: Option<String>,
}

/// A user's top 3 artists; at most one row per username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteTriple {
    pub username: String,
    pub artists: [Option<FavoriteArtist>; 3],
}

impl Record for FavoriteTriple {
    const DATASET: Dataset = Dataset::Favorites;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review() -> Review {
        Review {
            id: EntityId::new().0,
            username: "ada".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            artist: "A".to_string(),
            track: "T".to_string(),
            image: None,
            rating: 4.0,
            review: "great".to_string(),
            likes: 0,
            liked_by: vec![],
        }
    }

    #[test]
    fn toggle_like_keeps_count_in_sync() {
        let mut review = review();

        assert!(review.toggle_like("bob"));
        assert!(review.toggle_like("cy"));
        assert_eq!(review.likes, 2);
        assert_eq!(review.liked_by, vec!["bob", "cy"]);

        assert!(!review.toggle_like("bob"));
        assert_eq!(review.likes, 1);
        assert_eq!(review.liked_by, vec!["cy"]);
    }

    #[test]
    fn liked_by_serializes_as_json_array() {
        let mut review = review();
        review.toggle_like("bob");

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["liked_by"], serde_json::json!(["bob"]));
        assert_eq!(json["date"], "2024-05-01");
        assert!(json["image"].is_null());
    }

    #[test]
    fn favorite_slots_round_trip_empty_entries() {
        let triple = FavoriteTriple {
            username: "ada".to_string(),
            artists: [
                Some(FavoriteArtist {
                    name: "Daft Punk".to_string(),
                    image: Some("https://img.example/dp.jpg".to_string()),
                }),
                None,
                Some(FavoriteArtist {
                    name: "Air".to_string(),
                    image: None,
                }),
            ],
        };

        let text = serde_json::to_string(&triple).unwrap();
        let decoded: FavoriteTriple = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, triple);
    }
}
