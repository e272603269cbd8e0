//! Music metadata lookup
//!
//! Thin client for a Deezer-compatible search API. Both lookups swallow
//! every transport and parse failure: track search degrades to an empty
//! list and artist search to the submitted name with a placeholder image.

mod deezer;

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::MusicConfig;
use crate::error::AppError;
use crate::metrics::{LOOKUP_REQUEST_DURATION_SECONDS, LOOKUP_REQUESTS_TOTAL};

/// A track search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
    /// Album cover URL
    pub cover: Option<String>,
}

impl Track {
    /// Label used in selection lists, "Artist - Title"
    pub fn label(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

/// Best artist match for a free-text name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistMatch {
    pub name: String,
    pub image: String,
}

/// Music search client
pub struct MusicLookup {
    http_client: reqwest::Client,
    base_url: String,
    search_limit: usize,
    placeholder_image_url: String,
}

impl MusicLookup {
    /// Build a client from configuration
    pub fn new(config: &MusicConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder().user_agent("Beethoven/0.1.0");
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_limit: config.search_limit,
            placeholder_image_url: config.placeholder_image_url.clone(),
        })
    }

    /// Free-text track search, at most `search_limit` results
    ///
    /// Empty queries return nothing without touching the network.
    pub async fn search_tracks(&self, query: &str) -> Vec<Track> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let started = Instant::now();
        let result = deezer::search_tracks(&self.http_client, &self.base_url, query).await;
        observe("tracks", started, result.is_ok());

        match result {
            Ok(tracks) => tracks.into_iter().take(self.search_limit).collect(),
            Err(error) => {
                tracing::warn!(%error, query = %query, "Track search failed");
                Vec::new()
            }
        }
    }

    /// Best match for an artist name
    ///
    /// Falls back to `(name, placeholder)` on failure or no match.
    pub async fn search_artist(&self, name: &str) -> ArtistMatch {
        let started = Instant::now();
        let result = deezer::search_artist(&self.http_client, &self.base_url, name).await;
        observe("artist", started, result.is_ok());

        match result {
            Ok(Some(found)) => ArtistMatch {
                name: found.name,
                image: found
                    .picture_medium
                    .unwrap_or_else(|| self.placeholder_image_url.clone()),
            },
            Ok(None) => {
                tracing::debug!(name = %name, "No artist match");
                self.placeholder(name)
            }
            Err(error) => {
                tracing::warn!(%error, name = %name, "Artist search failed");
                self.placeholder(name)
            }
        }
    }

    fn placeholder(&self, name: &str) -> ArtistMatch {
        ArtistMatch {
            name: name.to_string(),
            image: self.placeholder_image_url.clone(),
        }
    }
}

fn observe(kind: &str, started: Instant, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    LOOKUP_REQUESTS_TOTAL.with_label_values(&[kind, outcome]).inc();
    LOOKUP_REQUEST_DURATION_SECONDS
        .with_label_values(&[kind])
        .observe(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_lookup() -> MusicLookup {
        MusicLookup::new(&MusicConfig {
            // Port 9 (discard) on loopback is not expected to serve HTTP.
            base_url: "http://127.0.0.1:9".to_string(),
            search_limit: 10,
            placeholder_image_url: "https://img.example/placeholder.png".to_string(),
            timeout_seconds: Some(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn empty_query_yields_no_tracks() {
        let lookup = unreachable_lookup();
        assert!(lookup.search_tracks("").await.is_empty());
        assert!(lookup.search_tracks("   ").await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_provider_yields_no_tracks() {
        let lookup = unreachable_lookup();
        assert!(lookup.search_tracks("daft punk").await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_provider_yields_placeholder_artist() {
        let lookup = unreachable_lookup();
        let found = lookup.search_artist("Daft Punk").await;
        assert_eq!(found.name, "Daft Punk");
        assert_eq!(found.image, "https://img.example/placeholder.png");
    }

    #[test]
    fn track_label_joins_artist_and_title() {
        let track = Track {
            artist: "Air".to_string(),
            title: "La femme d'argent".to_string(),
            cover: None,
        };
        assert_eq!(track.label(), "Air - La femme d'argent");
    }
}
