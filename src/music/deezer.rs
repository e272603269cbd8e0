//! Deezer search API wire format

use serde::Deserialize;

use super::Track;

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    title: String,
    artist: ArtistRef,
    #[serde(default)]
    album: Option<AlbumRef>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    cover_medium: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ArtistItem {
    pub name: String,
    pub picture_medium: Option<String>,
}

impl From<TrackItem> for Track {
    fn from(item: TrackItem) -> Self {
        Track {
            artist: item.artist.name,
            title: item.title,
            cover: item.album.and_then(|album| album.cover_medium),
        }
    }
}

/// GET {base}/search?q=
pub(super) async fn search_tracks(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
) -> Result<Vec<Track>, reqwest::Error> {
    let response: SearchResponse<TrackItem> = client
        .get(format!("{}/search", base_url))
        .query(&[("q", query)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.data.into_iter().map(Track::from).collect())
}

/// GET {base}/search/artist?q=, first hit only
pub(super) async fn search_artist(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<Option<ArtistItem>, reqwest::Error> {
    let response: SearchResponse<ArtistItem> = client
        .get(format!("{}/search/artist", base_url))
        .query(&[("q", name)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.data.into_iter().next())
}
