//! Spotify Web API Data Transfer Objects
//!
//! These types match EXACTLY what the Spotify Web API returns.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::{Deserialize, Serialize};

/// One page of `GET /playlists/{id}/tracks`.
///
/// Items are kept as raw JSON so the untouched payload can travel with each
/// source item.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    /// Absolute URL of the next page
    pub next: Option<String>,
    pub total: Option<u32>,
}

/// Playlist entry wrapper (`track` is null for removed or unavailable tracks)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistTrackItem {
    pub track: Option<Track>,
    #[serde(default)]
    pub is_local: bool,
}

/// Track object (simplified to the fields we use)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    /// `spotify:track:<id>`, used as the candidate ID for playlist appends
    pub uri: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    /// "track" or "episode"
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// `GET /search?type=track`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

/// `GET /me`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Body of `POST /users/{user_id}/playlists`
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub public: bool,
}

/// Simplified playlist object
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: Option<String>,
    pub tracks: Option<TracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksRef {
    pub total: Option<u32>,
}

/// One page of `GET /me/playlists`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistsPage {
    #[serde(default)]
    pub items: Vec<Playlist>,
    pub next: Option<String>,
}

/// Body of `POST /playlists/{id}/tracks`
#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest<'a> {
    pub uris: Vec<&'a str>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub status: Option<u16>,
    pub message: Option<String>,
}
