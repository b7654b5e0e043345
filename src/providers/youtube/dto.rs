//! YouTube Data API v3 Data Transfer Objects
//!
//! These types match EXACTLY what the YouTube Data API returns.
//! DO NOT use these types outside the youtube module - convert to domain types.
//!
//! API Reference: https://developers.google.com/youtube/v3/docs

use serde::{Deserialize, Serialize};

/// One page of `GET /playlistItems?part=snippet`.
///
/// Items are kept as raw JSON so the untouched payload can travel with each
/// source item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    pub next_page_token: Option<String>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_results: Option<u32>,
    pub results_per_page: Option<u32>,
}

/// Playlist item resource
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub id: Option<String>,
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: Option<String>,
    /// Channel that uploaded the video (absent for deleted/private videos)
    pub video_owner_channel_title: Option<String>,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: Option<String>,
    pub video_id: Option<String>,
}

/// `GET /search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub kind: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
}

/// Body of `POST /playlists?part=snippet,status`
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistInsert<'a> {
    pub snippet: PlaylistInsertSnippet<'a>,
    pub status: PlaylistStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistInsertSnippet<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatus {
    /// "private", "unlisted" or "public"
    pub privacy_status: String,
}

/// Body of `POST /playlistItems?part=snippet`
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistItemInsert<'a> {
    pub snippet: PlaylistItemInsertSnippet<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemInsertSnippet<'a> {
    pub playlist_id: &'a str,
    pub resource_id: VideoRef<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef<'a> {
    pub kind: &'a str,
    pub video_id: &'a str,
}

/// Playlist resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub snippet: Option<PlaylistSnippet>,
    pub content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSnippet {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistContentDetails {
    pub item_count: Option<u32>,
}

/// `GET /playlists?mine=true`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistListResponse {
    #[serde(default)]
    pub items: Vec<Playlist>,
    pub next_page_token: Option<String>,
}

/// `GET /channels?mine=true`
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable reason, e.g. "quotaExceeded"
    pub reason: Option<String>,
    pub message: Option<String>,
}
