//! Spotify HTTP client
//!
//! Handles communication with the Spotify Web API.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! Spotify has no unit quota, but it rate limits bursts with 429 responses;
//! requests are spaced by the shared [`RateLimiter`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::convert::domain::{
    AccessToken, Catalog, PlaylistSummary, ProviderError, SearchCandidate, SourceItem,
};
use crate::convert::traits::ProviderClient;
use crate::providers::rate_limit::RateLimiter;
use crate::providers::build_http_client;

pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

/// Page size for playlist track listing (API maximum)
const TRACKS_PAGE_SIZE: u32 = 100;

/// Page size for the user's playlists (API maximum)
const PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl SpotifyClient {
    /// Create a client for the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a different API root (proxies, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: build_http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::unlimited()),
        }
    }

    /// Share a rate limiter with other clients or runs
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<T, ProviderError> {
        self.rate_limiter.wait().await;
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        parse_json(check_status(response).await?).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        token: &AccessToken,
    ) -> Result<T, ProviderError> {
        self.rate_limiter.wait().await;
        tracing::debug!("POST {}", url);

        let response = self
            .http_client
            .post(url)
            .bearer_auth(token.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        parse_json(check_status(response).await?).await
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold non-2xx responses into provider error kinds
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<dto::ErrorResponse>()
        .await
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED => ProviderError::Auth(message),
        reqwest::StatusCode::FORBIDDEN => ProviderError::PermissionDenied(message),
        reqwest::StatusCode::NOT_FOUND => ProviderError::NotFound(message),
        reqwest::StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

#[async_trait]
impl ProviderClient for SpotifyClient {
    fn catalog(&self) -> Catalog {
        Catalog::Spotify
    }

    async fn fetch_playlist_items(
        &self,
        playlist_id: &str,
        token: &AccessToken,
    ) -> Result<Vec<SourceItem>, ProviderError> {
        let mut items = Vec::new();
        let mut next = Some(format!(
            "{}/playlists/{}/tracks?limit={}",
            self.base_url,
            urlencoding::encode(playlist_id),
            TRACKS_PAGE_SIZE
        ));

        while let Some(url) = next {
            let page: dto::PlaylistTracksPage = self.get_json(&url, token).await?;
            items.extend(page.items.into_iter().map(adapter::to_source_item));
            next = page.next;
        }

        tracing::debug!("Fetched {} Spotify tracks from {}", items.len(), playlist_id);
        Ok(items)
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        token: &AccessToken,
    ) -> Result<String, ProviderError> {
        let user_id = self.resolve_user_id(token).await?;
        let url = format!(
            "{}/users/{}/playlists",
            self.base_url,
            urlencoding::encode(&user_id)
        );
        let body = dto::CreatePlaylistRequest {
            name,
            description,
            public: false,
        };

        let playlist: dto::Playlist = self.post_json(&url, &body, token).await?;
        Ok(playlist.id)
    }

    async fn search_catalog(
        &self,
        query: &str,
        token: &AccessToken,
        max_results: u32,
    ) -> Result<Vec<SearchCandidate>, ProviderError> {
        let url = format!(
            "{}/search?q={}&type=track&limit={}",
            self.base_url,
            urlencoding::encode(query),
            max_results.max(1)
        );
        let response: dto::SearchResponse = self.get_json(&url, token).await?;
        Ok(adapter::to_candidates(response))
    }

    async fn append_item(
        &self,
        playlist_id: &str,
        candidate_id: &str,
        token: &AccessToken,
    ) -> Result<(), ProviderError> {
        let url = format!(
            "{}/playlists/{}/tracks",
            self.base_url,
            urlencoding::encode(playlist_id)
        );
        let body = dto::AddTracksRequest {
            uris: vec![candidate_id],
        };

        let _: serde_json::Value = self.post_json(&url, &body, token).await?;
        Ok(())
    }

    async fn resolve_user_id(&self, token: &AccessToken) -> Result<String, ProviderError> {
        let user: dto::CurrentUser = self
            .get_json(&format!("{}/me", self.base_url), token)
            .await?;
        Ok(user.id)
    }

    async fn list_playlists(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<PlaylistSummary>, ProviderError> {
        let mut playlists = Vec::new();
        let mut next = Some(format!(
            "{}/me/playlists?limit={}",
            self.base_url, PLAYLISTS_PAGE_SIZE
        ));

        while let Some(url) = next {
            let page: dto::PlaylistsPage = self.get_json(&url, token).await?;
            playlists.extend(page.items.into_iter().map(adapter::to_playlist_summary));
            next = page.next;
        }

        Ok(playlists)
    }
}
