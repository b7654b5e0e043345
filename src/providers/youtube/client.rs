//! YouTube Data API v3 HTTP client
//!
//! Handles communication with the YouTube Data API.
//! See: https://developers.google.com/youtube/v3/docs
//!
//! IMPORTANT: every call is charged against the project's daily unit quota
//! (search = 100, playlist insert = 50, list = 1). The conversion pipeline
//! tracks those units; this client only reports what the API says.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::convert::domain::{
    AccessToken, Catalog, PlaylistSummary, ProviderError, SearchCandidate, SourceItem,
};
use crate::convert::traits::ProviderClient;
use crate::providers::build_http_client;
use crate::providers::rate_limit::RateLimiter;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Page size for playlist listings (API maximum)
const PAGE_SIZE: u32 = 50;

/// YouTube "Music" video category
const MUSIC_CATEGORY_ID: &str = "10";

/// Result of a quota probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuotaStatus {
    /// The token works and the project still has quota
    Available,
    /// The daily unit allowance is exhausted
    Exceeded { message: String },
    /// The token lacks the required scope or the API is disabled
    AccessDenied { message: String },
}

/// YouTube Data API client
pub struct YouTubeClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl YouTubeClient {
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

    /// Check whether the project has quota left, using a 1-unit call.
    ///
    /// Auth and network failures are returned as errors; quota exhaustion
    /// and access denial are reported as a status.
    pub async fn probe_quota(&self, token: &AccessToken) -> Result<QuotaStatus, ProviderError> {
        let url = format!("{}/channels?part=snippet&mine=true&maxResults=1", self.base_url);
        match self.get_json::<dto::ChannelListResponse>(&url, token).await {
            Ok(_) => Ok(QuotaStatus::Available),
            Err(ProviderError::QuotaExceeded(message)) => Ok(QuotaStatus::Exceeded { message }),
            Err(ProviderError::PermissionDenied(message)) => {
                Ok(QuotaStatus::AccessDenied { message })
            }
            Err(e) => Err(e),
        }
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

    async fn post_json<B: Serialize, T: DeserializeOwned>(
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

impl Default for YouTubeClient {
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

    let body = response.json::<dto::ErrorResponse>().await.ok().map(|e| e.error);
    let message = body
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED => ProviderError::Auth(message),
        reqwest::StatusCode::FORBIDDEN => adapter::classify_forbidden(body.as_ref()),
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
impl ProviderClient for YouTubeClient {
    fn catalog(&self) -> Catalog {
        Catalog::YouTube
    }

    async fn fetch_playlist_items(
        &self,
        playlist_id: &str,
        token: &AccessToken,
    ) -> Result<Vec<SourceItem>, ProviderError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/playlistItems?part=snippet&maxResults={}&playlistId={}",
                self.base_url,
                PAGE_SIZE,
                urlencoding::encode(playlist_id)
            );
            if let Some(ref page) = page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(page)));
            }

            let page: dto::PlaylistItemListResponse = self.get_json(&url, token).await?;
            items.extend(page.items.into_iter().map(adapter::to_source_item));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Fetched {} YouTube videos from {}", items.len(), playlist_id);
        Ok(items)
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        token: &AccessToken,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/playlists?part=snippet,status", self.base_url);
        let body = dto::PlaylistInsert {
            snippet: dto::PlaylistInsertSnippet {
                title: name,
                description,
            },
            status: dto::PlaylistStatus {
                privacy_status: "private".to_string(),
            },
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
            "{}/search?part=snippet&type=video&videoCategoryId={}&order=relevance&maxResults={}&q={}",
            self.base_url,
            MUSIC_CATEGORY_ID,
            max_results.max(1),
            urlencoding::encode(query)
        );
        let response: dto::SearchListResponse = self.get_json(&url, token).await?;
        Ok(adapter::to_candidates(response))
    }

    async fn append_item(
        &self,
        playlist_id: &str,
        candidate_id: &str,
        token: &AccessToken,
    ) -> Result<(), ProviderError> {
        let url = format!("{}/playlistItems?part=snippet", self.base_url);
        let body = dto::PlaylistItemInsert {
            snippet: dto::PlaylistItemInsertSnippet {
                playlist_id,
                resource_id: dto::VideoRef {
                    kind: "youtube#video",
                    video_id: candidate_id,
                },
            },
        };

        let _: serde_json::Value = self.post_json(&url, &body, token).await?;
        Ok(())
    }

    async fn resolve_user_id(&self, token: &AccessToken) -> Result<String, ProviderError> {
        let url = format!("{}/channels?part=id&mine=true", self.base_url);
        let response: dto::ChannelListResponse = self.get_json(&url, token).await?;
        response
            .items
            .into_iter()
            .next()
            .map(|c| c.id)
            .ok_or_else(|| ProviderError::NotFound("no channel for this account".to_string()))
    }

    async fn list_playlists(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<PlaylistSummary>, ProviderError> {
        let mut playlists = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/playlists?part=snippet,contentDetails&mine=true&maxResults={}",
                self.base_url, PAGE_SIZE
            );
            if let Some(ref page) = page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(page)));
            }

            let page: dto::PlaylistListResponse = self.get_json(&url, token).await?;
            playlists.extend(page.items.into_iter().map(adapter::to_playlist_summary));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(playlists)
    }
}
