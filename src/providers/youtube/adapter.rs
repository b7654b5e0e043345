//! Adapter: YouTube DTOs -> Domain models
//!
//! This is the ONLY place that knows about both YouTube DTOs and our domain types.

use super::dto;
use crate::convert::domain::{PlaylistSummary, ProviderError, SearchCandidate, SourceItem, SourceKind};

/// Error reasons that mean the daily unit allowance is gone
const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded"];

/// Error reasons for short-term request bursts
const RATE_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

/// Convert one raw playlist entry into a source item.
///
/// Deleted and private videos keep their position but have no owner channel,
/// so they produce no query later.
pub fn to_source_item(raw: serde_json::Value) -> SourceItem {
    let snippet = serde_json::from_value::<dto::PlaylistItem>(raw.clone())
        .ok()
        .and_then(|item| item.snippet);

    let (title, artists, external_id) = match snippet {
        Some(snippet) => (
            snippet.title,
            snippet.video_owner_channel_title.into_iter().collect(),
            snippet.resource_id.and_then(|r| r.video_id),
        ),
        None => (None, Vec::new(), None),
    };

    SourceItem {
        title,
        artists,
        kind: SourceKind::Video,
        external_id,
        payload: raw,
    }
}

/// Convert search results into ranked candidates, dropping non-video results
pub fn to_candidates(response: dto::SearchListResponse) -> Vec<SearchCandidate> {
    response
        .items
        .into_iter()
        .filter_map(|result| {
            let video_id = result.id.video_id?;
            Some((video_id, result.snippet))
        })
        .enumerate()
        .map(|(rank, (video_id, snippet))| {
            let (title, channel) = snippet
                .map(|s| (s.title.unwrap_or_default(), s.channel_title.unwrap_or_default()))
                .unwrap_or_default();
            SearchCandidate {
                id: video_id,
                title,
                channel,
                rank,
            }
        })
        .collect()
}

pub fn to_playlist_summary(playlist: dto::Playlist) -> PlaylistSummary {
    PlaylistSummary {
        name: playlist
            .snippet
            .and_then(|s| s.title)
            .unwrap_or_else(|| playlist.id.clone()),
        track_count: playlist.content_details.and_then(|c| c.item_count),
        id: playlist.id,
    }
}

/// Classify a 403 response body.
///
/// YouTube uses 403 both for an exhausted daily quota and for missing
/// permissions; only the reason (or message) tells them apart.
pub fn classify_forbidden(body: Option<&dto::ErrorBody>) -> ProviderError {
    let Some(body) = body else {
        return ProviderError::PermissionDenied("Forbidden".to_string());
    };

    let message = body
        .message
        .clone()
        .unwrap_or_else(|| "Forbidden".to_string());
    let has_reason = |reasons: &[&str]| {
        body.errors
            .iter()
            .filter_map(|e| e.reason.as_deref())
            .any(|r| reasons.contains(&r))
    };

    if has_reason(QUOTA_REASONS) || message.to_lowercase().contains("quota") {
        ProviderError::QuotaExceeded(message)
    } else if has_reason(RATE_REASONS) {
        ProviderError::RateLimited
    } else {
        ProviderError::PermissionDenied(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_body(message: &str, reason: Option<&str>) -> dto::ErrorBody {
        dto::ErrorBody {
            code: Some(403),
            message: Some(message.to_string()),
            errors: vec![dto::ErrorDetail {
                reason: reason.map(String::from),
                message: None,
            }],
        }
    }

    #[test]
    fn test_convert_video_entry() {
        let raw = json!({
            "snippet": {
                "title": "Get Lucky (Official Audio)",
                "videoOwnerChannelTitle": "Daft Punk - Topic",
                "resourceId": {"kind": "youtube#video", "videoId": "5NV6Rdv1a3I"}
            }
        });

        let item = to_source_item(raw.clone());

        assert_eq!(item.kind, SourceKind::Video);
        assert_eq!(item.title(), Some("Get Lucky (Official Audio)"));
        assert_eq!(item.primary_artist(), Some("Daft Punk - Topic"));
        assert_eq!(item.external_id.as_deref(), Some("5NV6Rdv1a3I"));
        assert_eq!(item.payload, raw);
    }

    #[test]
    fn test_deleted_video_has_no_owner() {
        let item = to_source_item(json!({
            "snippet": {"title": "Deleted video", "resourceId": {"videoId": "x"}}
        }));
        assert_eq!(item.title(), Some("Deleted video"));
        assert!(item.primary_artist().is_none());
    }

    #[test]
    fn test_candidates_skip_channels_and_playlists() {
        let response = dto::SearchListResponse {
            items: vec![
                dto::SearchResult {
                    id: dto::SearchResultId {
                        kind: Some("youtube#channel".to_string()),
                        video_id: None,
                    },
                    snippet: None,
                },
                dto::SearchResult {
                    id: dto::SearchResultId {
                        kind: Some("youtube#video".to_string()),
                        video_id: Some("v1".to_string()),
                    },
                    snippet: Some(dto::SearchSnippet {
                        title: Some("Song".to_string()),
                        channel_title: Some("Band".to_string()),
                    }),
                },
            ],
        };

        let candidates = to_candidates(response);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "v1");
        assert_eq!(candidates[0].channel, "Band");
        assert_eq!(candidates[0].rank, 0);
    }

    #[test]
    fn test_classify_forbidden() {
        let quota = classify_forbidden(Some(&error_body("Daily Limit Exceeded", Some("dailyLimitExceeded"))));
        assert!(matches!(quota, ProviderError::QuotaExceeded(_)));

        let by_message = classify_forbidden(Some(&error_body("You have exceeded your quota", None)));
        assert!(matches!(by_message, ProviderError::QuotaExceeded(_)));

        let rate = classify_forbidden(Some(&error_body("Slow down", Some("rateLimitExceeded"))));
        assert!(matches!(rate, ProviderError::RateLimited));

        let denied = classify_forbidden(Some(&error_body("Insufficient permissions", Some("insufficientPermissions"))));
        assert!(matches!(denied, ProviderError::PermissionDenied(_)));

        assert!(matches!(classify_forbidden(None), ProviderError::PermissionDenied(_)));
    }

    #[test]
    fn test_playlist_summary_falls_back_to_id() {
        let summary = to_playlist_summary(dto::Playlist {
            id: "PL1".to_string(),
            snippet: None,
            content_details: Some(dto::PlaylistContentDetails { item_count: Some(3) }),
        });
        assert_eq!(summary.name, "PL1");
        assert_eq!(summary.track_count, Some(3));
    }
}
