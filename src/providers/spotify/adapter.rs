//! Adapter: Spotify DTOs -> Domain models
//!
//! This is the ONLY place that knows about both Spotify DTOs and our domain types.

use super::dto;
use crate::convert::domain::{PlaylistSummary, SearchCandidate, SourceItem, SourceKind};

/// Convert one raw playlist entry into a source item.
///
/// Entries that don't parse, removed tracks and local files still produce an
/// item (without a title) so positions line up with the playlist.
pub fn to_source_item(raw: serde_json::Value) -> SourceItem {
    let track = serde_json::from_value::<dto::PlaylistTrackItem>(raw.clone())
        .ok()
        .and_then(|item| item.track);

    let (title, artists, external_id) = match track {
        Some(track) => (
            track.name,
            track.artists.into_iter().filter_map(|a| a.name).collect(),
            track.uri,
        ),
        None => (None, Vec::new(), None),
    };

    SourceItem {
        title,
        artists,
        kind: SourceKind::Track,
        external_id,
        payload: raw,
    }
}

/// Convert search results into ranked candidates, dropping tracks without a URI
pub fn to_candidates(response: dto::SearchResponse) -> Vec<SearchCandidate> {
    response
        .tracks
        .map(|page| page.items)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|track| {
            let uri = track.uri?;
            Some((uri, track.name, track.artists))
        })
        .enumerate()
        .map(|(rank, (uri, name, artists))| SearchCandidate {
            id: uri,
            title: name.unwrap_or_default(),
            channel: artists
                .into_iter()
                .find_map(|a| a.name)
                .unwrap_or_default(),
            rank,
        })
        .collect()
}

pub fn to_playlist_summary(playlist: dto::Playlist) -> PlaylistSummary {
    PlaylistSummary {
        name: playlist.name.unwrap_or_else(|| playlist.id.clone()),
        track_count: playlist.tracks.and_then(|t| t.total),
        id: playlist.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(uri: Option<&str>, name: &str, artists: &[&str]) -> dto::Track {
        dto::Track {
            id: None,
            uri: uri.map(String::from),
            name: Some(name.to_string()),
            artists: artists
                .iter()
                .map(|a| dto::ArtistRef {
                    id: None,
                    name: Some(a.to_string()),
                })
                .collect(),
            kind: Some("track".to_string()),
        }
    }

    #[test]
    fn test_convert_track_entry() {
        let raw = json!({
            "track": {
                "uri": "spotify:track:abc",
                "name": "Under Pressure",
                "artists": [{"name": "Queen"}, {"name": "David Bowie"}]
            }
        });

        let item = to_source_item(raw.clone());

        assert_eq!(item.title(), Some("Under Pressure"));
        assert_eq!(item.artists, vec!["Queen", "David Bowie"]);
        assert_eq!(item.kind, SourceKind::Track);
        assert_eq!(item.external_id.as_deref(), Some("spotify:track:abc"));
        assert_eq!(item.payload, raw);
    }

    #[test]
    fn test_removed_track_keeps_position() {
        let item = to_source_item(json!({"track": null}));
        assert_eq!(item.title(), None);
        assert!(item.artists.is_empty());

        let garbage = to_source_item(json!("not an object"));
        assert_eq!(garbage.title(), None);
    }

    #[test]
    fn test_candidates_keep_provider_order() {
        let response = dto::SearchResponse {
            tracks: Some(dto::TrackPage {
                items: vec![
                    track(Some("spotify:track:1"), "First", &["A"]),
                    track(None, "No URI", &["B"]),
                    track(Some("spotify:track:2"), "Second", &[]),
                ],
            }),
        };

        let candidates = to_candidates(response);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "spotify:track:1");
        assert_eq!(candidates[0].channel, "A");
        assert_eq!(candidates[0].rank, 0);
        assert_eq!(candidates[1].rank, 1);
        assert_eq!(candidates[1].channel, "");
    }

    #[test]
    fn test_empty_search() {
        assert!(to_candidates(dto::SearchResponse { tracks: None }).is_empty());
    }

    #[test]
    fn test_playlist_summary() {
        let summary = to_playlist_summary(dto::Playlist {
            id: "p1".to_string(),
            name: Some("Mix".to_string()),
            tracks: Some(dto::TracksRef { total: Some(12) }),
        });
        assert_eq!(summary.name, "Mix");
        assert_eq!(summary.track_count, Some(12));
    }
}
