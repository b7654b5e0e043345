//! Test utilities and fixtures for playlist-porter tests.
//!
//! # Example
//!
//! ```ignore
//! use playlist_porter::test_utils::{request, track_items};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let source = MockCatalog::new(Catalog::Spotify).with_items(track_items(3));
//!     // ... test logic
//! }
//! ```

use crate::convert::{AccessToken, SearchCandidate, SourceItem};

/// Creates `count` track items titled "Song N" by "Artist N".
pub fn track_items(count: usize) -> Vec<SourceItem> {
    (0..count)
        .map(|i| SourceItem::track(format!("Song {}", i), &[format!("Artist {}", i).as_str()]))
        .collect()
}

/// Creates a search candidate.
pub fn candidate(id: &str, title: &str, channel: &str, rank: usize) -> SearchCandidate {
    SearchCandidate {
        id: id.to_string(),
        title: title.to_string(),
        channel: channel.to_string(),
        rank,
    }
}

/// Creates a conversion request with valid tokens and the name "Converted".
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let req = ConversionRequest {
///     playlist_name: "Road Trip".to_string(),
///     ..request("37i9dQZF1")
/// };
/// ```
pub fn request(source_playlist: &str) -> crate::convert::ConversionRequest {
    crate::convert::ConversionRequest {
        source_token: AccessToken::new("source-token"),
        destination_token: AccessToken::new("destination-token"),
        source_playlist: source_playlist.to_string(),
        playlist_name: "Converted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_items_defaults() {
        let items = track_items(2);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title(), Some("Song 1"));
        assert_eq!(items[1].primary_artist(), Some("Artist 1"));
    }

    #[test]
    fn test_request_is_valid() {
        let req = request("abc");
        assert!(!req.source_token.is_blank());
        assert!(!req.destination_token.is_blank());
        assert_eq!(req.playlist_name, "Converted");
    }
}
