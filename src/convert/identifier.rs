//! Playlist identifier extraction.
//!
//! Users paste either a bare playlist ID or a share URL. Both forms are
//! reduced to the bare ID the provider APIs expect.

use std::sync::LazyLock;

use regex::Regex;

use super::domain::Catalog;

/// `open.spotify.com/playlist/<id>` and `spotify:playlist:<id>`
static SPOTIFY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"playlist[/:]([A-Za-z0-9]+)").expect("valid spotify url pattern")
});

static SPOTIFY_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid spotify id pattern"));

/// `youtube.com/playlist?list=<id>` and `watch?v=...&list=<id>`
static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").expect("valid youtube url pattern")
});

static YOUTUBE_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid youtube id pattern"));

/// Input matched neither the URL nor the bare-ID form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a {catalog} playlist ID or URL: {input:?}")]
pub struct InvalidIdentifier {
    pub catalog: Catalog,
    pub input: String,
}

impl Catalog {
    /// Extract the bare playlist ID from an ID or URL
    pub fn extract_playlist_id(self, input: &str) -> Result<String, InvalidIdentifier> {
        let input = input.trim();
        let (url, bare) = match self {
            Catalog::Spotify => (&*SPOTIFY_URL, &*SPOTIFY_BARE),
            Catalog::YouTube => (&*YOUTUBE_URL, &*YOUTUBE_BARE),
        };

        if let Some(id) = url.captures(input).and_then(|c| c.get(1)) {
            return Ok(id.as_str().to_string());
        }
        if bare.is_match(input) {
            return Ok(input.to_string());
        }

        Err(InvalidIdentifier {
            catalog: self,
            input: input.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_bare_and_url_agree() {
        let bare = Catalog::Spotify.extract_playlist_id("37i9dQZF1").unwrap();
        let url = Catalog::Spotify
            .extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1?si=abc123")
            .unwrap();
        assert_eq!(bare, "37i9dQZF1");
        assert_eq!(url, bare);
    }

    #[test]
    fn test_spotify_uri() {
        let id = Catalog::Spotify
            .extract_playlist_id("spotify:playlist:37i9dQZF1")
            .unwrap();
        assert_eq!(id, "37i9dQZF1");
    }

    #[test]
    fn test_spotify_rejects_separators() {
        assert!(Catalog::Spotify.extract_playlist_id("abc-def").is_err());
        assert!(Catalog::Spotify.extract_playlist_id("").is_err());
    }

    #[test]
    fn test_youtube_bare_and_url_agree() {
        let bare = Catalog::YouTube
            .extract_playlist_id("PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG")
            .unwrap();
        let url = Catalog::YouTube
            .extract_playlist_id(
                "https://www.youtube.com/playlist?list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG",
            )
            .unwrap();
        let watch = Catalog::YouTube
            .extract_playlist_id(
                "https://www.youtube.com/watch?v=abc&list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG&index=2",
            )
            .unwrap();
        assert_eq!(url, bare);
        assert_eq!(watch, bare);
    }

    #[test]
    fn test_youtube_accepts_separator_characters() {
        let id = Catalog::YouTube.extract_playlist_id("  RD_abc-123  ").unwrap();
        assert_eq!(id, "RD_abc-123");
    }

    #[test]
    fn test_invalid_identifier_carries_input() {
        let err = Catalog::YouTube
            .extract_playlist_id("https://example.com/nothing here")
            .unwrap_err();
        assert_eq!(err.catalog, Catalog::YouTube);
        assert!(err.to_string().contains("nothing here"));
    }
}
