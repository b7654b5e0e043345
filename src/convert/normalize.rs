//! Query normalization - turns source metadata into a destination search query.
//!
//! Titles from streaming catalogs carry a lot of noise that hurts search
//! recall on another catalog: featured-artist markers, remix/live
//! annotations, bracketed edition notes, and (for videos) "official music
//! video" style suffixes. These are stripped before the query is built.
//!
//! Cleanup is applied until the text stops changing, so cleaning an already
//! cleaned title is a no-op.

use std::sync::LazyLock;

use regex::Regex;

use super::domain::{SourceItem, SourceKind};

/// `(feat. X)`, `[ft. X]`, `(with X)`
static FEATURE_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[(\[]\s*(?:feat\.|feat\b|featuring\b|ft\.|with\b)[^)\]]*[)\]]")
        .expect("valid feature pattern")
});

/// Unbracketed trailing `feat. X`
static FEATURE_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(?:feat\.|featuring\b|ft\.).*$").expect("valid trailing feature pattern")
});

/// `(... Remix ...)`, `(Live at ...)`
static QUALIFIER_PAREN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\([^)]*\b(?:remix|live)\b[^)]*\)").expect("valid qualifier pattern")
});

static SQUARE_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid bracket pattern"));

static ANY_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid paren pattern"));

static EMPTY_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)").expect("valid empty paren pattern"));

static VIDEO_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:official\s+music\s+video|official\s+video|lyric\s+video|lyrics)\b")
        .expect("valid video noise pattern")
});

/// A leading name followed by a secondary-artist separator and the rest
static ARTIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s*(?:&|;|\s/\s|\bfeat\.|\bfeat\b|\bfeaturing\b|\bft\.).*$")
        .expect("valid artist separator pattern")
});

/// Auto-generated YouTube artist channels ("Artist - Topic")
static TOPIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+-\s+topic$").expect("valid topic pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// How the title and artist are composed into query text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStrategy {
    /// `"title" "artist"` - fewer, more exact results
    Precise,
    /// `title artist <qualifier>` - higher recall
    Broad { qualifier: String },
}

impl QueryStrategy {
    pub fn broad(qualifier: impl Into<String>) -> Self {
        QueryStrategy::Broad {
            qualifier: qualifier.into(),
        }
    }
}

/// A search query derived from one source item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    title: String,
    artist: String,
    text: String,
}

impl NormalizedQuery {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// The string sent to the catalog search
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Builds search queries with a fixed strategy
#[derive(Debug, Clone)]
pub struct QueryNormalizer {
    strategy: QueryStrategy,
}

impl QueryNormalizer {
    pub fn new(strategy: QueryStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &QueryStrategy {
        &self.strategy
    }

    /// Build the query for `item`.
    ///
    /// Returns `None` when the item has no title, no artist/owner name, or
    /// nothing is left of either after cleanup.
    pub fn normalize(&self, item: &SourceItem) -> Option<NormalizedQuery> {
        let title = match item.kind {
            SourceKind::Track => clean_title(item.title()?),
            SourceKind::Video => clean_video_title(item.title()?),
        };
        let artist = clean_artist(item.primary_artist()?);

        if title.is_empty() || artist.is_empty() {
            return None;
        }

        let text = match &self.strategy {
            QueryStrategy::Precise => {
                format!("\"{}\" \"{}\"", unquote(&title), unquote(&artist))
            }
            QueryStrategy::Broad { qualifier } => {
                collapse(&format!("{} {} {}", title, artist, qualifier))
            }
        };

        Some(NormalizedQuery {
            title,
            artist,
            text,
        })
    }
}

/// Strip feature, remix/live and bracketed annotations from a track title
pub fn clean_title(raw: &str) -> String {
    to_fixpoint(raw, |s| {
        let s = FEATURE_BRACKET.replace_all(s, " ");
        let s = QUALIFIER_PAREN.replace_all(&s, " ");
        let s = SQUARE_BRACKETS.replace_all(&s, " ");
        let s = FEATURE_TRAILING.replace(&s, "");
        let s = EMPTY_PAREN.replace_all(&s, " ");
        collapse(&s)
    })
}

/// Video titles: track rules plus video noise words and every parenthetical
pub fn clean_video_title(raw: &str) -> String {
    to_fixpoint(raw, |s| {
        let s = VIDEO_NOISE.replace_all(s, " ");
        let s = clean_title(&s);
        let s = ANY_PAREN.replace_all(&s, " ");
        collapse(&s)
    })
}

/// Keep only the first artist of a joined credit
pub fn clean_artist(raw: &str) -> String {
    to_fixpoint(raw, |s| {
        let s = ARTIST_SEPARATOR.replace(s, "$1");
        let s = TOPIC_SUFFIX.replace(&s, "");
        collapse(&s)
    })
}

/// Every pass only removes text, so a changed result is always shorter.
fn to_fixpoint(raw: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = collapse(raw);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

fn unquote(s: &str) -> String {
    collapse(&s.replace('"', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn precise() -> QueryNormalizer {
        QueryNormalizer::new(QueryStrategy::Precise)
    }

    #[test]
    fn test_strips_feature_markers() {
        assert_eq!(clean_title("Stay (feat. Justin Bieber)"), "Stay");
        assert_eq!(clean_title("Stay [ft. Someone]"), "Stay");
        assert_eq!(clean_title("Señorita (with Camila Cabello)"), "Señorita");
        assert_eq!(clean_title("Stay featuring Someone Else"), "Stay");
    }

    #[test]
    fn test_strips_remix_and_live_qualifiers() {
        assert_eq!(clean_title("Levels (Skrillex Remix)"), "Levels");
        assert_eq!(clean_title("Yellow (Live at Glastonbury)"), "Yellow");
        assert_eq!(clean_title("Song [Remastered 2011]"), "Song");
    }

    #[test]
    fn test_keeps_other_parentheticals_on_tracks() {
        assert_eq!(
            clean_title("(I Can't Get No) Satisfaction"),
            "(I Can't Get No) Satisfaction"
        );
    }

    #[test]
    fn test_video_title_noise() {
        assert_eq!(
            clean_video_title("Artist - Song (Official Music Video)"),
            "Artist - Song"
        );
        assert_eq!(clean_video_title("Song [HD] Lyric Video"), "Song");
        assert_eq!(clean_video_title("Song (Lyrics)"), "Song");
    }

    #[test]
    fn test_artist_keeps_first_of_joined_credit() {
        assert_eq!(clean_artist("Simon & Garfunkel"), "Simon");
        assert_eq!(clean_artist("Artist feat. Guest"), "Artist");
        assert_eq!(clean_artist("Daft Punk - Topic"), "Daft Punk");
        assert_eq!(clean_artist("Artist One / Artist Two"), "Artist One");
        assert_eq!(clean_artist("AC/DC"), "AC/DC");
        assert_eq!(clean_artist("  Spaced   Out  "), "Spaced Out");
    }

    #[test]
    fn test_artist_names_with_separator_characters_survive() {
        assert_eq!(clean_artist("Tyler, The Creator"), "Tyler, The Creator");
        assert_eq!(clean_artist("&ME"), "&ME");

        let item = SourceItem::track("The Rapture Pt.III", &["&ME"]);
        let query = precise().normalize(&item).unwrap();
        assert_eq!(query.artist(), "&ME");
    }

    #[test]
    fn test_precise_query_quotes_title_and_artist() {
        let item = SourceItem::track("Get Lucky (feat. Pharrell Williams)", &["Daft Punk"]);
        let query = precise().normalize(&item).unwrap();
        assert_eq!(query.text(), "\"Get Lucky\" \"Daft Punk\"");
        assert_eq!(query.title(), "Get Lucky");
        assert_eq!(query.artist(), "Daft Punk");
    }

    #[test]
    fn test_precise_query_drops_inner_quotes() {
        let item = SourceItem::track("The \"Real\" Song", &["Artist"]);
        let query = precise().normalize(&item).unwrap();
        assert_eq!(query.text(), "\"The Real Song\" \"Artist\"");
    }

    #[test]
    fn test_broad_query_appends_qualifier() {
        let normalizer = QueryNormalizer::new(QueryStrategy::broad("official audio"));
        let item = SourceItem::track("Get Lucky", &["Daft Punk"]);
        let query = normalizer.normalize(&item).unwrap();
        assert_eq!(query.text(), "Get Lucky Daft Punk official audio");
    }

    #[test]
    fn test_broad_query_without_qualifier() {
        let normalizer = QueryNormalizer::new(QueryStrategy::broad(""));
        let item = SourceItem::video("Song (Official Video)", Some("Band"));
        let query = normalizer.normalize(&item).unwrap();
        assert_eq!(query.text(), "Song Band");
    }

    #[test]
    fn test_missing_title_or_artist_yields_no_query() {
        let mut no_title = SourceItem::track("x", &["Artist"]);
        no_title.title = None;
        assert!(precise().normalize(&no_title).is_none());

        let no_artist = SourceItem::track("Song", &[]);
        assert!(precise().normalize(&no_artist).is_none());

        let deleted_video = SourceItem::video("Deleted video", None);
        assert!(precise().normalize(&deleted_video).is_none());
    }

    #[test]
    fn test_title_that_is_only_annotation_yields_no_query() {
        let item = SourceItem::track("[Intro]", &["Artist"]);
        assert!(precise().normalize(&item).is_none());
    }
}
