//! Internal domain models for playlist conversion.
//!
//! These types are OUR types - they don't change when provider APIs change.
//! Provider responses get converted into these types via each provider's adapter.

use std::fmt;

use serde::Serialize;

/// A streaming catalog that can act as conversion source or destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    Spotify,
    #[value(name = "youtube")]
    YouTube,
}

impl Catalog {
    /// Human-readable provider name
    pub fn display_name(self) -> &'static str {
        match self {
            Catalog::Spotify => "Spotify",
            Catalog::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// OAuth bearer token for one catalog.
///
/// Debug output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// What kind of entry a source item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A track from a music catalog (structured title + artists)
    Track,
    /// A video from a video catalog (free-form title + channel)
    Video,
}

/// One entry of the source playlist.
///
/// Identity is the position in the fetched list; there is no equality across runs.
#[derive(Debug, Clone)]
pub struct SourceItem {
    /// Track or video title
    pub title: Option<String>,
    /// Artist names (tracks) or owner channel (videos), primary first
    pub artists: Vec<String>,
    pub kind: SourceKind,
    /// Provider identifier of the item (track URI, video ID)
    pub external_id: Option<String>,
    /// Untouched provider payload
    pub payload: serde_json::Value,
}

impl SourceItem {
    /// Create a track item without a provider payload
    pub fn track(title: impl Into<String>, artists: &[&str]) -> Self {
        Self {
            title: Some(title.into()),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            kind: SourceKind::Track,
            external_id: None,
            payload: serde_json::Value::Null,
        }
    }

    /// Create a video item without a provider payload
    pub fn video(title: impl Into<String>, channel: Option<&str>) -> Self {
        Self {
            title: Some(title.into()),
            artists: channel.map(|c| vec![c.to_string()]).unwrap_or_default(),
            kind: SourceKind::Video,
            external_id: None,
            payload: serde_json::Value::Null,
        }
    }

    /// Title, if present and not blank
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// First non-blank artist/owner name
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists
            .iter()
            .map(String::as_str)
            .find(|a| !a.trim().is_empty())
    }
}

/// A search result returned by the destination catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Identifier accepted by `append_item` (video ID, track URI)
    pub id: String,
    pub title: String,
    /// Channel (video catalogs) or primary artist (music catalogs)
    pub channel: String,
    /// Zero-based position in the provider's result order
    pub rank: usize,
}

/// A playlist owned by the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub track_count: Option<u32>,
}

/// Why a source item was not added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No query could be built, or the search returned nothing
    NoResults,
    /// Results came back but none of them was usable
    NoQualifyingCandidate,
    /// Search or append failed for this item
    ProviderError,
    /// The ledger refused the append
    QuotaExhausted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoResults => "no search results",
            SkipReason::NoQualifyingCandidate => "no usable match",
            SkipReason::ProviderError => "provider error",
            SkipReason::QuotaExhausted => "quota budget reached",
        })
    }
}

/// Outcome for a single source item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    Accepted { candidate_id: String },
    Skipped { reason: SkipReason },
}

/// Why iteration ended before the working set was exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The local ledger refused the next costed call
    QuotaBudget,
    /// The destination provider reported quota exhaustion or denied access
    ProviderQuota,
    /// A token expired mid-run; the caller must re-authenticate
    AuthExpired,
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::QuotaBudget => "quota budget reached",
            StopReason::ProviderQuota => "provider refused further requests",
            StopReason::AuthExpired => "access token expired",
            StopReason::Cancelled => "cancelled",
            StopReason::DeadlineExceeded => "deadline exceeded",
        })
    }
}

/// A skipped item, kept for the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Zero-based position in the source playlist
    pub position: usize,
    pub title: Option<String>,
    pub reason: SkipReason,
}

/// Final outcome of one conversion run
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source_catalog: Catalog,
    pub destination_catalog: Catalog,
    /// Items in the source playlist
    pub total_source: usize,
    /// Items that received a match decision
    pub processed: usize,
    pub added: usize,
    pub skipped: usize,
    pub quota_used: u64,
    pub destination_playlist_id: String,
    /// True when the batch limit or an early stop left source items untouched
    pub truncated: bool,
    pub stop_reason: Option<StopReason>,
    pub precise: bool,
    /// How many more search+append pairs the remaining budget affords
    pub estimated_remaining_items: Option<u64>,
    pub skipped_items: Vec<SkippedItem>,
    pub started_at: String,
    pub finished_at: String,
}

/// Errors reported by a provider client.
///
/// Transport details (status codes, bodies) are folded into these kinds at the
/// client boundary; the conversion core only branches on the variant.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Token rejected: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Provider quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Quota exhaustion or access denial: no further call to this provider can succeed
    pub fn is_quota_denial(&self) -> bool {
        matches!(
            self,
            ProviderError::QuotaExceeded(_) | ProviderError::PermissionDenied(_)
        )
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ProviderError::Auth(_))
    }
}

/// Stage of a run, used to label fatal provider failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchSource,
    CreatePlaylist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::FetchSource => f.write_str("fetching source playlist"),
            Stage::CreatePlaylist => f.write_str("creating destination playlist"),
        }
    }
}

/// Failures that prevent a conversion from producing a report
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Missing or invalid input: {0}")]
    Precondition(String),

    #[error("Invalid playlist identifier: {0}")]
    InvalidIdentifier(#[from] crate::convert::identifier::InvalidIdentifier),

    #[error("{catalog} rejected the access token; re-authenticate and try again")]
    Auth { catalog: Catalog },

    #[error("Quota budget too small to start: {0}")]
    QuotaExceeded(#[from] crate::convert::quota::QuotaExceeded),

    #[error("{catalog} failed while {stage}: {source}")]
    Provider {
        catalog: Catalog,
        stage: Stage,
        #[source]
        source: ProviderError,
    },
}
