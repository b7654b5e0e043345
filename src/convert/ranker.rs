//! Candidate selection - picks which search result to add for a source item.
//!
//! In precise mode the provider's relevance order is scanned for the first
//! result that looks authoritative: uploaded by the artist or a label, or
//! labelled as an official/audio upload. When nothing looks authoritative the
//! provider's top result is used anyway.

use super::domain::{SearchCandidate, SourceItem};
use super::normalize::clean_artist;

/// Channel name fragments that indicate a label or curated music channel
const LABEL_MARKERS: &[&str] = &["records", "music"];

/// Title fragments that indicate an authoritative upload
const TITLE_MARKERS: &[&str] = &["official", "audio"];

/// Select the candidate to add for `item`.
///
/// Candidates without an identifier are ignored; `None` means no usable
/// candidate was returned.
pub fn select<'a>(
    item: &SourceItem,
    candidates: &'a [SearchCandidate],
    precise: bool,
) -> Option<&'a SearchCandidate> {
    let mut usable = candidates.iter().filter(|c| !c.id.trim().is_empty());
    let first = usable.clone().next()?;

    if !precise {
        return Some(first);
    }

    let artist = item
        .primary_artist()
        .map(|a| clean_artist(a).to_lowercase())
        .filter(|a| !a.is_empty());

    Some(
        usable
            .find(|c| is_preferred(c, artist.as_deref()))
            .unwrap_or(first),
    )
}

fn is_preferred(candidate: &SearchCandidate, artist: Option<&str>) -> bool {
    let channel = candidate.channel.to_lowercase();
    let title = candidate.title.to_lowercase();

    artist.is_some_and(|a| channel.contains(a))
        || LABEL_MARKERS.iter().any(|m| channel.contains(m))
        || TITLE_MARKERS.iter().any(|m| title.contains(m))
}
