//! Player links for the playable streams of a match.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::feed::Match;

/// Label used when nothing is left of a key after trimming.
pub const FALLBACK_LABEL: &str = "STREAM";

/// A link from a listing card to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLink {
    /// Stream key passed as `cdn` to the player.
    pub key: String,
    /// Button text derived from the key.
    pub label: String,
    /// Player route, e.g. `/player?id=42&cdn=adfree_stream`.
    pub href: String,
}

/// One link per playable stream, in stream-set order.
pub fn stream_links(m: &Match) -> Vec<StreamLink> {
    let id = m.match_id.as_str();
    m.streams()
        .into_iter()
        .filter(|s| s.playable_url().is_some())
        .map(|s| StreamLink {
            label: stream_label(&s.key),
            href: player_href(id, &s.key),
            key: s.key,
        })
        .collect()
}

/// Player route for a match id and stream key.
pub fn player_href(id: &str, cdn: &str) -> String {
    format!("/player?id={}&cdn={}", encode(id), encode(cdn))
}

/// Derive a button label from a stream key.
///
/// Underscores become spaces, the first occurrence of `cdn` or `stream`
/// (any case) is dropped, and the rest is trimmed and upper-cased.
pub fn stream_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let stripped = strip_first_marker(&spaced);
    let label = stripped.trim().to_uppercase();
    if label.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        label
    }
}

/// Remove the leftmost case-insensitive `cdn` or `stream`.
fn strip_first_marker(s: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `s`.
    let lower = s.to_ascii_lowercase();
    let hit = ["cdn", "stream"]
        .iter()
        .filter_map(|marker| lower.find(marker).map(|pos| (pos, marker.len())))
        .min_by_key(|(pos, _)| *pos);

    match hit {
        Some((pos, len)) => format!("{}{}", &s[..pos], &s[pos + len..]),
        None => s.to_string(),
    }
}

fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
