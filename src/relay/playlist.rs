//! HLS playlist rewriting.
//!
//! Master and media playlists reference variants, segments, keys and init
//! sections by URI, often relative to the playlist. Once the playlist is
//! served from the relay those references would resolve against the relay
//! instead of the origin, so every URI is made absolute and wrapped in a
//! relay URL.
//!
//! The body is parsed with `m3u8_rs` to decide whether it is a playlist at
//! all. The rewrite itself works on the original lines, so tags the parser
//! does not model (`EXT-X-PART`, `EXT-X-PRELOAD-HINT`, vendor tags) come out
//! with their position and attributes intact.

use m3u8_rs::Playlist;
use url::{form_urlencoded, Url};

/// Path of the relay endpoint.
pub const RELAY_PATH: &str = "/api/proxy";

const URI_ATTRIBUTE: &str = "URI=\"";

/// Relay URL for an upstream target.
pub fn relay_url(target: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{RELAY_PATH}?url={encoded}")
}

/// Whether an upstream response should be treated as an HLS playlist.
pub fn is_playlist(content_type: Option<&str>, target: &Url) -> bool {
    let by_type = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("mpegurl"))
        .unwrap_or(false);
    by_type || target.path().to_ascii_lowercase().ends_with(".m3u8")
}

/// Rewrite every URI line and every `URI="..."` attribute to go through the
/// relay. Everything else is copied byte for byte.
///
/// Returns `None` when the body does not parse as a playlist.
pub fn rewrite_playlist(body: &[u8], base: &Url) -> Option<Vec<u8>> {
    match m3u8_rs::parse_playlist_res(body).ok()? {
        Playlist::MasterPlaylist(master) => tracing::trace!(
            variants = master.variants.len(),
            alternatives = master.alternatives.len(),
            "Rewriting master playlist"
        ),
        Playlist::MediaPlaylist(media) => tracing::trace!(
            segments = media.segments.len(),
            "Rewriting media playlist"
        ),
    }
    let text = std::str::from_utf8(body).ok()?;

    let mut out = String::with_capacity(body.len() * 2);
    for raw in text.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\r', '\n']);
        let ending = &raw[line.len()..];

        if line.starts_with("#EXT") {
            out.push_str(&rewrite_attributes(line, base));
        } else if line.starts_with('#') || line.trim().is_empty() {
            out.push_str(line);
        } else {
            out.push_str(&wrap_uri(line, base).unwrap_or_else(|| line.to_string()));
        }
        out.push_str(ending);
    }

    Some(out.into_bytes())
}

/// Rewrite the `URI="..."` attributes of one tag line.
fn rewrite_attributes(line: &str, base: &Url) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(pos) = rest.find(URI_ATTRIBUTE) {
        let value_start = pos + URI_ATTRIBUTE.len();
        let Some(len) = rest[value_start..].find('"') else {
            break;
        };
        // `URI` must be a whole attribute name, not the tail of `X-ASSET-URI`.
        let previous = rest[..pos].chars().last().or_else(|| out.chars().last());
        let whole_name = matches!(previous, Some(':') | Some(','));

        let value = &rest[value_start..value_start + len];
        out.push_str(&rest[..value_start]);
        match wrap_uri(value, base).filter(|_| whole_name) {
            Some(wrapped) => out.push_str(&wrapped),
            None => out.push_str(value),
        }
        rest = &rest[value_start + len..];
    }

    out.push_str(rest);
    out
}

/// Resolve against the playlist and wrap. Non-http(s) URIs (data:, skd:) are left alone.
fn wrap_uri(uri: &str, base: &Url) -> Option<String> {
    let absolute = base.join(uri.trim()).ok()?;
    matches!(absolute.scheme(), "http" | "https").then(|| relay_url(absolute.as_str()))
}
