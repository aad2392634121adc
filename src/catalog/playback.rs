//! Player route resolution.

use crate::feed::{Match, MatchId};

/// Why a player route cannot start playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Missing match ID or CDN information in the URL.")]
    MissingParams,
    #[error("Match not found.")]
    NotFound,
    #[error("This stream is currently unavailable.")]
    Unavailable,
}

/// A resolved player route.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback<'a> {
    pub game: &'a Match,
    pub cdn: String,
    pub stream_url: String,
}

/// Find a match by its textual id.
pub fn find_match<'a>(matches: &'a [Match], id: &str) -> Option<&'a Match> {
    let id = MatchId::from(id);
    matches.iter().find(|m| m.match_id == id)
}

/// The playable URL for one stream key of a match.
pub fn resolve_stream(m: &Match, cdn: &str) -> Result<String, PlaybackError> {
    m.stream(cdn)
        .and_then(|s| s.playable_url().map(str::to_string))
        .ok_or(PlaybackError::Unavailable)
}

/// Resolve the player route parameters against the match list.
pub fn resolve_playback<'a>(
    matches: &'a [Match],
    id: Option<&str>,
    cdn: Option<&str>,
) -> Result<Playback<'a>, PlaybackError> {
    let (id, cdn) = require_params(id, cdn)?;
    let game = find_match(matches, id).ok_or(PlaybackError::NotFound)?;
    let stream_url = resolve_stream(game, cdn)?;

    Ok(Playback {
        game,
        cdn: cdn.to_string(),
        stream_url,
    })
}

/// Both player parameters, present and non-empty.
pub fn require_params<'a>(
    id: Option<&'a str>,
    cdn: Option<&'a str>,
) -> Result<(&'a str, &'a str), PlaybackError> {
    match (non_empty(id), non_empty(cdn)) {
        (Some(id), Some(cdn)) => Ok((id, cdn)),
        _ => Err(PlaybackError::MissingParams),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matches() -> Vec<Match> {
        serde_json::from_value(json!([
            {
                "match_id": 1,
                "title": "One",
                "adfree_stream": "https://cdn/one.m3u8",
                "dai_stream": "Unavailable",
                "STREAMING_CDN": { "edge_cdn": "https://edge/one.mp4" }
            },
            { "match_id": 2, "title": "Two" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_resolves_stream() {
        let matches = matches();
        let playback = resolve_playback(&matches, Some("1"), Some("edge_cdn")).unwrap();
        assert_eq!(playback.game.title, "One");
        assert_eq!(playback.stream_url, "https://edge/one.mp4");
        assert_eq!(playback.cdn, "edge_cdn");
    }

    #[test]
    fn test_missing_params() {
        let matches = matches();
        assert_eq!(
            resolve_playback(&matches, None, Some("edge_cdn")).unwrap_err(),
            PlaybackError::MissingParams
        );
        assert_eq!(
            resolve_playback(&matches, Some("1"), Some("")).unwrap_err(),
            PlaybackError::MissingParams
        );
    }

    #[test]
    fn test_unknown_match() {
        let matches = matches();
        assert_eq!(
            resolve_playback(&matches, Some("99"), Some("adfree_stream")).unwrap_err(),
            PlaybackError::NotFound
        );
    }

    #[test]
    fn test_unavailable_streams() {
        let matches = matches();
        for cdn in ["dai_stream", "nope", "adfree_stream"] {
            let id = if cdn == "adfree_stream" { "2" } else { "1" };
            assert_eq!(
                resolve_playback(&matches, Some(id), Some(cdn)).unwrap_err(),
                PlaybackError::Unavailable,
                "cdn {cdn}"
            );
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PlaybackError::NotFound.to_string(), "Match not found.");
        assert_eq!(
            PlaybackError::Unavailable.to_string(),
            "This stream is currently unavailable."
        );
    }
}
