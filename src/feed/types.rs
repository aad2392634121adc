//! Feed document types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Sentinel the feed uses for a stream that exists but cannot be played.
pub const UNAVAILABLE: &str = "Unavailable";

/// Key of the top-level ad-free stream in the merged stream set.
pub const ADFREE_KEY: &str = "adfree_stream";

/// Key of the top-level dynamic-ad-inserted stream in the merged stream set.
pub const DAI_KEY: &str = "dai_stream";

/// Feed identifier of a match.
///
/// The feed sends numbers, but strings are accepted too. Comparison is always
/// on the textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MatchId(String);

impl MatchId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for MatchId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for MatchId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numeric ids go back out as numbers so the document shape is preserved.
        match self.0.parse::<u64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_u64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(Self(n.to_string())),
            Value::String(s) => Ok(Self(s)),
            Value::Null => Ok(Self::default()),
            other => Err(serde::de::Error::custom(format!(
                "match_id must be a number or string, got {other}"
            ))),
        }
    }
}

/// One match as published by the feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub match_id: MatchId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tournament: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub language: String,
    #[serde(default)]
    pub adfree_stream: Option<String>,
    #[serde(default)]
    pub dai_stream: Option<String>,
    /// CDN key → URL, in feed order. Values may be null or non-strings.
    #[serde(rename = "STREAMING_CDN", default, deserialize_with = "null_as_empty_map")]
    pub streaming_cdn: Map<String, Value>,
}

/// A named stream variant of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    /// CDN key, e.g. `adfree_stream` or a key of `STREAMING_CDN`.
    pub key: String,
    /// Raw value from the feed; `None` for null or non-string values.
    pub url: Option<String>,
}

impl StreamVariant {
    /// The URL if it can actually be played.
    pub fn playable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| is_playable(u))
    }
}

/// True when a stream value is a real URL rather than empty or the sentinel.
pub fn is_playable(value: &str) -> bool {
    !value.is_empty() && value != UNAVAILABLE
}

impl Match {
    /// Whether the feed marks this match as live.
    pub fn is_live(&self) -> bool {
        self.status.eq_ignore_ascii_case("LIVE")
    }

    /// The merged stream set: CDN entries in feed order, then the ad-free and
    /// DAI streams. A top-level key that also appears in the CDN map replaces
    /// the value in place.
    pub fn streams(&self) -> Vec<StreamVariant> {
        let mut streams: Vec<StreamVariant> = self
            .streaming_cdn
            .iter()
            .map(|(key, value)| StreamVariant {
                key: key.clone(),
                url: value.as_str().map(str::to_string),
            })
            .collect();

        for (key, url) in [(ADFREE_KEY, &self.adfree_stream), (DAI_KEY, &self.dai_stream)] {
            match streams.iter_mut().find(|s| s.key == key) {
                Some(existing) => existing.url = url.clone(),
                None => streams.push(StreamVariant {
                    key: key.to_string(),
                    url: url.clone(),
                }),
            }
        }

        streams
    }

    /// Look up one stream variant by key.
    pub fn stream(&self, key: &str) -> Option<StreamVariant> {
        self.streams().into_iter().find(|s| s.key == key)
    }
}

/// Top-level feed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedDocument {
    #[serde(default, deserialize_with = "lenient_matches")]
    pub matches: Vec<Match>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_empty_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `matches` field that is not an array counts as no matches. Entries that
/// do not decode are skipped so one bad record cannot hide the rest.
fn lenient_matches<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Match>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Match>(item) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping undecodable match entry");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Match {
        serde_json::from_value(json!({
            "match_id": 101,
            "title": "A vs B",
            "tournament": "Cup",
            "status": "Live",
            "image": "https://img/1.jpg",
            "language": "English",
            "adfree_stream": "https://cdn/adfree.m3u8",
            "dai_stream": "Unavailable",
            "STREAMING_CDN": {
                "fancode_cdn": "https://cdn/fc.m3u8",
                "akamai_cdn": null,
                "cloudfront_cdn": ""
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_match() {
        let m = sample();
        assert_eq!(m.match_id.as_str(), "101");
        assert!(m.is_live());
        assert_eq!(m.streaming_cdn.len(), 3);
    }

    #[test]
    fn test_string_id_and_nulls() {
        let m: Match = serde_json::from_value(json!({
            "match_id": "abc",
            "title": null,
            "STREAMING_CDN": null
        }))
        .unwrap();
        assert_eq!(m.match_id, MatchId::from("abc"));
        assert_eq!(m.title, "");
        assert!(m.streaming_cdn.is_empty());
        assert!(!m.is_live());
    }

    #[test]
    fn test_stream_order_and_playability() {
        let keys: Vec<_> = sample().streams().into_iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec!["fancode_cdn", "akamai_cdn", "cloudfront_cdn", "adfree_stream", "dai_stream"]
        );

        let m = sample();
        assert_eq!(m.stream("fancode_cdn").unwrap().playable_url(), Some("https://cdn/fc.m3u8"));
        assert_eq!(m.stream("akamai_cdn").unwrap().playable_url(), None);
        assert_eq!(m.stream("cloudfront_cdn").unwrap().playable_url(), None);
        assert_eq!(m.stream("dai_stream").unwrap().playable_url(), None);
        assert!(m.stream("missing").is_none());
    }

    #[test]
    fn test_top_level_key_overrides_cdn_entry_in_place() {
        let m: Match = serde_json::from_value(json!({
            "match_id": 1,
            "dai_stream": "https://cdn/dai.m3u8",
            "STREAMING_CDN": { "dai_stream": "Unavailable", "x_cdn": "https://cdn/x.m3u8" }
        }))
        .unwrap();
        let streams = m.streams();
        assert_eq!(streams[0].key, "dai_stream");
        assert_eq!(streams[0].playable_url(), Some("https://cdn/dai.m3u8"));
        assert_eq!(streams.len(), 3);
    }

    #[test]
    fn test_document_with_non_array_matches() {
        let doc: FeedDocument = serde_json::from_value(json!({ "matches": "oops" })).unwrap();
        assert!(doc.matches.is_empty());

        let doc: FeedDocument = serde_json::from_value(json!({})).unwrap();
        assert!(doc.matches.is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let doc: FeedDocument = serde_json::from_value(json!({
            "matches": [
                { "match_id": 1, "title": "Good" },
                { "match_id": 2, "title": 5 },
                { "match_id": 3, "adfree_stream": 3 },
                "not a match",
                { "match_id": 4, "title": "Also good" }
            ]
        }))
        .unwrap();

        let ids: Vec<_> = doc.matches.iter().map(|m| m.match_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_id_serializes_back_as_number() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["match_id"], json!(101));
        assert!(value.get("STREAMING_CDN").is_some());
    }
}
