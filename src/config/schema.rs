//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default public match feed.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/Jitendra-unatti/fancode/refs/heads/main/data/fancode.json";

/// Desktop browser User-Agent sent by the relay unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote match feed settings.
    pub feed: FeedConfig,

    /// Stream relay settings.
    pub relay: RelayConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Remote feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL of the JSON document carrying the `matches` array.
    pub url: String,

    /// Fetch timeout in seconds.
    pub timeout_secs: u64,

    /// How long a fetched list stays fresh. 0 keeps it for the process lifetime.
    pub cache_ttl_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: 10,
            cache_ttl_secs: 0,
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// User-Agent sent upstream.
    pub user_agent: String,

    /// Referer sent upstream. Defaults to the target's origin when unset.
    pub referer: Option<String>,

    /// Origin sent upstream. Defaults to the target's origin when unset.
    pub origin: Option<String>,

    /// Upstream connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Time allowed for upstream response headers, in seconds. Kept below
    /// `timeouts.request_secs` so a stalled upstream answers 504.
    pub response_timeout_secs: u64,

    /// Rewrite HLS playlists so nested URIs go back through the relay.
    pub rewrite_playlists: bool,

    /// Largest playlist buffered for rewriting.
    pub max_playlist_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: None,
            origin: None,
            connect_timeout_secs: 5,
            response_timeout_secs: 20,
            rewrite_playlists: true,
            max_playlist_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed to produce response headers, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
