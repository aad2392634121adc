//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that configured URLs are absolute http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `feed.url`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if !is_http_url(&config.feed.url) {
        errors.push(ValidationError::new(
            "feed.url",
            format!("'{}' is not an absolute http(s) URL", config.feed.url),
        ));
    }
    if config.feed.timeout_secs == 0 {
        errors.push(ValidationError::new("feed.timeout_secs", "must be greater than 0"));
    }

    if config.relay.user_agent.trim().is_empty() {
        errors.push(ValidationError::new("relay.user_agent", "must not be empty"));
    }
    if let Some(referer) = &config.relay.referer {
        if !is_http_url(referer) {
            errors.push(ValidationError::new(
                "relay.referer",
                format!("'{}' is not an absolute http(s) URL", referer),
            ));
        }
    }
    if let Some(origin) = &config.relay.origin {
        if !is_http_url(origin) {
            errors.push(ValidationError::new(
                "relay.origin",
                format!("'{}' is not an absolute http(s) URL", origin),
            ));
        }
    }
    if config.relay.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "relay.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.relay.response_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "relay.response_timeout_secs",
            "must be greater than 0",
        ));
    } else if config.timeouts.request_secs > 0
        && config.relay.response_timeout_secs >= config.timeouts.request_secs
    {
        errors.push(ValidationError::new(
            "relay.response_timeout_secs",
            format!(
                "must be less than timeouts.request_secs ({})",
                config.timeouts.request_secs
            ),
        ));
    }
    if config.relay.rewrite_playlists && config.relay.max_playlist_bytes == 0 {
        errors.push(ValidationError::new(
            "relay.max_playlist_bytes",
            "must be greater than 0 when playlist rewriting is enabled",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    matches!(Url::parse(raw), Ok(u) if u.scheme() == "http" || u.scheme() == "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.feed.url = "ftp://example.com/feed.json".into();
        config.timeouts.request_secs = 0;
        config.relay.origin = Some("example.com".into());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "feed.url",
                "relay.origin",
                "timeouts.request_secs"
            ]
        );
    }

    #[test]
    fn test_relay_response_timeout_below_request_timeout() {
        let mut config = AppConfig::default();
        config.relay.response_timeout_secs = config.timeouts.request_secs;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "relay.response_timeout_secs");

        config.relay.response_timeout_secs = 0;
        assert!(validate_config(&config).is_err());

        config.relay.response_timeout_secs = 1;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
