//! Upstream forwarding with injected browser headers.

use axum::{
    body::Body,
    http::{
        header::{
            ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ORIGIN, RANGE, REFERER,
            USER_AGENT,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use std::time::Duration;
use url::Url;

use crate::config::RelayConfig;
use crate::relay::error::RelayError;
use crate::relay::playlist::{is_playlist, rewrite_playlist};

/// Content type assumed when the upstream does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Response headers copied from upstream besides the content type.
const PASSTHROUGH_HEADERS: [axum::http::HeaderName; 3] = [CONTENT_LENGTH, CONTENT_RANGE, ACCEPT_RANGES];

/// Stateless forwarder shared by all relay requests.
#[derive(Clone)]
pub struct Relay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse the `url` query value into an absolute http(s) URL.
    pub fn parse_target(raw: Option<&str>) -> Result<Url, RelayError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(RelayError::MissingUrl)?;
        let url = Url::parse(raw).map_err(|e| RelayError::InvalidUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(RelayError::InvalidUrl(format!("unsupported scheme '{other}'"))),
        }
    }

    /// The User-Agent/Referer/Origin triple sent for a target.
    pub fn upstream_headers(&self, target: &Url) -> HeaderMap {
        let site = target.origin().ascii_serialization();
        let referer = self.config.referer.clone().unwrap_or_else(|| format!("{site}/"));
        let origin = self.config.origin.clone().unwrap_or(site);

        let mut headers = HeaderMap::new();
        for (name, value) in [
            (USER_AGENT, self.config.user_agent.as_str()),
            (REFERER, referer.as_str()),
            (ORIGIN, origin.as_str()),
        ] {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => tracing::warn!(header = %name, "Skipping unencodable relay header"),
            }
        }
        headers
    }

    /// Fetch the target and turn the upstream answer into a client response.
    pub async fn forward(
        &self,
        target: Url,
        range: Option<HeaderValue>,
    ) -> Result<Response, RelayError> {
        let mut request = self
            .client
            .get(target.clone())
            .headers(self.upstream_headers(&target));
        if let Some(range) = range {
            request = request.header(RANGE, range);
        }

        let wait = self.config.response_timeout_secs;
        let upstream = tokio::time::timeout(Duration::from_secs(wait), request.send())
            .await
            .map_err(|_| {
                tracing::warn!(url = %target, timeout_secs = wait, "Upstream response timed out");
                RelayError::UpstreamTimeout(wait)
            })??;
        let status = upstream.status();

        if !status.is_success() {
            tracing::warn!(url = %target, status = %status, "Upstream returned error status");
            let reason = status.canonical_reason().unwrap_or("Unknown");
            return Ok((status, format!("Error fetching stream: {reason}")).into_response());
        }

        let upstream_type = upstream.headers().get(CONTENT_TYPE).cloned();
        let playlist = is_playlist(
            upstream_type.as_ref().and_then(|v| v.to_str().ok()),
            upstream.url(),
        );
        let content_type =
            upstream_type.unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        if self.config.rewrite_playlists && playlist {
            let base = upstream.url().clone();
            let body = self.read_bounded(upstream).await?;
            let body = match rewrite_playlist(&body, &base) {
                Some(rewritten) => rewritten,
                None => {
                    tracing::warn!(url = %target, "Unparseable playlist passed through");
                    body
                }
            };
            tracing::debug!(url = %target, bytes = body.len(), "Rewrote playlist");
            return build_response(status, content_type, HeaderMap::new(), Body::from(body));
        }

        let mut passthrough = HeaderMap::new();
        for name in PASSTHROUGH_HEADERS {
            if let Some(value) = upstream.headers().get(&name) {
                passthrough.insert(name, value.clone());
            }
        }

        let stream = upstream.bytes_stream();
        build_response(status, content_type, passthrough, Body::from_stream(stream))
    }

    /// Read a whole body, refusing anything over the playlist limit.
    async fn read_bounded(&self, upstream: reqwest::Response) -> Result<Vec<u8>, RelayError> {
        let limit = self.config.max_playlist_bytes;
        if upstream.content_length().is_some_and(|len| len as usize > limit) {
            return Err(RelayError::PlaylistTooLarge(limit));
        }

        let mut body = Vec::new();
        let mut stream = upstream.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > limit {
                return Err(RelayError::PlaylistTooLarge(limit));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

fn build_response(
    status: StatusCode,
    content_type: HeaderValue,
    extra: HeaderMap,
    body: Body,
) -> Result<Response, RelayError> {
    let mut builder = Response::builder().status(status).header(CONTENT_TYPE, content_type);
    for (name, value) in extra.iter() {
        builder = builder.header(name, value);
    }
    builder
        .body(body)
        .map_err(|e| RelayError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(config: RelayConfig) -> Relay {
        Relay::new(&config).unwrap()
    }

    #[test]
    fn test_parse_target() {
        assert!(matches!(Relay::parse_target(None), Err(RelayError::MissingUrl)));
        assert!(matches!(Relay::parse_target(Some("  ")), Err(RelayError::MissingUrl)));
        assert!(matches!(
            Relay::parse_target(Some("not a url")),
            Err(RelayError::InvalidUrl(_))
        ));
        assert!(matches!(
            Relay::parse_target(Some("file:///etc/passwd")),
            Err(RelayError::InvalidUrl(_))
        ));
        let url = Relay::parse_target(Some("https://cdn.example.com/a.m3u8")).unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn test_headers_default_to_target_origin() {
        let relay = relay(RelayConfig::default());
        let target = Url::parse("https://cdn.example.com:8443/live/a.m3u8").unwrap();
        let headers = relay.upstream_headers(&target);

        assert_eq!(headers[USER_AGENT], crate::config::schema::DEFAULT_USER_AGENT);
        assert_eq!(headers[REFERER], "https://cdn.example.com:8443/");
        assert_eq!(headers[ORIGIN], "https://cdn.example.com:8443");
    }

    #[test]
    fn test_configured_headers_win() {
        let relay = relay(RelayConfig {
            user_agent: "TestAgent/1.0".into(),
            referer: Some("https://site.example/watch".into()),
            origin: Some("https://site.example".into()),
            ..Default::default()
        });
        let target = Url::parse("http://cdn.example.com/a.ts").unwrap();
        let headers = relay.upstream_headers(&target);

        assert_eq!(headers[USER_AGENT], "TestAgent/1.0");
        assert_eq!(headers[REFERER], "https://site.example/watch");
        assert_eq!(headers[ORIGIN], "https://site.example");
    }
}
