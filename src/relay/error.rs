//! Relay error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Everything that can stop the relay from forwarding a stream.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Error: No stream URL provided")]
    MissingUrl,
    #[error("Error: Invalid stream URL: {0}")]
    InvalidUrl(String),
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Upstream did not respond within {0}s")]
    UpstreamTimeout(u64),
    #[error("Playlist exceeds {0} bytes")]
    PlaylistTooLarge(usize),
    #[error("Internal Server Error")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Upstream(_) | RelayError::PlaylistTooLarge(_) => StatusCode::BAD_GATEWAY,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            RelayError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        };
        (status, body).into_response()
    }
}
