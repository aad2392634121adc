//! JSON API over the match catalog.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{stream_links, Listing, PlaybackError, StreamLink};
use crate::feed::{FeedError, Match};
use crate::http::server::AppState;
use crate::observability::metrics;

/// A match together with its player links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub details: Match,
    pub links: Vec<StreamLink>,
}

impl From<&Match> for MatchView {
    fn from(m: &Match) -> Self {
        Self {
            links: stream_links(m),
            details: m.clone(),
        }
    }
}

/// Body of `GET /api/listing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub spotlight: Option<MatchView>,
    pub grid: Vec<MatchView>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// JSON error body with a status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Arc<FeedError>> for ApiError {
    fn from(e: Arc<FeedError>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full match list, live first.
pub async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, ApiError> {
    let result = state.store.matches().await;
    record("api_matches", &result);
    Ok(Json((*result?).clone()))
}

/// Spotlight and grid, each with links.
pub async fn listing(State(state): State<AppState>) -> Result<Json<ListingResponse>, ApiError> {
    let result = state.store.matches().await;
    record("api_listing", &result);

    let listing = Listing::build(&result?);
    Ok(Json(ListingResponse {
        spotlight: listing.spotlight.as_ref().map(MatchView::from),
        grid: listing.grid.iter().map(MatchView::from).collect(),
    }))
}

/// One match by id.
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchView>, ApiError> {
    match state.store.match_by_id(&id).await? {
        Some(m) => {
            metrics::record_page_request("api_match", 200);
            Ok(Json(MatchView::from(&m)))
        }
        None => {
            metrics::record_page_request("api_match", 404);
            Err(ApiError {
                status: StatusCode::NOT_FOUND,
                message: PlaybackError::NotFound.to_string(),
            })
        }
    }
}

/// Drop the feed cache so the next request refetches.
pub async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.store.invalidate().await;
    StatusCode::NO_CONTENT
}

fn record<T>(page: &'static str, result: &Result<T, Arc<FeedError>>) {
    let status = if result.is_ok() { 200 } else { 502 };
    metrics::record_page_request(page, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_view_flattens() {
        let m: Match = serde_json::from_value(json!({
            "match_id": 3,
            "title": "T",
            "adfree_stream": "https://cdn/a.m3u8"
        }))
        .unwrap();

        let value = serde_json::to_value(MatchView::from(&m)).unwrap();
        assert_eq!(value["match_id"], json!(3));
        assert_eq!(value["title"], json!("T"));
        assert_eq!(value["links"][0]["label"], json!("ADFREE"));

        let back: MatchView = serde_json::from_value(value).unwrap();
        assert_eq!(back.details.title, "T");
        assert_eq!(back.links.len(), 1);
    }
}
