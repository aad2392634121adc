//! HTML page handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;

use crate::catalog::{require_params, resolve_playback, Listing, PlaybackError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::views::{player::FEED_ERROR, render_listing, render_listing_error, render_player, render_stream_error};

/// Query string of the player route.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    pub id: Option<String>,
    pub cdn: Option<String>,
}

/// `GET /`
pub async fn listing_page(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    let (status, html) = match state.store.matches().await {
        Ok(matches) => (StatusCode::OK, render_listing(&Listing::build(&matches))),
        Err(_) => (StatusCode::BAD_GATEWAY, render_listing_error()),
    };
    metrics::record_page_request("listing", status.as_u16());
    (status, Html(html))
}

/// `GET /player?id=&cdn=`
pub async fn player_page(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> (StatusCode, Html<String>) {
    let (status, html) = player_response(&state, &query).await;
    metrics::record_page_request("player", status.as_u16());
    (status, Html(html))
}

async fn player_response(state: &AppState, query: &PlayerQuery) -> (StatusCode, String) {
    let id = query.id.as_deref();
    let cdn = query.cdn.as_deref();

    // Parameters are checked before touching the feed.
    if let Err(e) = require_params(id, cdn) {
        return playback_error(e);
    }

    let matches = match state.store.matches().await {
        Ok(matches) => matches,
        Err(_) => return (StatusCode::BAD_GATEWAY, render_stream_error(FEED_ERROR)),
    };

    match resolve_playback(&matches, id, cdn) {
        Ok(playback) => {
            tracing::info!(
                match_id = %playback.game.match_id,
                cdn = %playback.cdn,
                "Starting playback"
            );
            (
                StatusCode::OK,
                render_player(&playback.game.title, &playback.stream_url),
            )
        }
        Err(e) => playback_error(e),
    }
}

fn playback_error(e: PlaybackError) -> (StatusCode, String) {
    let status = match e {
        PlaybackError::MissingParams => StatusCode::BAD_REQUEST,
        PlaybackError::NotFound | PlaybackError::Unavailable => StatusCode::NOT_FOUND,
    };
    (status, render_stream_error(&e.to_string()))
}
