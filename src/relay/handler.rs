//! Axum wiring for the relay endpoint.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::observability::metrics;
use crate::relay::forward::Relay;
use crate::relay::playlist::RELAY_PATH;

/// Query string of a relay request.
#[derive(Debug, Default, Deserialize)]
pub struct RelayQuery {
    pub url: Option<String>,
}

const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Router serving `/api/proxy` with permissive CORS.
///
/// The CORS layer answers every `OPTIONS` request itself with `200`. The
/// allow-origin, allow-methods and allow-headers values are then stamped on
/// every response, preflight or not.
pub fn relay_router(relay: Relay) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let layers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(cors);

    Router::new()
        .route(RELAY_PATH, get(relay_handler))
        .with_state(relay)
        .layer(layers)
}

/// Forward `?url=` upstream.
pub async fn relay_handler(
    State(relay): State<Relay>,
    Query(query): Query<RelayQuery>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();

    let response = match Relay::parse_target(query.url.as_deref()) {
        Ok(target) => {
            tracing::debug!(url = %target, "Relaying stream request");
            let range = headers.get(header::RANGE).cloned();
            match relay.forward(target, range).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, "Relay error");
                    e.into_response()
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected relay request");
            e.into_response()
        }
    };

    metrics::record_relay_request(response.status().as_u16(), start);
    response
}
