//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Mount the relay with its own CORS policy
//! - Serve until shutdown

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::feed::{FeedClient, MatchStore};
use crate::http::request::{make_request_span, MakeRequestUuid};
use crate::http::{api, pages};
use crate::lifecycle::wait_for_shutdown;
use crate::relay::{relay_router, Relay};

/// Application state injected into page and API handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: MatchStore,
}

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the listing, player, API and relay.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let feed = FeedClient::new(&config.feed)?;
        let state = AppState {
            store: MatchStore::new(feed, config.feed.cache_ttl_secs),
        };
        let relay = Relay::new(&config.relay)?;

        let router = Self::build_router(&config, state.clone(), relay);
        Ok(Self {
            router,
            state,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState, relay: Relay) -> Router {
        Router::new()
            .route("/", get(pages::listing_page))
            .route("/player", get(pages::player_page))
            .route("/health", get(api::health))
            .route("/api/matches", get(api::list_matches))
            .route("/api/matches/{id}", get(api::get_match))
            .route("/api/listing", get(api::listing))
            .route("/api/cache/invalidate", post(api::invalidate_cache))
            .with_state(state)
            .merge(relay_router(relay))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server until `shutdown` fires or Ctrl+C is pressed.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            feed_url = %self.config.feed.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The shared match cache.
    pub fn store(&self) -> &MatchStore {
        &self.state.store
    }
}
