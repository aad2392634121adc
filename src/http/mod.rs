//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → pages.rs (HTML: listing, player)
//!     → api.rs (JSON: matches, listing, health, cache)
//!     → relay (stream forwarding, mounted from crate::relay)
//! ```

pub mod api;
pub mod pages;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
