//! Match feed subsystem.
//!
//! # Data Flow
//! ```text
//! remote JSON document { "matches": [...] }
//!     → client.rs (GET, status check, decode, live-first sort)
//!     → store.rs (single-flight in-memory cache)
//!     → catalog / pages / api
//! ```
//!
//! # Design Decisions
//! - No retries; a failure surfaces to the caller and is not cached
//! - The cached list is shared as `Arc<Vec<Match>>`, never mutated

pub mod client;
pub mod store;
pub mod types;

pub use client::{parse_feed, FeedClient, FeedError};
pub use store::{FetchResult, MatchStore};
pub use types::{is_playable, Match, MatchId, StreamVariant, UNAVAILABLE};
