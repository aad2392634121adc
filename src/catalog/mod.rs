//! Match catalog: pure list logic over the feed.
//!
//! # Data Flow
//! ```text
//! Vec<Match> (from feed store)
//!     → listing.rs (live-first sort, spotlight + grid split)
//!     → links.rs (playable stream keys → labelled player links)
//!     → playback.rs (player route id + cdn → stream URL or error)
//! ```
//!
//! # Design Decisions
//! - No I/O here; everything is a function of the match list
//! - Matches are identified only by their feed id

pub mod links;
pub mod listing;
pub mod playback;

pub use links::{stream_label, stream_links, StreamLink};
pub use listing::{sort_live_first, Listing};
pub use playback::{find_match, require_params, resolve_playback, resolve_stream, Playback, PlaybackError};
