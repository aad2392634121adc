//! Server-rendered HTML.
//!
//! # Responsibilities
//! - Listing page (spotlight, grid, stream buttons)
//! - Player page (video element wired to hls.js and Plyr via the relay)
//! - Error screens
//!
//! # Design Decisions
//! - Renderers are pure functions returning `String`
//! - All feed text is escaped; script values go through `js_string`
//! - Markup is unstyled

pub mod html;
pub mod listing;
pub mod player;

pub use listing::{render_listing, render_listing_error};
pub use player::{render_player, render_stream_error};
