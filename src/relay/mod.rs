//! Stream relay subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/proxy?url=<target>
//!     → handler.rs (query parsing, CORS, metrics)
//!     → forward.rs (inject User-Agent/Referer/Origin, GET upstream)
//!     → playlist.rs (HLS playlists: route nested URIs back through the relay)
//!     → status + content type echoed, body streamed to the client
//! ```
//!
//! # Design Decisions
//! - Stateless: no session or cache between requests
//! - Bodies are streamed; only playlists are buffered, with a size cap
//! - Upstream error statuses are passed through, transport failures map to 502/504

pub mod error;
pub mod forward;
pub mod handler;
pub mod playlist;

pub use error::RelayError;
pub use forward::{Relay, DEFAULT_CONTENT_TYPE};
pub use handler::relay_router;
pub use playlist::{relay_url, RELAY_PATH};
