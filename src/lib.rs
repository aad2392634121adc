//! Overtime: live-sports match listing and stream relay.

pub mod catalog;
pub mod config;
pub mod feed;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod views;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
