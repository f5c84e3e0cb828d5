//! Groupie Tracker Server Library
//!
//! A mirror of the public tour dataset behind an in-process cache, served as
//! HTML pages and a small JSON API. The library exposes the modules for the
//! binary and for the integration tests.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod server;
pub mod upstream;

// Re-export commonly used types for convenience
pub use cache::{CacheSettings, CacheStatus, CacheTtls, TourCache};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use upstream::{TourUpstream, UpstreamClient, UpstreamError};

/// Short git hash the binary was built from.
pub const GIT_HASH: &str = env!("GIT_HASH");
