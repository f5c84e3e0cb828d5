//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the upstream fixture data changes, update only this file.

// ============================================================================
// Upstream Fixture Data
// ============================================================================

/// Path prefix of the mocked tour dataset API
pub const UPSTREAM_API_PATH: &str = "/api";

/// Id of "Queen"
pub const ARTIST_1_ID: u32 = 1;

/// Id of "SOJA"
pub const ARTIST_2_ID: u32 = 2;

/// Id no fixture record uses
pub const MISSING_ARTIST_ID: u32 = 99;

/// Artist 1 name
pub const ARTIST_1_NAME: &str = "Queen";

/// Artist 2 name
pub const ARTIST_2_NAME: &str = "SOJA";

/// A member of artist 1
pub const ARTIST_1_MEMBER: &str = "Freddie Mercury";

/// Raw location token of artist 1
pub const ARTIST_1_LOCATION_TOKEN: &str = "north_carolina-usa";

/// Display form of `ARTIST_1_LOCATION_TOKEN`
pub const ARTIST_1_LOCATION_DISPLAY: &str = "North Carolina, USA";

/// Raw location token of artist 2
pub const ARTIST_2_LOCATION_TOKEN: &str = "playa_del_carmen-mexico";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Upstream timeout handed to the server under test (seconds)
pub const UPSTREAM_TIMEOUT_SECS: u64 = 2;
