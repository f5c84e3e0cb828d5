//! Freshness decision for cached collections.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Whether data refreshed at `last_refreshed` may still be served at `now`.
///
/// Never-populated data (`None`) is always stale, as is anything at least
/// `ttl` old. A zero `ttl` disables caching entirely. A refresh timestamp in
/// the future (clock skew) counts as fresh.
pub fn is_fresh(last_refreshed: Option<DateTime<Utc>>, ttl: Duration, now: DateTime<Utc>) -> bool {
    let Some(last_refreshed) = last_refreshed else {
        return false;
    };
    if ttl.is_zero() {
        return false;
    }
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => now.signed_duration_since(last_refreshed) < ttl,
        // Beyond chrono's range, nothing can be that old.
        Err(_) => true,
    }
}
