//! In-process cache of the tour dataset.

mod freshness;
mod record_store;
mod tour_cache;

pub use freshness::is_fresh;
pub use record_store::{ClearGuard, RecordStore};
pub use tour_cache::{CacheSettings, CacheStatus, CacheTtls, KindStatus, TourCache};
