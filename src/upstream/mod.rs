//! Boundary to the remote tour dataset.

mod client;
mod decode;
mod error;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{UpstreamClient, DEFAULT_UPSTREAM_URL};
pub use decode::{decode_sub_resource, SubResource};
pub use error::UpstreamError;

use crate::catalog::{Artist, DateIndex, LocationIndex, RecordId, RecordKind, RelationIndex};
use async_trait::async_trait;

/// Source of fresh copies of the dataset.
///
/// The cache only ever talks to this trait, so tests can swap the network for an
/// in-memory double.
#[async_trait]
pub trait TourUpstream: Send + Sync {
    async fn fetch_all_artists(&self) -> Result<Vec<Artist>, UpstreamError>;
    async fn fetch_all_locations(&self) -> Result<LocationIndex, UpstreamError>;
    async fn fetch_all_dates(&self) -> Result<DateIndex, UpstreamError>;
    async fn fetch_all_relations(&self) -> Result<RelationIndex, UpstreamError>;

    /// Fetches one record of `kind` from its single-resource url.
    ///
    /// Returns `Ok(None)` when upstream reports the record does not exist.
    async fn fetch_sub_resource(
        &self,
        kind: RecordKind,
        url: &str,
    ) -> Result<Option<serde_json::Value>, UpstreamError>;

    /// Base url, without trailing slash.
    fn base_url(&self) -> &str;

    fn sub_resource_url(&self, kind: RecordKind, id: RecordId) -> String {
        format!("{}/{}/{}", self.base_url(), kind.endpoint(), id)
    }
}
