//! Decoding of single-record upstream responses.
//!
//! Single-resource endpoints answer either with the bare record or with the
//! same `{"index": [...]}` wrapper the bulk endpoints use. Both shapes are
//! branches of [`SubResource`].

use crate::catalog::CachedRecord;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::UpstreamError;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SubResource<T> {
    Record(T),
    Indexed { index: Vec<T> },
}

impl<T: CachedRecord> SubResource<T> {
    /// The record carried by this response, or `None` when it signals absence.
    pub fn into_record(self) -> Option<T> {
        let record = match self {
            SubResource::Record(record) => Some(record),
            SubResource::Indexed { index } => index.into_iter().next(),
        };
        record.filter(|r| !r.is_absent())
    }
}

/// Decodes a raw sub-resource body into a record of kind `T`.
///
/// `Ok(None)` means upstream answered with a well-formed "not found".
pub fn decode_sub_resource<T>(body: serde_json::Value) -> Result<Option<T>, UpstreamError>
where
    T: CachedRecord + DeserializeOwned,
{
    serde_json::from_value::<SubResource<T>>(body)
        .map(SubResource::into_record)
        .map_err(|e| {
            UpstreamError::BadResponse(format!("Undecodable {} record: {}", T::KIND, e))
        })
}
