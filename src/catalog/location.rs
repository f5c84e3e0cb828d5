use super::{CachedRecord, RecordId, RecordKind};
use serde::{Deserialize, Serialize};

/// Concert locations of one artist.
///
/// Location tokens are stored exactly as upstream sends them
/// (e.g. `north_carolina-usa`).
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct Location {
    pub id: RecordId,
    #[serde(default)]
    pub locations: Vec<String>,
    /// Url of the matching dates sub-resource.
    #[serde(default)]
    pub dates: String,
}

impl CachedRecord for Location {
    const KIND: RecordKind = RecordKind::Location;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Body of the bulk `/locations` endpoint.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct LocationIndex {
    #[serde(default)]
    pub index: Vec<Location>,
}
