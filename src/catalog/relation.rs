use super::{CachedRecord, RecordId, RecordKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Location to dates mapping of one artist.
///
/// Keys are raw upstream location tokens; any normalization belongs to the
/// presentation layer.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct Relation {
    pub id: RecordId,
    #[serde(default, rename = "datesLocations")]
    pub dates_locations: BTreeMap<String, Vec<String>>,
}

impl CachedRecord for Relation {
    const KIND: RecordKind = RecordKind::Relation;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Body of the bulk `/relation` endpoint.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct RelationIndex {
    #[serde(default)]
    pub index: Vec<Relation>,
}
