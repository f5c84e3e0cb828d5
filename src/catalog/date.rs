use super::{CachedRecord, RecordId, RecordKind};
use serde::{Deserialize, Serialize};

/// Concert dates of one artist, raw upstream tokens (`*23-08-2019`).
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct ConcertDates {
    pub id: RecordId,
    #[serde(default)]
    pub dates: Vec<String>,
}

impl CachedRecord for ConcertDates {
    const KIND: RecordKind = RecordKind::Date;

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Body of the bulk `/dates` endpoint.
#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct DateIndex {
    #[serde(default)]
    pub index: Vec<ConcertDates>,
}
