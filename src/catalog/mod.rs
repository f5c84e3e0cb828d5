//! Records mirrored from the remote tour dataset.
//!
//! Every record kind carries an upstream-assigned integer id. Ids are never
//! generated locally, and `0` is the "absent" sentinel.

mod artist;
mod date;
mod location;
mod relation;

pub use artist::Artist;
pub use date::{ConcertDates, DateIndex};
pub use location::{Location, LocationIndex};
pub use relation::{Relation, RelationIndex};

use serde::{Deserialize, Serialize};

/// Upstream record identifier, unique within a kind.
pub type RecordId = u32;

/// The id value upstream uses to signal "no such record".
pub const ABSENT_ID: RecordId = 0;

/// A record the cache can index by id.
pub trait CachedRecord: Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> RecordId;

    fn is_absent(&self) -> bool {
        self.id() == ABSENT_ID
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Artist,
    Location,
    Date,
    Relation,
}

impl RecordKind {
    /// Fixed order used by full refreshes and by the clear-all critical section.
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Artist,
        RecordKind::Location,
        RecordKind::Date,
        RecordKind::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Artist => "artist",
            RecordKind::Location => "location",
            RecordKind::Date => "date",
            RecordKind::Relation => "relation",
        }
    }

    /// Path segment of the upstream endpoint serving this kind.
    pub fn endpoint(&self) -> &'static str {
        match self {
            RecordKind::Artist => "artists",
            RecordKind::Location => "locations",
            RecordKind::Date => "dates",
            RecordKind::Relation => "relation",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
