use super::{CachedRecord, RecordId, RecordKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Serialize, Debug, PartialEq, Eq, Default)]
pub struct Artist {
    pub id: RecordId,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, rename = "creationDate")]
    pub creation_date: i32,
    #[serde(default, rename = "firstAlbum")]
    pub first_album: String,
    /// Url of this artist's locations sub-resource.
    #[serde(default)]
    pub locations: String,
    /// Url of this artist's concert dates sub-resource.
    #[serde(default, rename = "concertDates")]
    pub concert_dates: String,
    /// Url of this artist's relation sub-resource.
    #[serde(default)]
    pub relations: String,
}

impl CachedRecord for Artist {
    const KIND: RecordKind = RecordKind::Artist;

    fn id(&self) -> RecordId {
        self.id
    }
}
