//! In-memory upstream double with per-method call counters.

use super::{TourUpstream, UpstreamError};
use crate::catalog::{
    Artist, ConcertDates, DateIndex, Location, LocationIndex, RecordKind, Relation, RelationIndex,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub const MOCK_BASE_URL: &str = "http://upstream.test/api";

#[derive(Default)]
pub struct MockUpstream {
    artists: Mutex<Vec<Artist>>,
    locations: Mutex<Vec<Location>>,
    dates: Mutex<Vec<ConcertDates>>,
    relations: Mutex<Vec<Relation>>,
    single: Mutex<HashMap<String, serde_json::Value>>,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
    call_counts: Mutex<HashMap<String, usize>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_artists(&self, artists: Vec<Artist>) {
        *self.artists.lock().unwrap() = artists;
    }

    pub fn set_locations(&self, locations: Vec<Location>) {
        *self.locations.lock().unwrap() = locations;
    }

    pub fn set_dates(&self, dates: Vec<ConcertDates>) {
        *self.dates.lock().unwrap() = dates;
    }

    pub fn set_relations(&self, relations: Vec<Relation>) {
        *self.relations.lock().unwrap() = relations;
    }

    /// Serves `body` for the single-record url of `kind`/`id`.
    pub fn add_single(&self, kind: RecordKind, id: u32, body: serde_json::Value) {
        let url = format!("{}/{}/{}", MOCK_BASE_URL, kind.endpoint(), id);
        self.single.lock().unwrap().insert(url, body);
    }

    /// Makes `method` fail with `Unavailable` until `recover` is called.
    pub fn fail(&self, method: &str) {
        self.failing.lock().unwrap().insert(method.to_string());
    }

    pub fn recover(&self, method: &str) {
        self.failing.lock().unwrap().remove(method);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        *self.call_counts.lock().unwrap().get(method).unwrap_or(&0)
    }

    async fn enter(&self, method: &str) -> Result<(), UpstreamError> {
        {
            let mut counts = self.call_counts.lock().unwrap();
            *counts.entry(method.to_string()).or_insert(0) += 1;
        }
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(method) {
            return Err(UpstreamError::Unavailable(format!("{} is down", method)));
        }
        Ok(())
    }
}

#[async_trait]
impl TourUpstream for MockUpstream {
    async fn fetch_all_artists(&self) -> Result<Vec<Artist>, UpstreamError> {
        self.enter("fetch_all_artists").await?;
        Ok(self.artists.lock().unwrap().clone())
    }

    async fn fetch_all_locations(&self) -> Result<LocationIndex, UpstreamError> {
        self.enter("fetch_all_locations").await?;
        Ok(LocationIndex {
            index: self.locations.lock().unwrap().clone(),
        })
    }

    async fn fetch_all_dates(&self) -> Result<DateIndex, UpstreamError> {
        self.enter("fetch_all_dates").await?;
        Ok(DateIndex {
            index: self.dates.lock().unwrap().clone(),
        })
    }

    async fn fetch_all_relations(&self) -> Result<RelationIndex, UpstreamError> {
        self.enter("fetch_all_relations").await?;
        Ok(RelationIndex {
            index: self.relations.lock().unwrap().clone(),
        })
    }

    async fn fetch_sub_resource(
        &self,
        _kind: RecordKind,
        url: &str,
    ) -> Result<Option<serde_json::Value>, UpstreamError> {
        self.enter("fetch_sub_resource").await?;
        Ok(self.single.lock().unwrap().get(url).cloned())
    }

    fn base_url(&self) -> &str {
        MOCK_BASE_URL
    }
}
