//! The cache facade request handlers talk to.
//!
//! Each kind is served from its [`RecordStore`] while fresh and re-fetched from
//! the upstream otherwise. Upstream calls never run while a store lock is held,
//! so a slow fetch only delays the caller that triggered it.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::freshness::is_fresh;
use super::record_store::RecordStore;
use crate::catalog::{
    Artist, CachedRecord, ConcertDates, Location, RecordId, RecordKind, Relation, ABSENT_ID,
};
use crate::server::metrics;
use crate::upstream::{decode_sub_resource, TourUpstream, UpstreamError};

const SCOPE_ALL: &str = "all";
const SCOPE_SINGLE: &str = "single";

/// Time-to-live of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub artists: Duration,
    pub locations: Duration,
    pub dates: Duration,
    pub relations: Duration,
}

impl CacheTtls {
    pub fn uniform(ttl: Duration) -> Self {
        Self {
            artists: ttl,
            locations: ttl,
            dates: ttl,
            relations: ttl,
        }
    }

    pub fn for_kind(&self, kind: RecordKind) -> Duration {
        match kind {
            RecordKind::Artist => self.artists,
            RecordKind::Location => self.locations,
            RecordKind::Date => self.dates,
            RecordKind::Relation => self.relations,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self::uniform(Duration::from_secs(60 * 60))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttls: CacheTtls,
    /// Deadline of every upstream call made by the cache.
    pub fetch_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttls: CacheTtls::default(),
            fetch_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KindStatus {
    pub kind: RecordKind,
    pub records: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub fresh: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStatus {
    /// Whether any kind currently holds records.
    pub has_data: bool,
    /// Most recent refresh across all kinds.
    pub last_refreshed: Option<DateTime<Utc>>,
    pub kinds: Vec<KindStatus>,
}

pub struct TourCache {
    upstream: Arc<dyn TourUpstream>,
    settings: CacheSettings,
    artists: RecordStore<Artist>,
    locations: RecordStore<Location>,
    dates: RecordStore<ConcertDates>,
    relations: RecordStore<Relation>,
}

impl TourCache {
    pub fn new(upstream: Arc<dyn TourUpstream>, settings: CacheSettings) -> Self {
        Self {
            upstream,
            settings,
            artists: RecordStore::new(),
            locations: RecordStore::new(),
            dates: RecordStore::new(),
            relations: RecordStore::new(),
        }
    }

    pub async fn get_artists(&self) -> Result<Vec<Artist>, UpstreamError> {
        self.load_all(&self.artists, || self.upstream.fetch_all_artists())
            .await
    }

    pub async fn get_locations(&self) -> Result<Vec<Location>, UpstreamError> {
        self.load_all(&self.locations, || async {
            Ok::<_, UpstreamError>(self.upstream.fetch_all_locations().await?.index)
        })
        .await
    }

    pub async fn get_dates(&self) -> Result<Vec<ConcertDates>, UpstreamError> {
        self.load_all(&self.dates, || async {
            Ok::<_, UpstreamError>(self.upstream.fetch_all_dates().await?.index)
        })
        .await
    }

    pub async fn get_relations(&self) -> Result<Vec<Relation>, UpstreamError> {
        self.load_all(&self.relations, || async {
            Ok::<_, UpstreamError>(self.upstream.fetch_all_relations().await?.index)
        })
        .await
    }

    /// `Ok(None)` means upstream reported the artist does not exist.
    pub async fn get_artist_by_id(&self, id: RecordId) -> Result<Option<Artist>, UpstreamError> {
        self.load_by_id(&self.artists, id).await
    }

    pub async fn get_location_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<Location>, UpstreamError> {
        self.load_by_id(&self.locations, id).await
    }

    pub async fn get_dates_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<ConcertDates>, UpstreamError> {
        self.load_by_id(&self.dates, id).await
    }

    pub async fn get_relation_by_id(
        &self,
        id: RecordId,
    ) -> Result<Option<Relation>, UpstreamError> {
        self.load_by_id(&self.relations, id).await
    }

    /// Follows an artist's `locations` url.
    pub async fn get_location_by_url(&self, url: &str) -> Result<Option<Location>, UpstreamError> {
        self.load_by_url(&self.locations, url).await
    }

    /// Follows an artist's `concertDates` url.
    pub async fn get_dates_by_url(
        &self,
        url: &str,
    ) -> Result<Option<ConcertDates>, UpstreamError> {
        self.load_by_url(&self.dates, url).await
    }

    /// Follows an artist's `relations` url.
    pub async fn get_relation_by_url(&self, url: &str) -> Result<Option<Relation>, UpstreamError> {
        self.load_by_url(&self.relations, url).await
    }

    /// Clears the cache and re-fetches every kind, in the order artists,
    /// locations, dates, relations.
    ///
    /// Stops at the first failure: kinds fetched before it keep their new data,
    /// the remaining ones stay empty.
    pub async fn refresh_all(&self) -> Result<(), UpstreamError> {
        self.clear_all();

        let artists = self.get_artists().await?.len();
        let locations = self.get_locations().await?.len();
        let dates = self.get_dates().await?.len();
        let relations = self.get_relations().await?.len();

        info!(
            "Cache refreshed: {} artists, {} locations, {} dates, {} relations",
            artists, locations, dates, relations
        );
        Ok(())
    }

    /// Populates the cache at startup. A failure is only logged: every kind is
    /// fetched lazily on first use anyway.
    pub async fn warm_up(&self) {
        let started = Instant::now();
        match self.refresh_all().await {
            Ok(()) => info!("Cache preloaded in {:?}", started.elapsed()),
            Err(e) => warn!("Failed to preload cache: {}", e),
        }
    }

    /// Empties every kind inside one critical section.
    pub fn clear_all(&self) {
        // Locks are always taken in the same order, and no other path holds
        // more than one store lock at a time.
        let mut artists = self.artists.lock_for_clear();
        let mut locations = self.locations.lock_for_clear();
        let mut dates = self.dates.lock_for_clear();
        let mut relations = self.relations.lock_for_clear();
        artists.clear();
        locations.clear();
        dates.clear();
        relations.clear();
        drop((artists, locations, dates, relations));

        for kind in RecordKind::ALL {
            metrics::set_cache_records(kind.as_str(), 0);
        }
        debug!("Cache cleared");
    }

    pub fn status(&self) -> CacheStatus {
        let now = Utc::now();
        let kinds = vec![
            self.kind_status(&self.artists, now),
            self.kind_status(&self.locations, now),
            self.kind_status(&self.dates, now),
            self.kind_status(&self.relations, now),
        ];
        CacheStatus {
            has_data: kinds.iter().any(|k| k.records > 0),
            last_refreshed: kinds.iter().filter_map(|k| k.last_refreshed).max(),
            kinds,
        }
    }

    fn kind_status<T: CachedRecord>(&self, store: &RecordStore<T>, now: DateTime<Utc>) -> KindStatus {
        let (records, last_refreshed) = store.summary();
        KindStatus {
            kind: T::KIND,
            records,
            last_refreshed,
            fresh: is_fresh(last_refreshed, self.settings.ttls.for_kind(T::KIND), now),
        }
    }

    async fn load_all<T, F, Fut>(
        &self,
        store: &RecordStore<T>,
        fetch: F,
    ) -> Result<Vec<T>, UpstreamError>
    where
        T: CachedRecord,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, UpstreamError>>,
    {
        let kind = T::KIND;
        let (records, last_refreshed) = store.get_all();
        if !records.is_empty()
            && is_fresh(last_refreshed, self.settings.ttls.for_kind(kind), Utc::now())
        {
            metrics::record_cache_lookup(kind.as_str(), SCOPE_ALL, "hit");
            return Ok(records);
        }

        metrics::record_cache_lookup(kind.as_str(), SCOPE_ALL, "miss");
        debug!("{} collection missing or stale, fetching from upstream", kind);
        let fetched = self.with_deadline(kind, SCOPE_ALL, fetch()).await?;
        let stored = store.replace_all(fetched);
        metrics::set_cache_records(kind.as_str(), stored);
        Ok(store.get_all().0)
    }

    async fn load_by_id<T>(
        &self,
        store: &RecordStore<T>,
        id: RecordId,
    ) -> Result<Option<T>, UpstreamError>
    where
        T: CachedRecord + DeserializeOwned,
    {
        let url = self.upstream.sub_resource_url(T::KIND, id);
        self.load_one(store, id, &url).await
    }

    async fn load_by_url<T>(&self, store: &RecordStore<T>, url: &str) -> Result<Option<T>, UpstreamError>
    where
        T: CachedRecord + DeserializeOwned,
    {
        let id = self.id_from_url(T::KIND, url)?;
        self.load_one(store, id, url).await
    }

    /// Extracts the record id from a single-record url of `kind`.
    fn id_from_url(&self, kind: RecordKind, url: &str) -> Result<RecordId, UpstreamError> {
        let prefix = format!("{}/{}/", self.upstream.base_url(), kind.endpoint());
        let tail = url.strip_prefix(&prefix).ok_or_else(|| {
            UpstreamError::InvalidInput(format!("Not a {} url: {}", kind, url))
        })?;
        tail.parse::<RecordId>()
            .map_err(|_| UpstreamError::InvalidInput(format!("Malformed {} id in url: {}", kind, url)))
    }

    async fn load_one<T>(
        &self,
        store: &RecordStore<T>,
        id: RecordId,
        url: &str,
    ) -> Result<Option<T>, UpstreamError>
    where
        T: CachedRecord + DeserializeOwned,
    {
        let kind = T::KIND;
        if id == ABSENT_ID {
            return Err(UpstreamError::InvalidInput(format!(
                "{} id must be non-zero",
                kind
            )));
        }

        let (cached, last_refreshed) = store.get_by_id(id);
        if let Some(record) = cached {
            if is_fresh(last_refreshed, self.settings.ttls.for_kind(kind), Utc::now()) {
                metrics::record_cache_lookup(kind.as_str(), SCOPE_SINGLE, "hit");
                return Ok(Some(record));
            }
        }

        metrics::record_cache_lookup(kind.as_str(), SCOPE_SINGLE, "miss");
        debug!("{} {} not cached or stale, fetching {}", kind, id, url);
        let body = self
            .with_deadline(
                kind,
                SCOPE_SINGLE,
                self.upstream.fetch_sub_resource(kind, url),
            )
            .await?;

        let record = match body {
            Some(body) => decode_sub_resource::<T>(body)?,
            None => None,
        };
        let Some(record) = record else {
            debug!("{} {} not found upstream", kind, id);
            return Ok(None);
        };
        if record.id() != id {
            return Err(UpstreamError::BadResponse(format!(
                "Asked upstream for {} {} but got id {}",
                kind,
                id,
                record.id()
            )));
        }

        store.merge(id, record.clone());
        metrics::set_cache_records(kind.as_str(), store.summary().0);
        Ok(Some(record))
    }

    async fn with_deadline<R>(
        &self,
        kind: RecordKind,
        scope: &'static str,
        fetch: impl Future<Output = Result<R, UpstreamError>>,
    ) -> Result<R, UpstreamError> {
        let started = Instant::now();
        let timeout = self.settings.fetch_timeout;
        let result = match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Unavailable(format!(
                "{} fetch timed out after {:?}",
                kind, timeout
            ))),
        };

        let label = if result.is_ok() { "ok" } else { "error" };
        metrics::record_upstream_fetch(kind.as_str(), scope, label, started.elapsed());
        if let Err(e) = &result {
            warn!("Upstream {} fetch ({}) failed: {}", kind, scope, e);
        }
        result
    }
}
