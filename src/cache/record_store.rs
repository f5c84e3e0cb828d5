//! Thread-safe storage for one record kind.

use crate::catalog::{CachedRecord, RecordId, ABSENT_ID};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The bulk collection, its id index and the refresh timestamp of one kind.
///
/// `index` maps every id in `records` to its position, so the two are always
/// mutated together under the same lock.
struct Slot<T> {
    records: Vec<T>,
    index: HashMap<RecordId, usize>,
    last_refreshed: Option<DateTime<Utc>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            last_refreshed: None,
        }
    }
}

impl<T> Slot<T> {
    fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
        self.last_refreshed = None;
    }
}

/// Storage of one kind of record, ordered as upstream returned it and
/// indexed by id.
///
/// Readers share the lock, writers hold it exclusively for the whole mutation.
/// No method ever blocks on I/O while holding the lock.
pub struct RecordStore<T: CachedRecord> {
    slot: RwLock<Slot<T>>,
}

/// Exclusive access to a store, used to clear several kinds inside a single
/// critical section.
pub struct ClearGuard<'a, T> {
    slot: RwLockWriteGuard<'a, Slot<T>>,
}

impl<T> ClearGuard<'_, T> {
    pub fn clear(&mut self) {
        self.slot.clear();
    }
}

impl<T: CachedRecord> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CachedRecord> RecordStore<T> {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::default()),
        }
    }

    // A panic while holding the lock cannot leave the slot half-written: every
    // mutation builds its new state first and commits with plain assignments.
    fn read(&self) -> RwLockReadGuard<'_, Slot<T>> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot<T>> {
        self.slot.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the whole collection with a freshly fetched one.
    ///
    /// Records with the absent id are dropped. Duplicate ids keep the position
    /// of their first occurrence and the value of their last one.
    /// Returns the number of records stored.
    pub fn replace_all(&self, records: Vec<T>) -> usize {
        let mut deduped: Vec<T> = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            if record.is_absent() {
                continue;
            }
            match index.get(&record.id()).copied() {
                Some(position) => deduped[position] = record,
                None => {
                    index.insert(record.id(), deduped.len());
                    deduped.push(record);
                }
            }
        }

        let stored = deduped.len();
        let mut slot = self.write();
        slot.records = deduped;
        slot.index = index;
        slot.last_refreshed = Some(Utc::now());
        stored
    }

    /// Copy of the bulk collection and the time it was last refreshed.
    pub fn get_all(&self) -> (Vec<T>, Option<DateTime<Utc>>) {
        let slot = self.read();
        (slot.records.clone(), slot.last_refreshed)
    }

    /// The record with `id`, if cached, and the time the kind was last refreshed.
    pub fn get_by_id(&self, id: RecordId) -> (Option<T>, Option<DateTime<Utc>>) {
        let slot = self.read();
        let record = slot
            .index
            .get(&id)
            .map(|&position| slot.records[position].clone());
        (record, slot.last_refreshed)
    }

    /// Inserts or replaces a single record.
    ///
    /// A record already present keeps its position, a new one is appended.
    /// Nothing happens when either id is the absent sentinel or the two ids
    /// disagree. Returns whether the store changed.
    pub fn merge(&self, id: RecordId, record: T) -> bool {
        if id == ABSENT_ID || record.id() != id {
            return false;
        }

        let mut slot = self.write();
        match slot.index.get(&id).copied() {
            Some(position) => slot.records[position] = record,
            None => {
                let position = slot.records.len();
                slot.records.push(record);
                slot.index.insert(id, position);
            }
        }
        slot.last_refreshed = Some(Utc::now());
        true
    }

    /// Takes the write lock and holds it until the guard is dropped.
    pub fn lock_for_clear(&self) -> ClearGuard<'_, T> {
        ClearGuard { slot: self.write() }
    }

    /// Number of records and last refresh time, read under one lock.
    pub fn summary(&self) -> (usize, Option<DateTime<Utc>>) {
        let slot = self.read();
        (slot.records.len(), slot.last_refreshed)
    }

    #[cfg(test)]
    pub(crate) fn set_last_refreshed(&self, at: Option<DateTime<Utc>>) {
        self.write().last_refreshed = at;
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let slot = self.read();
        slot.index.len() == slot.records.len()
            && slot
                .records
                .iter()
                .enumerate()
                .all(|(position, r)| slot.index.get(&r.id()) == Some(&position))
    }
}
