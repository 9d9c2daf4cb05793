//! In-process pin store with snapshot reads.
//!
//! Writers build a new map and swap it in; readers clone the current `Arc`
//! and scan it without holding the lock, so every lookup sees one consistent
//! version of the configuration.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use pinrank_core::error::{Error, Result};
use pinrank_core::traits::{PinStore, PinWriter};
use pinrank_core::types::{DocId, PinRecord};

type Snapshot = Arc<BTreeMap<DocId, PinRecord>>;

#[derive(Debug, Default)]
pub struct MemoryPinStore {
    records: RwLock<Snapshot>,
}

impl MemoryPinStore {
    pub fn new() -> Self { Self::default() }

    pub fn from_records<I: IntoIterator<Item = PinRecord>>(records: I) -> Self {
        let map = records.into_iter().map(|r| (r.doc_id.clone(), r)).collect();
        Self { records: RwLock::new(Arc::new(map)) }
    }

    /// The current configuration version.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.records
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| Error::Store("pin store lock poisoned".to_string()))
    }

    /// Replace the whole configuration at once.
    pub fn replace(&self, records: BTreeMap<DocId, PinRecord>) -> Result<()> {
        self.swap(|map| *map = records).map(|_| ())
    }

    pub fn len(&self) -> Result<usize> { Ok(self.snapshot()?.len()) }

    pub fn is_empty(&self) -> Result<bool> { Ok(self.snapshot()?.is_empty()) }

    /// Apply `edit` to a copy of the current map and publish the copy.
    /// Returns the published snapshot.
    pub(crate) fn swap<F>(&self, edit: F) -> Result<Snapshot>
    where
        F: FnOnce(&mut BTreeMap<DocId, PinRecord>),
    {
        let mut guard = self
            .records
            .write()
            .map_err(|_| Error::Store("pin store lock poisoned".to_string()))?;
        let mut next = (**guard).clone();
        edit(&mut next);
        *guard = Arc::new(next);
        Ok(Arc::clone(&*guard))
    }
}

impl PinStore for MemoryPinStore {
    fn find_candidates(&self, query: &str) -> Result<Vec<PinRecord>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.values().filter(|r| r.matches(query)).cloned().collect())
    }
}

impl PinWriter for MemoryPinStore {
    fn get(&self, doc_id: &str) -> Result<Option<PinRecord>> {
        Ok(self.snapshot()?.get(doc_id).cloned())
    }

    fn upsert(&self, record: PinRecord) -> Result<()> {
        self.swap(|map| {
            map.insert(record.doc_id.clone(), record);
        })
        .map(|_| ())
    }

    fn remove(&self, doc_id: &str) -> Result<bool> {
        let mut removed = false;
        self.swap(|map| removed = map.remove(doc_id).is_some())?;
        Ok(removed)
    }

    fn all(&self) -> Result<Vec<PinRecord>> {
        Ok(self.snapshot()?.values().cloned().collect())
    }
}
