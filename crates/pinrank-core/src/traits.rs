use std::sync::Arc;

use crate::error::Result;
use crate::types::{DocId, PinRecord, SearchHit};

/// Anything that carries a document identifier. The resolver reads nothing
/// else from a hit, so callers keep whatever wrapper they rank with.
pub trait Identified {
    fn doc_id(&self) -> &str;
}

impl Identified for str {
    fn doc_id(&self) -> &str { self }
}

impl Identified for String {
    fn doc_id(&self) -> &str { self }
}

impl Identified for SearchHit {
    fn doc_id(&self) -> &str { &self.id }
}

impl<T> Identified for (DocId, T) {
    fn doc_id(&self) -> &str { &self.0 }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn doc_id(&self) -> &str { (**self).doc_id() }
}

impl<T: Identified + ?Sized> Identified for Box<T> {
    fn doc_id(&self) -> &str { (**self).doc_id() }
}

impl<T: Identified + ?Sized> Identified for Arc<T> {
    fn doc_id(&self) -> &str { (**self).doc_id() }
}

/// Read side of pin configuration.
///
/// `find_candidates` must return every record with at least one keyword that
/// mutually contains `query`. Extra records are fine (the resolver re-checks
/// every keyword); missing ones are a bug.
pub trait PinStore: Send + Sync {
    fn find_candidates(&self, query: &str) -> Result<Vec<PinRecord>>;
}

impl<S: PinStore + ?Sized> PinStore for Arc<S> {
    fn find_candidates(&self, query: &str) -> Result<Vec<PinRecord>> { (**self).find_candidates(query) }
}

impl<S: PinStore + ?Sized> PinStore for Box<S> {
    fn find_candidates(&self, query: &str) -> Result<Vec<PinRecord>> { (**self).find_candidates(query) }
}

/// Write side, used by the pin editor.
pub trait PinWriter: Send + Sync {
    fn get(&self, doc_id: &str) -> Result<Option<PinRecord>>;
    fn upsert(&self, record: PinRecord) -> Result<()>;
    /// Returns `false` when there was nothing to remove.
    fn remove(&self, doc_id: &str) -> Result<bool>;
    /// All records, ordered by document id.
    fn all(&self) -> Result<Vec<PinRecord>>;
}

impl<W: PinWriter + ?Sized> PinWriter for Arc<W> {
    fn get(&self, doc_id: &str) -> Result<Option<PinRecord>> { (**self).get(doc_id) }
    fn upsert(&self, record: PinRecord) -> Result<()> { (**self).upsert(record) }
    fn remove(&self, doc_id: &str) -> Result<bool> { (**self).remove(doc_id) }
    fn all(&self) -> Result<Vec<PinRecord>> { (**self).all() }
}
