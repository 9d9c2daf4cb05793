//! pinrank-resolver
//!
//! Moves pinned documents to their configured positions in a ranked hit list.
//! Pinned hits come first in ascending position order, followed by every other
//! hit in its original relative order. Pinning is best effort: when the store
//! cannot answer, the hits are returned as they came.

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashMap;

use tracing::{debug, warn};

use pinrank_core::matching::normalize_query;
use pinrank_core::traits::{Identified, PinStore};
use pinrank_core::types::{DocId, PinRecord, Position};

pub mod filter;

pub use filter::{FilterChain, HitsFilter};

/// A hit that took its pinned slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedHit {
    pub doc_id: DocId,
    pub position: Position,
    /// The keyword that fired.
    pub keyword: String,
    /// Index of the hit in the input.
    pub original_index: usize,
}

/// A hit whose pin lost a position collision and stayed with the regular hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemotedHit {
    pub doc_id: DocId,
    pub position: Position,
    /// The document that already held the slot.
    pub held_by: DocId,
}

/// What happened when the store was consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Empty query or empty hit list; the store was not called.
    Skipped,
    NoCandidates,
    Candidates(usize),
    /// The store failed or timed out; the hits passed through unchanged.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Resolution<H> {
    pub hits: Vec<H>,
    /// Ordered by position.
    pub pinned: Vec<PinnedHit>,
    pub demoted: Vec<DemotedHit>,
    pub lookup: Lookup,
}

impl<H> Resolution<H> {
    fn unchanged(hits: Vec<H>, lookup: Lookup) -> Self {
        Self { hits, pinned: Vec::new(), demoted: Vec::new(), lookup }
    }

    pub fn into_hits(self) -> Vec<H> { self.hits }

    pub fn is_reordered(&self) -> bool { !self.pinned.is_empty() }
}

pub struct PinResolver<S> {
    store: S,
}

impl<S: PinStore> PinResolver<S> {
    pub fn new(store: S) -> Self { Self { store } }

    pub fn store(&self) -> &S { &self.store }

    /// Reorder `hits` for `query`. The result is always a permutation of the
    /// input.
    pub fn apply<H: Identified>(&self, query: &str, hits: Vec<H>) -> Vec<H> {
        self.resolve(query, hits).into_hits()
    }

    /// Same as [`PinResolver::apply`] but keeps the classification details.
    pub fn resolve<H: Identified>(&self, query: &str, hits: Vec<H>) -> Resolution<H> {
        let query = normalize_query(query);
        if query.is_empty() || hits.is_empty() {
            return Resolution::unchanged(hits, Lookup::Skipped);
        }

        let candidates = match self.store.find_candidates(&query) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, query = %query, "pin lookup failed; keeping original order");
                return Resolution::unchanged(hits, Lookup::Failed(e.to_string()));
            }
        };
        if candidates.is_empty() {
            return Resolution::unchanged(hits, Lookup::NoCandidates);
        }

        // The first record the store returned for a document is the one used.
        let mut by_doc: HashMap<&str, &PinRecord> = HashMap::with_capacity(candidates.len());
        for record in &candidates {
            by_doc.entry(record.doc_id.as_str()).or_insert(record);
        }

        let mut slots: BTreeMap<Position, H> = BTreeMap::new();
        let mut regular = Vec::with_capacity(hits.len());
        let mut pinned = Vec::new();
        let mut demoted = Vec::new();

        for (index, hit) in hits.into_iter().enumerate() {
            let claim = by_doc.get(hit.doc_id()).and_then(|record| {
                record.matching_keyword(&query).map(|kw| (record.position, kw.to_string()))
            });
            let Some((position, keyword)) = claim else {
                regular.push(hit);
                continue;
            };
            match slots.entry(position) {
                Entry::Vacant(slot) => {
                    pinned.push(PinnedHit { doc_id: hit.doc_id().to_string(), position, keyword, original_index: index });
                    slot.insert(hit);
                }
                Entry::Occupied(slot) => {
                    demoted.push(DemotedHit {
                        doc_id: hit.doc_id().to_string(),
                        position,
                        held_by: slot.get().doc_id().to_string(),
                    });
                    regular.push(hit);
                }
            }
        }

        pinned.sort_by_key(|p| p.position);
        debug!(
            query = %query,
            candidates = candidates.len(),
            pinned = pinned.len(),
            demoted = demoted.len(),
            "applied pins"
        );

        let hits = slots.into_values().chain(regular).collect();
        Resolution { hits, pinned, demoted, lookup: Lookup::Candidates(candidates.len()) }
    }
}
