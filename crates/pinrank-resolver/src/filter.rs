//! Post-ranking hook: a filter receives the ranked hits and the normalized
//! query once per search and returns the hits to paginate and render.

use pinrank_core::traits::{Identified, PinStore};

use crate::PinResolver;

pub trait HitsFilter<H>: Send + Sync {
    fn filter(&self, hits: Vec<H>, query: &str) -> Vec<H>;
}

impl<S: PinStore, H: Identified> HitsFilter<H> for PinResolver<S> {
    fn filter(&self, hits: Vec<H>, query: &str) -> Vec<H> {
        self.apply(query, hits)
    }
}

impl<H, F> HitsFilter<H> for F
where
    F: Fn(Vec<H>, &str) -> Vec<H> + Send + Sync,
{
    fn filter(&self, hits: Vec<H>, query: &str) -> Vec<H> {
        self(hits, query)
    }
}

/// Filters run in insertion order, each one seeing the previous output.
pub struct FilterChain<H> {
    filters: Vec<Box<dyn HitsFilter<H>>>,
}

impl<H> Default for FilterChain<H> {
    fn default() -> Self { Self { filters: Vec::new() } }
}

impl<H> FilterChain<H> {
    pub fn new() -> Self { Self::default() }

    pub fn with<F: HitsFilter<H> + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn push<F: HitsFilter<H> + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize { self.filters.len() }

    pub fn is_empty(&self) -> bool { self.filters.is_empty() }

    pub fn run(&self, hits: Vec<H>, query: &str) -> Vec<H> {
        self.filters.iter().fold(hits, |hits, f| f.filter(hits, query))
    }
}

impl<H> HitsFilter<H> for FilterChain<H> {
    fn filter(&self, hits: Vec<H>, query: &str) -> Vec<H> {
        self.run(hits, query)
    }
}
