//! Domain types shared by stores and the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

use crate::matching::{mutually_contains, normalize_keyword};

pub type DocId = String;

/// Target rank for a pinned document, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(NonZeroU32);

impl Position {
    pub const DEFAULT: Position = Position(NonZeroU32::MIN);

    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    /// Lenient conversion used for stored and operator-supplied values:
    /// anything that is not a positive integer becomes [`Position::DEFAULT`].
    pub fn from_raw(value: i64) -> Self {
        if value <= 0 {
            return Self::DEFAULT;
        }
        let clamped = u32::try_from(value).unwrap_or(u32::MAX);
        Self::new(clamped).unwrap_or(Self::DEFAULT)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operator directive: show `doc_id` at `position` whenever the query
/// matches one of `keywords`.
///
/// - `keywords`: lowercase, non-empty, in the order the operator entered them
///   (duplicates are kept)
/// - `position`: 1-based target rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRecord {
    pub doc_id: DocId,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub position: Position,
}

impl PinRecord {
    pub fn new<I, S>(doc_id: impl Into<DocId>, keywords: I, position: Position) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .filter_map(|k| normalize_keyword(k.as_ref()))
            .collect();
        Self { doc_id: doc_id.into(), keywords, position }
    }

    /// First keyword, in list order, that mutually contains `query`.
    pub fn matching_keyword(&self, query: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|kw| mutually_contains(query, kw))
    }

    pub fn matches(&self, query: &str) -> bool {
        self.matching_keyword(query).is_some()
    }
}

impl fmt::Display for PinRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: pinned for: {} (position {})", self.doc_id, self.keywords.join(", "), self.position)
    }
}

/// A ranked hit for callers without their own hit type.
///
/// `id` is the document identifier the pin records refer to. `score` is
/// carried through untouched; ordering decisions never read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocId,
    pub score: f32,
}

impl SearchHit {
    pub fn new(id: impl Into<DocId>, score: f32) -> Self {
        Self { id: id.into(), score }
    }
}
