//! Configuration write interface used by operators.
//!
//! Accepts the same inputs an edit form would: a document id, the free-text
//! keyword field and an optional position.

use tracing::info;

use pinrank_core::error::{Error, Result};
use pinrank_core::matching::parse_keywords;
use pinrank_core::traits::PinWriter;
use pinrank_core::types::{PinRecord, Position};

pub const DEFAULT_MAX_POSITION: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PinRecord),
    Removed,
    /// Keywords were cleared but the document had no pin.
    Unchanged,
}

pub struct PinEditor<W> {
    writer: W,
    max_position: u32,
}

impl<W: PinWriter> PinEditor<W> {
    pub fn new(writer: W) -> Self { Self { writer, max_position: DEFAULT_MAX_POSITION } }

    pub fn with_max_position(mut self, max_position: u32) -> Self {
        self.max_position = max_position.max(1);
        self
    }

    pub fn writer(&self) -> &W { &self.writer }

    /// Save the pin for `doc_id`.
    ///
    /// Empty keyword text deletes the pin. A missing or non-positive
    /// `position` keeps the current one (1 for a new pin); values above the
    /// configured maximum are rejected.
    pub fn save(&self, doc_id: &str, keywords_text: &str, position: Option<i64>) -> Result<SaveOutcome> {
        let doc_id = doc_id.trim();
        if doc_id.is_empty() {
            return Err(Error::InvalidConfig("document id must not be empty".to_string()));
        }

        let keywords = parse_keywords(keywords_text);
        if keywords.is_empty() {
            return self.clear(doc_id);
        }

        let position = match position {
            Some(p) if p > i64::from(self.max_position) => {
                return Err(Error::InvalidPosition { position: p, max: self.max_position });
            }
            Some(p) if p > 0 => Position::from_raw(p),
            _ => self.writer.get(doc_id)?.map(|r| r.position).unwrap_or_default(),
        };

        let record = PinRecord::new(doc_id, keywords, position);
        self.writer.upsert(record.clone())?;
        info!(doc_id = %record.doc_id, position = record.position.get(), keywords = record.keywords.len(), "saved pin");
        Ok(SaveOutcome::Saved(record))
    }

    pub fn clear(&self, doc_id: &str) -> Result<SaveOutcome> {
        if self.writer.remove(doc_id)? {
            info!(doc_id = %doc_id, "removed pin");
            Ok(SaveOutcome::Removed)
        } else {
            Ok(SaveOutcome::Unchanged)
        }
    }

    pub fn get(&self, doc_id: &str) -> Result<PinRecord> {
        self.writer
            .get(doc_id)?
            .ok_or_else(|| Error::NotFound(format!("no pin for '{doc_id}'")))
    }

    pub fn list(&self) -> Result<Vec<PinRecord>> { self.writer.all() }
}
