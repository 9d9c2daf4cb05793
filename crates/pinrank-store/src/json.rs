//! File-backed pin store: one JSON object keyed by document id, each value
//! holding the keyword list and the target position.
//!
//! ```json
//! { "doc-42": { "keywords": ["leddy 60", "aquael tank"], "position": 1 } }
//! ```
//!
//! Reads are served from an in-memory snapshot. Each write rewrites the file
//! through a temp file + rename so readers of the file never see half a map.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use pinrank_core::error::{Error, Result};
use pinrank_core::matching::parse_keywords;
use pinrank_core::traits::{PinStore, PinWriter};
use pinrank_core::types::{DocId, PinRecord, Position};

use crate::memory::MemoryPinStore;

#[derive(Debug, Serialize, Deserialize)]
struct StoredPin {
    #[serde(default)]
    keywords: StoredKeywords,
    #[serde(default)]
    position: Value,
}

/// Older files kept the raw comma-separated editor text.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredKeywords {
    List(Vec<String>),
    Text(String),
}

impl Default for StoredKeywords {
    fn default() -> Self { Self::List(Vec::new()) }
}

impl StoredPin {
    fn from_record(record: &PinRecord) -> Self {
        Self {
            keywords: StoredKeywords::List(record.keywords.clone()),
            position: Value::from(record.position.get()),
        }
    }

    fn into_record(self, doc_id: DocId) -> PinRecord {
        let position = decode_position(&doc_id, &self.position);
        match self.keywords {
            StoredKeywords::List(list) => PinRecord::new(doc_id, list, position),
            StoredKeywords::Text(text) => PinRecord::new(doc_id, parse_keywords(&text), position),
        }
    }
}

/// Malformed positions are absorbed as the default rather than dropping the pin.
fn decode_position(doc_id: &str, raw: &Value) -> Position {
    let parsed = match raw {
        Value::Null => return Position::DEFAULT,
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => Position::from_raw(n),
        _ => {
            let err = Error::MalformedRecord {
                doc_id: doc_id.to_string(),
                reason: format!("position {raw} is not a positive integer"),
            };
            warn!(error = %err, "using default pin position");
            Position::DEFAULT
        }
    }
}

pub struct JsonPinStore {
    path: PathBuf,
    inner: MemoryPinStore,
    write_lock: Mutex<()>,
}

impl JsonPinStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = read_records(&path)?;
        debug!(path = %path.display(), records = records.len(), "opened pin store");
        Ok(Self { path, inner: MemoryPinStore::from_records(records.into_values()), write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Re-read the file, picking up writes made by other processes.
    pub fn reload(&self) -> Result<()> {
        let _guard = self.lock_writes()?;
        let records = read_records(&self.path)?;
        self.inner.replace(records)
    }

    fn lock_writes(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| Error::Store("pin store write lock poisoned".to_string()))
    }

    /// Persist the edited map first, then publish it to readers.
    fn commit<F, T>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut BTreeMap<DocId, PinRecord>) -> T,
    {
        let _guard = self.lock_writes()?;
        let mut next = (*self.inner.snapshot()?).clone();
        let out = edit(&mut next);
        write_records(&self.path, &next)?;
        self.inner.replace(next)?;
        Ok(out)
    }
}

fn read_records(path: &Path) -> Result<BTreeMap<DocId, PinRecord>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let stored: BTreeMap<DocId, StoredPin> = serde_json::from_str(&text)
        .map_err(|e| Error::Store(format!("{}: {}", path.display(), e)))?;
    let mut records = BTreeMap::new();
    for (doc_id, pin) in stored {
        let record = pin.into_record(doc_id.clone());
        if record.keywords.is_empty() {
            warn!(doc_id = %doc_id, "skipping pin record without keywords");
            continue;
        }
        records.insert(doc_id, record);
    }
    Ok(records)
}

fn write_records(path: &Path, records: &BTreeMap<DocId, PinRecord>) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    let stored: BTreeMap<&str, StoredPin> =
        records.iter().map(|(id, r)| (id.as_str(), StoredPin::from_record(r))).collect();
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    serde_json::to_writer_pretty(&mut tmp, &stored)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

impl PinStore for JsonPinStore {
    fn find_candidates(&self, query: &str) -> Result<Vec<PinRecord>> {
        self.inner.find_candidates(query)
    }
}

impl PinWriter for JsonPinStore {
    fn get(&self, doc_id: &str) -> Result<Option<PinRecord>> { self.inner.get(doc_id) }

    fn upsert(&self, record: PinRecord) -> Result<()> {
        self.commit(|map| {
            map.insert(record.doc_id.clone(), record);
        })
    }

    fn remove(&self, doc_id: &str) -> Result<bool> {
        self.commit(|map| map.remove(doc_id).is_some())
    }

    fn all(&self) -> Result<Vec<PinRecord>> { self.inner.all() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_decoding_is_lenient() {
        assert_eq!(decode_position("d", &Value::from(3)), Position::from_raw(3));
        assert_eq!(decode_position("d", &Value::from("7")), Position::from_raw(7));
        assert_eq!(decode_position("d", &Value::from(0)), Position::DEFAULT);
        assert_eq!(decode_position("d", &Value::from(-2)), Position::DEFAULT);
        assert_eq!(decode_position("d", &Value::from("abc")), Position::DEFAULT);
        assert_eq!(decode_position("d", &Value::from(2.5)), Position::DEFAULT);
        assert_eq!(decode_position("d", &Value::Null), Position::DEFAULT);
    }
}
