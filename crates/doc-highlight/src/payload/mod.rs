mod fields;
pub mod normalizer;
pub mod types;

pub use normalizer::normalize;
pub use types::*;

use crate::error::{HighlightError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Normalized records of one document, looked up by key.
///
/// Rebuilt wholesale whenever a new payload arrives; never patched in place.
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    words: IndexMap<u32, GeometryRecord>,
    lines: IndexMap<u32, GeometryRecord>,
}

impl GeometryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_payload(payload: &Value) -> Self {
        Self {
            words: normalizer::collect(payload, IndexKind::Word),
            lines: normalizer::collect(payload, IndexKind::Line),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let payload: Value = serde_json::from_str(json)
            .map_err(|e| HighlightError::SerializationError(e.to_string()))?;
        Ok(Self::from_payload(&payload))
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = GeometryRecord>,
    {
        let mut index = Self::default();
        for record in records {
            let table = match record.key.kind() {
                IndexKind::Word => &mut index.words,
                IndexKind::Line => &mut index.lines,
            };
            table.insert(record.key.value(), record);
        }
        index
    }

    pub fn record(&self, key: IndexKey) -> Option<&GeometryRecord> {
        match key {
            IndexKey::Word(v) => self.words.get(&v),
            IndexKey::Line(v) => self.lines.get(&v),
        }
    }

    pub fn records(&self, kind: IndexKind) -> impl Iterator<Item = &GeometryRecord> {
        match kind {
            IndexKind::Word => self.words.values(),
            IndexKind::Line => self.lines.values(),
        }
    }

    pub fn count(&self, kind: IndexKind) -> usize {
        match kind {
            IndexKind::Word => self.words.len(),
            IndexKind::Line => self.lines.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.lines.is_empty()
    }
}

pub fn load_payload(path: &Path) -> Result<GeometryIndex> {
    let json =
        fs::read_to_string(path).map_err(|e| HighlightError::FileReadError(e.to_string()))?;
    GeometryIndex::from_json_str(&json)
}
