use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Word,
    Line,
}

/// A word index or a line number. Values are only unique within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKey {
    Word(u32),
    Line(u32),
}

impl IndexKey {
    pub fn new(kind: IndexKind, value: u32) -> Self {
        match kind {
            IndexKind::Word => IndexKey::Word(value),
            IndexKind::Line => IndexKey::Line(value),
        }
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            IndexKey::Word(_) => IndexKind::Word,
            IndexKey::Line(_) => IndexKind::Line,
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            IndexKey::Word(v) | IndexKey::Line(v) => *v,
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Word(v) => write!(f, "word {}", v),
            IndexKey::Line(v) => write!(f, "line {}", v),
        }
    }
}

/// Bounding box as emitted by the extraction service, in source units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum RawBox {
    /// Top-left origin, unscaled.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Bottom-left origin: `[page, base_y, line_height, page_height]`.
    LineTuple {
        page: u32,
        base_y: f32,
        line_height: f32,
        page_height: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub key: IndexKey,
    pub page: u32,
    #[serde(rename = "box")]
    pub raw_box: RawBox,
}
