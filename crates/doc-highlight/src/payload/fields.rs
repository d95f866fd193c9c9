//! Field lookups over loosely typed payload entries.
//!
//! The extraction service has renamed fields across versions, so every
//! lookup takes a list of accepted names and returns the first usable value.

use serde_json::{Map, Value};

pub(crate) type Entry = Map<String, Value>;

pub(crate) const WORD_KEY_FIELDS: &[&str] = &["index", "word_index"];
pub(crate) const LINE_KEY_FIELDS: &[&str] = &["line_number", "line_no", "line", "line_index"];
pub(crate) const BOX_FIELDS: &[&str] = &["bbox", "bounding_box", "raw_box", "raw", "box"];
pub(crate) const PAGE_FIELDS: &[&str] = &["page"];
pub(crate) const PAGE_GROUP_FIELDS: &[&str] = &["page", "index"];
pub(crate) const PAGE_HEIGHT_FIELDS: &[&str] = &["page_height", "pageHeight"];

pub(crate) const WORD_COLLECTIONS: &[&str] = &["words"];
pub(crate) const LINE_COLLECTIONS: &[&str] = &["line_metadata", "lines"];
pub(crate) const PAGE_COLLECTIONS: &[&str] = &["pages"];
pub(crate) const ENVELOPE_PATHS: &[&[&str]] = &[
    &["boundingBoxes"],
    &["bounding_boxes"],
    &["extraction"],
    &["extraction", "extraction"],
];

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// First non-blank value among `names`.
pub(crate) fn first_present<'a>(entry: &'a Entry, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| entry.get(*name))
        .find(|value| !is_blank(value))
}

/// First non-blank box container under `names`. Scalars are skipped so a
/// placeholder like `"bbox": "n/a"` does not hide a later usable field.
pub(crate) fn box_field<'a>(entry: &'a Entry, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| entry.get(*name))
        .filter(|value| value.is_object() || value.is_array())
        .find(|value| !is_blank(value))
}

/// Finite number, accepting numeric strings.
pub(crate) fn number(value: &Value) -> Option<f32> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed as f32)
}

/// Non-negative integral value that fits in `u32`.
pub(crate) fn index(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => v as f64,
            None => n.as_f64()?,
        },
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !parsed.is_finite() || parsed < 0.0 || parsed.fract() != 0.0 || parsed > f64::from(u32::MAX)
    {
        return None;
    }
    Some(parsed as u32)
}

pub(crate) fn number_field(entry: &Entry, names: &[&str]) -> Option<f32> {
    names
        .iter()
        .filter_map(|name| entry.get(*name))
        .find_map(number)
}

pub(crate) fn index_field(entry: &Entry, names: &[&str]) -> Option<u32> {
    first_present(entry, names).and_then(index)
}

/// Follows a path of object keys from `root`.
pub(crate) fn descend<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.get(*key))
}
