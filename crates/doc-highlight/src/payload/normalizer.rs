use super::fields::{self, Entry};
use super::types::{GeometryRecord, IndexKey, IndexKind, RawBox};
use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::Value;

/// Where the box of one entry came from.
#[derive(Clone, Copy)]
enum BoxSource<'a> {
    Object(&'a Entry),
    Array(&'a [Value]),
}

/// One payload entry with its key already resolved.
struct Candidate<'a> {
    key: IndexKey,
    entry: &'a Entry,
    source: BoxSource<'a>,
    group_page: Option<u32>,
}

type Strategy = fn(&Candidate<'_>) -> Option<GeometryRecord>;

/// Tried in order for every entry; the first one that yields a record wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("corners", corner_rect),
    ("extent", extent_rect),
    ("edges", edge_rect),
    ("line_object", line_object),
    ("line_tuple", line_tuple),
];

/// Extracts every resolvable record of `kind` from a backend payload.
///
/// Malformed entries are skipped. Output order is not meaningful; look
/// records up by key.
pub fn normalize(payload: &Value, kind: IndexKind) -> Vec<GeometryRecord> {
    collect(payload, kind).into_values().collect()
}

pub(crate) fn collect(payload: &Value, kind: IndexKind) -> IndexMap<u32, GeometryRecord> {
    let mut records = IndexMap::new();
    let mut dropped = 0usize;

    let roots = std::iter::once(payload).chain(
        fields::ENVELOPE_PATHS
            .iter()
            .filter_map(|path| fields::descend(payload, path)),
    );

    for root in roots {
        match root {
            Value::Array(items) => {
                for item in items {
                    ingest(&mut records, &mut dropped, item, kind, None, None);
                }
            }
            Value::Object(map) => match kind {
                IndexKind::Word => collect_words(&mut records, &mut dropped, map),
                IndexKind::Line => collect_lines(&mut records, &mut dropped, map),
            },
            _ => {}
        }
    }

    debug!(
        "Normalized {} {:?} records ({} entries dropped)",
        records.len(),
        kind,
        dropped
    );
    records
}

fn collect_words(records: &mut IndexMap<u32, GeometryRecord>, dropped: &mut usize, root: &Entry) {
    for name in fields::WORD_COLLECTIONS {
        if let Some(Value::Array(items)) = root.get(*name) {
            for item in items {
                ingest(records, dropped, item, IndexKind::Word, None, None);
            }
        }
    }

    for name in fields::PAGE_COLLECTIONS {
        let Some(Value::Array(pages)) = root.get(*name) else {
            continue;
        };
        for page in pages.iter().filter_map(Value::as_object) {
            let group_page = fields::index_field(page, fields::PAGE_GROUP_FIELDS);
            for name in fields::WORD_COLLECTIONS {
                if let Some(Value::Array(items)) = page.get(*name) {
                    for item in items {
                        ingest(records, dropped, item, IndexKind::Word, None, group_page);
                    }
                }
            }
        }
    }
}

fn collect_lines(records: &mut IndexMap<u32, GeometryRecord>, dropped: &mut usize, root: &Entry) {
    for name in fields::LINE_COLLECTIONS {
        match root.get(*name) {
            Some(Value::Array(items)) => {
                for item in items {
                    ingest(records, dropped, item, IndexKind::Line, None, None);
                }
            }
            Some(Value::Object(map)) => collect_keyed_lines(records, dropped, map),
            _ => {}
        }
    }

    collect_keyed_lines(records, dropped, root);
}

/// Lines keyed by their number, e.g. `{"12": {"raw_box": [...]}}`. Keys
/// that are not numbers are ignored.
fn collect_keyed_lines(
    records: &mut IndexMap<u32, GeometryRecord>,
    dropped: &mut usize,
    map: &Entry,
) {
    let mut keyed: Vec<(u32, &Value)> = map
        .iter()
        .filter(|(_, value)| value.is_object())
        .filter_map(|(key, value)| key.trim().parse::<u32>().ok().map(|k| (k, value)))
        .collect();
    keyed.sort_by_key(|(k, _)| *k);

    for (line_number, item) in keyed {
        ingest(records, dropped, item, IndexKind::Line, Some(line_number), None);
    }
}

fn ingest(
    records: &mut IndexMap<u32, GeometryRecord>,
    dropped: &mut usize,
    item: &Value,
    kind: IndexKind,
    fallback_key: Option<u32>,
    group_page: Option<u32>,
) {
    match extract_record(item, kind, fallback_key, group_page) {
        Some(record) => {
            records.insert(record.key.value(), record);
        }
        None => {
            *dropped += 1;
            trace!("Dropped unresolvable {:?} entry: {}", kind, item);
        }
    }
}

fn extract_record(
    item: &Value,
    kind: IndexKind,
    fallback_key: Option<u32>,
    group_page: Option<u32>,
) -> Option<GeometryRecord> {
    let entry = item.as_object()?;
    let key_fields = match kind {
        IndexKind::Word => fields::WORD_KEY_FIELDS,
        IndexKind::Line => fields::LINE_KEY_FIELDS,
    };
    let value = fields::index_field(entry, key_fields).or(fallback_key)?;

    let source = match fields::box_field(entry, fields::BOX_FIELDS) {
        Some(Value::Array(items)) => BoxSource::Array(items),
        Some(Value::Object(map)) => BoxSource::Object(map),
        _ => BoxSource::Object(entry),
    };

    let candidate = Candidate {
        key: IndexKey::new(kind, value),
        entry,
        source,
        group_page,
    };

    STRATEGIES.iter().find_map(|(name, strategy)| {
        let record = strategy(&candidate)?;
        trace!("{} resolved via {} strategy", record.key, name);
        Some(record)
    })
}

/// Page numbers start at 1; the backend occasionally reports page 0.
fn page_number(page: u32) -> u32 {
    page.max(1)
}

/// Page for a top-left rect. Words without any page are unresolvable.
fn rect_page(candidate: &Candidate<'_>) -> Option<u32> {
    let page = fields::index_field(candidate.entry, fields::PAGE_FIELDS)
        .or(candidate.group_page)
        .or_else(|| match candidate.key.kind() {
            IndexKind::Word => None,
            IndexKind::Line => Some(1),
        })?;
    Some(page_number(page))
}

fn rect_record(
    candidate: &Candidate<'_>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Option<GeometryRecord> {
    if width < 0.0 || height < 0.0 {
        return None;
    }
    Some(GeometryRecord {
        key: candidate.key,
        page: rect_page(candidate)?,
        raw_box: RawBox::Rect {
            x,
            y,
            width,
            height,
        },
    })
}

fn object_source<'a>(candidate: &Candidate<'a>) -> Option<&'a Entry> {
    match candidate.source {
        BoxSource::Object(map) => Some(map),
        BoxSource::Array(_) => None,
    }
}

fn corner_rect(candidate: &Candidate<'_>) -> Option<GeometryRecord> {
    let map = object_source(candidate)?;
    let x1 = fields::number_field(map, &["x1"])?;
    let y1 = fields::number_field(map, &["y1"])?;
    let x2 = fields::number_field(map, &["x2"])?;
    let y2 = fields::number_field(map, &["y2"])?;
    rect_record(candidate, x1, y1, x2 - x1, y2 - y1)
}

fn extent_rect(candidate: &Candidate<'_>) -> Option<GeometryRecord> {
    let map = object_source(candidate)?;
    let x = fields::number_field(map, &["x"])?;
    let y = fields::number_field(map, &["y"])?;
    let width = fields::number_field(map, &["width"])?;
    let height = fields::number_field(map, &["height"])?;
    rect_record(candidate, x, y, width, height)
}

fn edge_rect(candidate: &Candidate<'_>) -> Option<GeometryRecord> {
    let map = object_source(candidate)?;
    let left = fields::number_field(map, &["left"])?;
    let top = fields::number_field(map, &["top"])?;
    let right = fields::number_field(map, &["right"])?;
    let bottom = fields::number_field(map, &["bottom"])?;
    rect_record(candidate, left, top, right - left, bottom - top)
}

fn line_object(candidate: &Candidate<'_>) -> Option<GeometryRecord> {
    let map = object_source(candidate)?;
    let base_y = fields::number_field(map, &["base_y", "baseY"])?;
    let line_height = fields::number_field(map, &["height", "line_height", "h"])?;
    let page_height = fields::number_field(candidate.entry, fields::PAGE_HEIGHT_FIELDS)
        .filter(|h| *h > 0.0)
        .or_else(|| fields::number_field(map, fields::PAGE_HEIGHT_FIELDS))?;

    let page = fields::index_field(candidate.entry, fields::PAGE_FIELDS)
        .or_else(|| fields::index_field(map, fields::PAGE_FIELDS))
        .or(candidate.group_page)
        .map_or(1, page_number);

    Some(GeometryRecord {
        key: candidate.key,
        page,
        raw_box: RawBox::LineTuple {
            page,
            base_y,
            line_height,
            page_height,
        },
    })
}

fn line_tuple(candidate: &Candidate<'_>) -> Option<GeometryRecord> {
    let BoxSource::Array(items) = candidate.source else {
        return None;
    };
    if items.len() < 4 {
        return None;
    }

    let tuple_page = fields::index(&items[0]);
    let base_y = fields::number(&items[1])?;
    let line_height = fields::number(&items[2])?;
    let tuple_height = fields::number(&items[3])?;

    let page_height = fields::number_field(candidate.entry, fields::PAGE_HEIGHT_FIELDS)
        .filter(|h| *h > 0.0)
        .unwrap_or(tuple_height);

    let page = fields::index_field(candidate.entry, fields::PAGE_FIELDS)
        .or(candidate.group_page)
        .or(tuple_page)
        .map_or(1, page_number);

    Some(GeometryRecord {
        key: candidate.key,
        page,
        raw_box: RawBox::LineTuple {
            page,
            base_y,
            line_height,
            page_height,
        },
    })
}
