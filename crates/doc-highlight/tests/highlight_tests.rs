use doc_highlight::*;
use serde_json::json;
use std::collections::HashSet;
use std::io::Write;
use std::time::{Duration, Instant};

fn word_payload() -> serde_json::Value {
    json!({
        "words": [
            {"index": 0, "bbox": {"x1": 10, "y1": 20, "x2": 50, "y2": 40}, "page": 1},
            {"index": 1, "bbox": {"x1": 52, "y1": 20, "x2": 90, "y2": 40}, "page": 1}
        ]
    })
}

fn single_page_engine(payload: &serde_json::Value, width: f32, height: f32) -> HighlightEngine {
    let mut engine = HighlightEngine::default();
    engine.load_payload_value(payload);
    engine.set_layout(vec![PageViewport::new(1, width, height)], 1.0);
    engine
}

#[test]
fn test_adjacent_words_merge_end_to_end() {
    let mut engine = single_page_engine(&word_payload(), 600.0, 800.0);
    engine.on_click(&[IndexKey::Word(0), IndexKey::Word(1)], Instant::now());

    let frame = engine.frame();
    assert_eq!(frame.active.len(), 1);
    assert_eq!(
        frame.active[0].rect,
        ViewportRect::new(1, 10.0, 20.0, 80.0, 20.0)
    );
}

#[test]
fn test_zoom_above_default_range_scales_with_page() {
    let mut engine = HighlightEngine::default();
    engine.load_payload_value(&word_payload());
    engine.set_layout(vec![PageViewport::new(1, 3600.0, 4800.0).with_scale(6.0)], 6.0);

    let merged = engine.resolve(&[IndexKey::Word(0)]);
    assert_eq!(merged[0].rect, ViewportRect::new(1, 60.0, 120.0, 240.0, 120.0));
}

#[test]
fn test_hover_shows_while_click_resolved_nothing() {
    let mut engine = single_page_engine(&word_payload(), 600.0, 800.0);
    engine.on_click(&[IndexKey::Word(99)], Instant::now());
    engine.on_hover(Some(&[IndexKey::Word(0)]));

    let frame = engine.frame();
    assert!(frame.active.is_empty());
    assert_eq!(frame.preview.len(), 1);
}

#[test]
fn test_line_tuple_end_to_end() {
    let payload = json!({
        "line_metadata": [{"line_number": 4, "page": 1, "raw_box": [1, 700, 20, 792]}]
    });
    let engine = single_page_engine(&payload, 612.0, 792.0);

    let merged = engine.resolve(&[IndexKey::Line(4)]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].rect.y, 72.0);
    assert_eq!(merged[0].rect.height, 20.0);
    assert_eq!(merged[0].rect.width, 612.0);
}

#[test]
fn test_stale_decay_does_not_clear_newer_click() {
    let mut engine = single_page_engine(&word_payload(), 600.0, 800.0);
    let start = Instant::now();
    let decay = engine.config().decay();

    engine.on_click(&[IndexKey::Word(0)], start);
    engine.on_click(&[IndexKey::Word(1)], start + decay / 2);

    engine.tick(start + decay + Duration::from_millis(1));
    let frame = engine.frame();
    assert_eq!(frame.active.len(), 1);
    assert_eq!(frame.active[0].rect.x, 52.0);

    engine.tick(start + decay / 2 + decay);
    assert!(engine.frame().is_empty());
    assert_eq!(engine.state(), SelectionState::Idle);
}

#[test]
fn test_out_of_range_page_does_not_affect_siblings() {
    let payload = json!({
        "words": [
            {"index": 0, "bbox": {"x1": 10, "y1": 20, "x2": 50, "y2": 40}, "page": 1},
            {"index": 1, "bbox": {"x1": 10, "y1": 20, "x2": 50, "y2": 40}, "page": 7}
        ]
    });
    let engine = single_page_engine(&payload, 600.0, 800.0);

    let merged = engine.resolve(&[IndexKey::Word(1), IndexKey::Word(0)]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].rect.page, 1);
}

#[test]
fn test_line_wins_over_words_by_default() {
    let payload = json!({
        "words": [{"index": 0, "bbox": {"x1": 10, "y1": 300, "x2": 50, "y2": 320}, "page": 1}],
        "lines": [{"line_no": 2, "page": 1, "raw_box": [1, 700, 20, 800]}]
    });
    let engine = single_page_engine(&payload, 600.0, 800.0);

    let merged = engine.resolve(&[IndexKey::Word(0), IndexKey::Line(2)]);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].rect, ViewportRect::new(1, 0.0, 80.0, 600.0, 20.0));
}

#[test]
fn test_scroll_to_second_page() {
    #[derive(Default)]
    struct Column {
        offset: Option<(f32, ScrollBehavior)>,
    }

    impl ScrollTarget for Column {
        fn scroll_to(&mut self, y: f32, behavior: ScrollBehavior) {
            self.offset = Some((y, behavior));
        }
    }

    let payload = json!({
        "pages": [
            {"page": 2, "words": [{"index": 5, "bbox": {"x": 10, "y": 200, "width": 40, "height": 12}}]}
        ]
    });
    let mut engine = HighlightEngine::default();
    engine.load_payload_value(&payload);
    engine.set_layout(
        vec![
            PageViewport::new(1, 600.0, 800.0),
            PageViewport::new(2, 600.0, 800.0),
        ],
        1.0,
    );

    let mut column = Column::default();
    engine.scroll_to_keys(&[IndexKey::Word(5)], &mut column);
    assert_eq!(
        column.offset,
        Some((816.0 + 200.0 - 48.0, ScrollBehavior::Smooth))
    );
}

#[test]
fn test_normalizing_twice_gives_same_records() {
    let payload = json!({
        "extraction": {
            "words": [{"index": 3, "bounding_box": {"left": 1, "top": 2, "right": 5, "bottom": 9}, "page": 1}],
            "line_metadata": {
                "1": {"raw_box": [1, 700, 20, 792]},
                "2": {"raw_box": [1, 680, 20, 792]}
            }
        }
    });

    for kind in [IndexKind::Word, IndexKind::Line] {
        let first: HashSet<String> = normalize(&payload, kind)
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect();
        let second: HashSet<String> = normalize(&payload, kind)
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}

#[test]
fn test_load_payload_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", word_payload()).unwrap();

    let mut engine = HighlightEngine::default();
    engine.load_payload(file.path()).unwrap();
    assert_eq!(engine.index().count(IndexKind::Word), 2);
}

#[test]
fn test_load_missing_payload_file() {
    let mut engine = HighlightEngine::default();
    let result = engine.load_payload(std::path::Path::new("/no/such/payload.json"));
    assert!(matches!(result, Err(HighlightError::FileReadError(_))));
}
