use crate::constants::{LINE_ALIGNMENT_RATIO, MERGE_GAP_RATIO};
use crate::ids::HighlightId;
use crate::viewport::ViewportRect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A coalesced highlight region, ready for the drawing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedHighlight {
    pub id: HighlightId,
    #[serde(flatten)]
    pub rect: ViewportRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeParams {
    /// Max vertical center distance, as a share of the taller box.
    pub line_alignment_ratio: f32,
    /// Max horizontal gap, as a share of the shorter box's height.
    pub gap_ratio: f32,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            line_alignment_ratio: LINE_ALIGNMENT_RATIO,
            gap_ratio: MERGE_GAP_RATIO,
        }
    }
}

/// Two boxes merge when they sit on the same visual line and either overlap
/// horizontally or leave only a small gap.
pub fn mergeable(a: &ViewportRect, b: &ViewportRect, params: &MergeParams) -> bool {
    if a.page != b.page {
        return false;
    }
    let aligned = (a.center_y() - b.center_y()).abs()
        <= a.height.max(b.height) * params.line_alignment_ratio;
    let gap = a.x.max(b.x) - a.right().min(b.right());
    aligned && gap <= a.height.min(b.height) * params.gap_ratio
}

pub fn merge(boxes: &[ViewportRect]) -> Vec<MergedHighlight> {
    merge_with(boxes, &MergeParams::default())
}

/// Coalesces boxes into the smallest set of contiguous regions, page by page.
///
/// Pages come out in ascending order. Within a page the order follows the
/// top-to-bottom, left-to-right sort of the input, each region taking the
/// slot of its first member.
pub fn merge_with(boxes: &[ViewportRect], params: &MergeParams) -> Vec<MergedHighlight> {
    let mut pages: BTreeMap<u32, Vec<ViewportRect>> = BTreeMap::new();
    for rect in boxes {
        pages.entry(rect.page).or_default().push(*rect);
    }

    let mut merged = Vec::with_capacity(boxes.len());
    for (page, mut page_boxes) in pages {
        page_boxes.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        let regions = merge_page(page_boxes, params);
        merged.extend(
            regions
                .into_iter()
                .enumerate()
                .map(|(ordinal, rect)| MergedHighlight {
                    id: HighlightId::for_page(page, ordinal),
                    rect,
                }),
        );
    }
    merged
}

/// Runs to a fixed point. Every successful merge removes one box, so this
/// terminates after at most `len - 1` merges.
fn merge_page(mut boxes: Vec<ViewportRect>, params: &MergeParams) -> Vec<ViewportRect> {
    while let Some((keep, absorb)) = find_mergeable_pair(&boxes, params) {
        let absorbed = boxes.remove(absorb);
        boxes[keep] = boxes[keep].union(&absorbed);
    }
    boxes
}

fn find_mergeable_pair(boxes: &[ViewportRect], params: &MergeParams) -> Option<(usize, usize)> {
    (0..boxes.len()).find_map(|i| {
        (i + 1..boxes.len())
            .find(|&j| mergeable(&boxes[i], &boxes[j], params))
            .map(|j| (i, j))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rects(highlights: &[MergedHighlight]) -> Vec<ViewportRect> {
        highlights.iter().map(|h| h.rect).collect()
    }

    fn sorted(mut boxes: Vec<ViewportRect>) -> Vec<ViewportRect> {
        boxes.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(a.y.total_cmp(&b.y))
                .then(a.x.total_cmp(&b.x))
        });
        boxes
    }

    #[test]
    fn test_adjacent_words_merge_into_union() {
        let boxes = vec![
            ViewportRect::new(1, 10.0, 20.0, 40.0, 20.0),
            ViewportRect::new(1, 52.0, 20.0, 38.0, 20.0),
        ];
        let merged = merge(&boxes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rect, ViewportRect::new(1, 10.0, 20.0, 80.0, 20.0));
    }

    #[test]
    fn test_gap_larger_than_half_height_stays_split() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 15.1, 0.0, 10.0, 10.0),
        ];
        assert_eq!(merge(&boxes).len(), 2);
    }

    #[test]
    fn test_gap_threshold_is_inclusive() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 15.0, 0.0, 10.0, 10.0),
        ];
        assert_eq!(merge(&boxes).len(), 1);
    }

    #[test]
    fn test_different_lines_do_not_merge() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 72.0, 600.0, 20.0),
            ViewportRect::new(1, 0.0, 92.0, 600.0, 20.0),
        ];
        let merged = merge(&boxes);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].rect.y, 72.0);
        assert_eq!(merged[1].rect.y, 92.0);
    }

    #[test]
    fn test_slight_baseline_jitter_still_merges() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 100.0, 30.0, 20.0),
            ViewportRect::new(1, 32.0, 104.0, 30.0, 18.0),
        ];
        let merged = merge(&boxes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rect, ViewportRect::new(1, 0.0, 100.0, 62.0, 22.0));
    }

    #[test]
    fn test_overlapping_boxes_merge() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 0.0, 50.0, 10.0),
            ViewportRect::new(1, 20.0, 1.0, 50.0, 10.0),
        ];
        assert_eq!(merge(&boxes).len(), 1);
    }

    #[test]
    fn test_merge_is_transitive() {
        let boxes = vec![
            ViewportRect::new(1, 24.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 0.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 12.0, 0.0, 10.0, 10.0),
        ];
        let merged = merge(&boxes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rect, ViewportRect::new(1, 0.0, 0.0, 34.0, 10.0));
    }

    #[test]
    fn test_never_merges_across_pages() {
        let boxes = vec![
            ViewportRect::new(2, 0.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 0.0, 0.0, 10.0, 10.0),
        ];
        let merged = merge(&boxes);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].rect.page, 1);
        assert_eq!(merged[1].rect.page, 2);
        assert_eq!(merged[0].id.as_str(), "hl-p1-0");
        assert_eq!(merged[1].id.as_str(), "hl-p2-0");
    }

    #[test]
    fn test_empty_input() {
        assert!(merge(&[]).is_empty());
    }

    #[test]
    fn test_single_box_is_unchanged() {
        let rect = ViewportRect::new(3, 1.0, 2.0, 3.0, 4.0);
        let merged = merge(&[rect]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].rect, rect);
        assert_eq!(merged[0].id.as_str(), "hl-p3-0");
    }

    #[test]
    fn test_output_is_top_to_bottom_then_left_to_right() {
        let boxes = vec![
            ViewportRect::new(1, 300.0, 50.0, 10.0, 10.0),
            ViewportRect::new(1, 0.0, 50.0, 10.0, 10.0),
            ViewportRect::new(1, 0.0, 10.0, 10.0, 10.0),
        ];
        let merged = rects(&merge(&boxes));
        assert_eq!(merged[0], ViewportRect::new(1, 0.0, 10.0, 10.0, 10.0));
        assert_eq!(merged[1], ViewportRect::new(1, 0.0, 50.0, 10.0, 10.0));
        assert_eq!(merged[2], ViewportRect::new(1, 300.0, 50.0, 10.0, 10.0));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 12.0, 1.0, 10.0, 10.0),
            ViewportRect::new(1, 100.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 0.0, 40.0, 200.0, 12.0),
            ViewportRect::new(2, 5.0, 5.0, 5.0, 5.0),
        ];
        let once = rects(&merge(&boxes));
        let twice = rects(&merge(&once));
        assert_eq!(sorted(once), sorted(twice));
    }

    #[test]
    fn test_custom_params_tighten_gap() {
        let boxes = vec![
            ViewportRect::new(1, 0.0, 0.0, 10.0, 10.0),
            ViewportRect::new(1, 12.0, 0.0, 10.0, 10.0),
        ];
        let params = MergeParams {
            line_alignment_ratio: 0.6,
            gap_ratio: 0.1,
        };
        assert_eq!(merge_with(&boxes, &params).len(), 2);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let merged = merge(&[ViewportRect::new(1, 1.0, 2.0, 3.0, 4.0)]);
        let json = serde_json::to_value(&merged[0]).unwrap();
        assert_eq!(json["id"], "hl-p1-0");
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["page"], 1);
    }
}
