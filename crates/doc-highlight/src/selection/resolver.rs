use crate::config::Precedence;
use crate::error::{HighlightError, Result};
use crate::merge::{MergeParams, MergedHighlight, merge_with};
use crate::payload::{GeometryIndex, IndexKey, IndexKind};
use crate::viewport::{PageOffsetTable, PageViewport, ViewportRect, to_viewport_rect};
use indexmap::IndexSet;
use log::debug;

/// Everything a key needs to become a viewport rectangle. Borrowed for the
/// length of one resolve pass so the geometry cannot change underneath it.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub index: &'a GeometryIndex,
    pub viewports: &'a [PageViewport],
    pub offsets: &'a PageOffsetTable,
    pub zoom: f32,
    pub merge_params: MergeParams,
    pub precedence: Precedence,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        index: &'a GeometryIndex,
        viewports: &'a [PageViewport],
        offsets: &'a PageOffsetTable,
        zoom: f32,
    ) -> Self {
        Self {
            index,
            viewports,
            offsets,
            zoom,
            merge_params: MergeParams::default(),
            precedence: Precedence::default(),
        }
    }

    pub fn with_merge_params(mut self, merge_params: MergeParams) -> Self {
        self.merge_params = merge_params;
        self
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Unmerged rectangle for a single key.
    pub fn rect_for(&self, key: IndexKey) -> Option<ViewportRect> {
        let record = self.index.record(key)?;
        to_viewport_rect(record, self.viewports, self.offsets, self.zoom)
    }
}

/// Resolved rectangles before merging, after precedence is applied.
pub fn resolve_rects(keys: &[IndexKey], ctx: &ResolveContext) -> Vec<ViewportRect> {
    let keys: IndexSet<IndexKey> = keys.iter().copied().collect();
    let mut words = Vec::new();
    let mut lines = Vec::new();
    for key in keys {
        let Some(rect) = ctx.rect_for(key) else {
            continue;
        };
        match key.kind() {
            IndexKind::Word => words.push(rect),
            IndexKind::Line => lines.push(rect),
        }
    }

    match ctx.precedence {
        Precedence::LineFirst if !lines.is_empty() => lines,
        Precedence::LineFirst => words,
        Precedence::WordFirst if !words.is_empty() => words,
        Precedence::WordFirst => lines,
        Precedence::Union => {
            lines.extend(words);
            lines
        }
    }
}

/// Resolves a selection into merged highlights. Keys that cannot be placed
/// are skipped without affecting the rest of the selection.
pub fn resolve(keys: &[IndexKey], ctx: &ResolveContext) -> Vec<MergedHighlight> {
    let rects = resolve_rects(keys, ctx);
    let merged = merge_with(&rects, &ctx.merge_params);
    debug!(
        "Resolved {} keys into {} boxes, {} highlights",
        keys.len(),
        rects.len(),
        merged.len()
    );
    merged
}

/// Like [`resolve`], but fails if any key produced no rectangle.
pub fn try_resolve(keys: &[IndexKey], ctx: &ResolveContext) -> Result<Vec<MergedHighlight>> {
    let missing: Vec<IndexKey> = keys
        .iter()
        .copied()
        .collect::<IndexSet<_>>()
        .into_iter()
        .filter(|key| ctx.rect_for(*key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(HighlightError::UnresolvedKeys(missing));
    }
    Ok(resolve(keys, ctx))
}
