use crate::config::HighlightConfig;
use crate::error::{HighlightError, Result};
use crate::ids::ActiveToken;
use crate::merge::MergedHighlight;
use crate::payload::{self, GeometryIndex, IndexKey, IndexKind};
use crate::scroll::{ScrollCoordinator, ScrollTarget};
use crate::selection::{
    DecayTicket, ResolveContext, SelectionController, SelectionState, resolve, try_resolve,
};
use crate::viewport::{PageOffsetTable, PageViewport, to_viewport_rect};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Rectangles the drawing layer should show right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighlightFrame {
    pub preview: Vec<MergedHighlight>,
    pub active: Vec<MergedHighlight>,
}

impl HighlightFrame {
    pub fn is_empty(&self) -> bool {
        self.preview.is_empty() && self.active.is_empty()
    }
}

pub type FrameCallback = Box<dyn FnMut(&HighlightFrame)>;

/// Owns one document's geometry and the current selection, and turns
/// interaction events into highlight frames.
///
/// Frames are never patched: every payload, layout or selection change
/// recomputes them from the current inputs.
pub struct HighlightEngine {
    config: HighlightConfig,
    index: GeometryIndex,
    viewports: Arc<[PageViewport]>,
    offsets: PageOffsetTable,
    zoom: f32,
    controller: SelectionController,
    scroll: ScrollCoordinator,
    on_frame: Option<FrameCallback>,
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::with_valid_config(HighlightConfig::default())
    }
}

impl HighlightEngine {
    pub fn new(config: HighlightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: HighlightConfig) -> Self {
        let viewports: Arc<[PageViewport]> = Arc::from(Vec::new());
        Self {
            offsets: PageOffsetTable::new(&viewports, config.page_margin),
            zoom: crate::constants::DEFAULT_ZOOM,
            controller: SelectionController::new(config.decay()),
            scroll: ScrollCoordinator::new(config.scroll_lead_in),
            index: GeometryIndex::new(),
            viewports,
            config,
            on_frame: None,
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn index(&self) -> &GeometryIndex {
        &self.index
    }

    pub fn viewports(&self) -> &[PageViewport] {
        &self.viewports
    }

    pub fn offsets(&self) -> &PageOffsetTable {
        &self.offsets
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn state(&self) -> SelectionState {
        self.controller.state()
    }

    pub fn set_on_frame<F>(&mut self, callback: F)
    where
        F: FnMut(&HighlightFrame) + 'static,
    {
        self.on_frame = Some(Box::new(callback));
    }

    pub fn load_payload(&mut self, path: &Path) -> Result<()> {
        let index = payload::load_payload(path)?;
        info!("Loaded payload from {}", path.display());
        self.set_index(index);
        Ok(())
    }

    pub fn load_payload_str(&mut self, json: &str) -> Result<()> {
        let index = GeometryIndex::from_json_str(json)?;
        self.set_index(index);
        Ok(())
    }

    pub fn load_payload_value(&mut self, payload: &Value) {
        self.set_index(GeometryIndex::from_payload(payload));
    }

    /// Swaps in a new document. The previous selection refers to the old
    /// document and is dropped.
    pub fn set_index(&mut self, index: GeometryIndex) {
        debug!(
            "Geometry index replaced: {} words, {} lines",
            index.count(IndexKind::Word),
            index.count(IndexKind::Line)
        );
        self.index = index;
        self.controller.clear();
        self.emit_frame();
    }

    /// Installs a new layout snapshot from the renderer. `zoom` is taken as
    /// reported; a non-finite or non-positive zoom draws no object rects.
    pub fn set_layout<V>(&mut self, viewports: V, zoom: f32)
    where
        V: Into<Arc<[PageViewport]>>,
    {
        self.viewports = viewports.into();
        self.offsets = PageOffsetTable::new(&self.viewports, self.config.page_margin);
        if !zoom.is_finite() || zoom <= 0.0 {
            warn!("Unusable zoom {}, object highlights hidden", zoom);
        }
        self.zoom = zoom;
        debug!(
            "Layout: {} pages at zoom {:.2}",
            self.viewports.len(),
            self.zoom
        );
        self.emit_frame();
    }

    pub fn on_hover(&mut self, keys: Option<&[IndexKey]>) {
        self.controller.on_hover(keys);
        self.emit_frame();
    }

    pub fn on_click(&mut self, keys: &[IndexKey], now: Instant) -> Option<DecayTicket> {
        let ticket = self.controller.on_click(keys, now);
        self.emit_frame();
        ticket
    }

    pub fn on_decay(&mut self, token: &ActiveToken) -> bool {
        let cleared = self.controller.on_decay(token);
        if cleared {
            self.emit_frame();
        }
        cleared
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        let cleared = self.controller.tick(now);
        if cleared {
            self.emit_frame();
        }
        cleared
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    pub fn clear_selection(&mut self) {
        self.controller.clear();
        self.emit_frame();
    }

    pub fn scroll_to_keys(&self, keys: &[IndexKey], target: &mut dyn ScrollTarget) -> Option<f32> {
        self.scroll.scroll_to_keys(keys, &self.context(), target)
    }

    pub fn scroll_offset_for(&self, keys: &[IndexKey]) -> Option<f32> {
        self.scroll.target_offset(keys, &self.context())
    }

    /// Top edge of `page` in the stacked column.
    pub fn page_offset(&self, page: u32) -> Result<f32> {
        self.offsets
            .offset_for_page(&self.viewports, page)
            .ok_or(HighlightError::PageOutOfRange(page))
    }

    /// Key of the `kind` record under a viewport-space point. When boxes
    /// overlap the smallest one wins.
    pub fn hit_test(&self, x: f32, y: f32, kind: IndexKind) -> Option<IndexKey> {
        self.index
            .records(kind)
            .filter_map(|record| {
                to_viewport_rect(record, &self.viewports, &self.offsets, self.zoom)
                    .filter(|rect| rect.contains(x, y))
                    .map(|rect| (record.key, rect.area()))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key)
    }

    pub fn resolve(&self, keys: &[IndexKey]) -> Vec<MergedHighlight> {
        resolve(keys, &self.context())
    }

    /// Like [`HighlightEngine::resolve`], but fails on any key that produced
    /// no rectangle.
    pub fn try_resolve(&self, keys: &[IndexKey]) -> Result<Vec<MergedHighlight>> {
        try_resolve(keys, &self.context())
    }

    /// The hover preview is hidden only while the click produced at least
    /// one rectangle.
    pub fn frame(&self) -> HighlightFrame {
        let ctx = self.context();
        let active = resolve(&self.controller.visible_active_keys(), &ctx);
        let preview = if active.is_empty() {
            resolve(&self.controller.preview_keys(), &ctx)
        } else {
            Vec::new()
        };
        HighlightFrame { preview, active }
    }

    fn context(&self) -> ResolveContext<'_> {
        ResolveContext::new(&self.index, &self.viewports, &self.offsets, self.zoom)
            .with_merge_params(self.config.merge_params())
            .with_precedence(self.config.precedence)
    }

    fn emit_frame(&mut self) {
        if self.on_frame.is_none() {
            return;
        }
        let frame = self.frame();
        if let Some(callback) = self.on_frame.as_mut() {
            callback(&frame);
        }
    }
}
