/// Vertical gap the renderer leaves between stacked pages. Must match the renderer.
pub const PAGE_MARGIN: f32 = 16.0;

/// Distance kept between the viewport top and a scrolled-to highlight.
pub const SCROLL_LEAD_IN: f32 = 48.0;

pub const ACTIVE_DECAY_MS: u64 = 1500;

pub const LINE_ALIGNMENT_RATIO: f32 = 0.6;
pub const MERGE_GAP_RATIO: f32 = 0.5;

pub const DEFAULT_ZOOM: f32 = 1.0;

pub const TOKEN_LENGTH: usize = 16;

#[cfg(feature = "egui")]
pub mod overlay {
    use egui::Color32;

    pub const PREVIEW_FILL: Color32 = Color32::from_rgba_premultiplied(40, 90, 160, 40);
    pub const ACTIVE_FILL: Color32 = Color32::from_rgba_premultiplied(200, 150, 0, 90);
    pub const ACTIVE_STROKE: Color32 = Color32::from_rgb(255, 190, 0);
    pub const ACTIVE_STROKE_WIDTH: f32 = 1.5;
}
