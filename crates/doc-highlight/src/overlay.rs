use crate::constants::overlay::*;
use crate::engine::HighlightFrame;
use crate::scroll::{ScrollBehavior, ScrollTarget};
use crate::viewport::ViewportRect;
use egui::{Painter, Pos2, Rect, Shape, Stroke, StrokeKind, pos2, vec2};

/// Places a viewport rectangle on screen. `origin` is the top-left of the
/// page column, `scroll_y` how far it is scrolled.
pub fn to_screen_rect(rect: &ViewportRect, origin: Pos2, scroll_y: f32) -> Rect {
    Rect::from_min_size(
        pos2(origin.x + rect.x, origin.y + rect.y - scroll_y),
        vec2(rect.width, rect.height),
    )
}

/// Inverse of [`to_screen_rect`] for a single point, for hit testing.
pub fn to_viewport_pos(screen: Pos2, origin: Pos2, scroll_y: f32) -> (f32, f32) {
    (screen.x - origin.x, screen.y - origin.y + scroll_y)
}

pub fn highlight_shapes(frame: &HighlightFrame, origin: Pos2, scroll_y: f32) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(frame.preview.len() + frame.active.len() * 2);

    for highlight in &frame.preview {
        let rect = to_screen_rect(&highlight.rect, origin, scroll_y);
        shapes.push(Shape::rect_filled(rect, 0.0, PREVIEW_FILL));
    }

    for highlight in &frame.active {
        let rect = to_screen_rect(&highlight.rect, origin, scroll_y);
        shapes.push(Shape::rect_filled(rect, 0.0, ACTIVE_FILL));
        shapes.push(Shape::rect_stroke(
            rect,
            0.0,
            Stroke::new(ACTIVE_STROKE_WIDTH, ACTIVE_STROKE),
            StrokeKind::Inside,
        ));
    }

    shapes
}

pub fn paint_highlights(painter: &Painter, frame: &HighlightFrame, origin: Pos2, scroll_y: f32) {
    if frame.is_empty() {
        return;
    }
    painter.extend(highlight_shapes(frame, origin, scroll_y));
}

/// Scroll request waiting for the next frame's `ScrollArea`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingScroll {
    offset: Option<f32>,
    animated: bool,
}

impl PendingScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.offset.is_some()
    }

    /// Hands the pending offset to `area`, at most once.
    pub fn apply(&mut self, area: egui::ScrollArea) -> egui::ScrollArea {
        match self.offset.take() {
            Some(y) => area.animated(self.animated).vertical_scroll_offset(y),
            None => area,
        }
    }
}

impl ScrollTarget for PendingScroll {
    fn scroll_to(&mut self, y: f32, behavior: ScrollBehavior) {
        self.offset = Some(y);
        self.animated = behavior == ScrollBehavior::Smooth;
    }
}
