use serde::{Deserialize, Serialize};

/// Rectangle in viewport pixels, top-left origin. `y` already includes the
/// page's offset within the stacked column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub page: u32,
}

impl ViewportRect {
    pub fn new(page: u32, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            page,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Bounding union. Keeps `self.page`.
    pub fn union(&self, other: &ViewportRect) -> ViewportRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        ViewportRect::new(self.page, x, y, right - x, bottom - y)
    }
}
