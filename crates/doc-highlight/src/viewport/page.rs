use serde::{Deserialize, Serialize};

fn default_scale() -> f32 {
    1.0
}

/// Rendered size of one page at the current zoom, as reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewport {
    pub page_number: u32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl PageViewport {
    pub fn new(page_number: u32, width: f32, height: f32) -> Self {
        Self {
            page_number,
            width,
            height,
            scale: default_scale(),
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Position of `page` within the viewport list.
pub fn viewport_index(viewports: &[PageViewport], page: u32) -> Option<usize> {
    viewports.iter().position(|v| v.page_number == page)
}

/// Cumulative top edge of every page in the stacked column.
///
/// `offsets[0] = 0`, `offsets[i] = offsets[i - 1] + height[i - 1] + margin`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOffsetTable {
    offsets: Vec<f32>,
    heights: Vec<f32>,
    margin: f32,
}

impl PageOffsetTable {
    pub fn new(viewports: &[PageViewport], margin: f32) -> Self {
        let mut offsets = Vec::with_capacity(viewports.len());
        let mut top = 0.0;
        for viewport in viewports {
            offsets.push(top);
            top += viewport.height + margin;
        }

        Self {
            offsets,
            heights: viewports.iter().map(|v| v.height).collect(),
            margin,
        }
    }

    pub fn offset_at(&self, index: usize) -> Option<f32> {
        self.offsets.get(index).copied()
    }

    pub fn offset_for_page(&self, viewports: &[PageViewport], page: u32) -> Option<f32> {
        self.offset_at(viewport_index(viewports, page)?)
    }

    /// Height of the whole column, without a trailing margin.
    pub fn total_height(&self) -> f32 {
        match (self.offsets.last(), self.heights.last()) {
            (Some(top), Some(height)) => top + height,
            _ => 0.0,
        }
    }

    /// Index of the page whose band contains `y`. The gap below a page
    /// belongs to that page.
    pub fn page_at(&self, y: f32) -> Option<usize> {
        if y < 0.0 {
            return None;
        }
        self.offsets
            .iter()
            .zip(&self.heights)
            .position(|(top, height)| y >= *top && y < top + height + self.margin)
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
