pub mod page;
pub mod rect;
pub mod transform;

pub use page::{PageOffsetTable, PageViewport, viewport_index};
pub use rect::ViewportRect;
pub use transform::{to_source_line, to_viewport_rect};
