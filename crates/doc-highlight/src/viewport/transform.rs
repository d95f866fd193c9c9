use super::page::{PageOffsetTable, PageViewport, viewport_index};
use super::rect::ViewportRect;
use crate::payload::{GeometryRecord, RawBox};
use log::trace;

/// Converts one record from source-document space into viewport pixels.
///
/// Returns `None` for stale pages (no matching viewport) and for boxes that
/// cannot be placed: zero or negative reference height, negative line height,
/// or an unusable zoom for object-form boxes.
pub fn to_viewport_rect(
    record: &GeometryRecord,
    viewports: &[PageViewport],
    offsets: &PageOffsetTable,
    zoom: f32,
) -> Option<ViewportRect> {
    let Some(index) = viewport_index(viewports, record.page) else {
        trace!("{} references page {} with no viewport", record.key, record.page);
        return None;
    };
    let viewport = &viewports[index];
    let offset = offsets.offset_at(index)?;

    match record.raw_box {
        RawBox::Rect {
            x,
            y,
            width,
            height,
        } => {
            if !zoom.is_finite() || zoom <= 0.0 {
                return None;
            }
            Some(ViewportRect::new(
                record.page,
                x * zoom,
                y * zoom + offset,
                width * zoom,
                height * zoom,
            ))
        }
        RawBox::LineTuple {
            base_y,
            line_height,
            page_height,
            ..
        } => {
            if !page_height.is_finite() || page_height <= 0.0 || line_height < 0.0 {
                trace!("{} has an unusable line box", record.key);
                return None;
            }
            let scale = viewport.height / page_height;
            // Source space has its origin at the bottom-left of the page.
            let top_left_y = page_height - (base_y + line_height);

            Some(ViewportRect::new(
                record.page,
                0.0,
                top_left_y * scale + offset,
                viewport.width,
                line_height * scale,
            ))
        }
    }
}

/// Inverse of the line-tuple transform: recovers `(base_y, line_height)` in
/// the source space whose page height is `page_height`.
pub fn to_source_line(
    rect: &ViewportRect,
    viewports: &[PageViewport],
    offsets: &PageOffsetTable,
    page_height: f32,
) -> Option<(f32, f32)> {
    if !page_height.is_finite() || page_height <= 0.0 {
        return None;
    }
    let index = viewport_index(viewports, rect.page)?;
    let viewport = &viewports[index];
    if viewport.height <= 0.0 {
        return None;
    }
    let offset = offsets.offset_at(index)?;

    let scale = viewport.height / page_height;
    let line_height = rect.height / scale;
    let top_left_y = (rect.y - offset) / scale;
    Some((page_height - top_left_y - line_height, line_height))
}
