use crate::constants::SCROLL_LEAD_IN;
use crate::payload::IndexKey;
use crate::selection::ResolveContext;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Handle to the renderer's scrollable page column.
///
/// Requests are fire-and-forget: implementations must not block and the
/// coordinator never checks whether the scroll happened.
pub trait ScrollTarget {
    fn scroll_to(&mut self, y: f32, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCoordinator {
    lead_in: f32,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(SCROLL_LEAD_IN)
    }
}

impl ScrollCoordinator {
    pub fn new(lead_in: f32) -> Self {
        Self { lead_in }
    }

    pub fn lead_in(&self) -> f32 {
        self.lead_in
    }

    /// Scroll offset that puts the first key's box just below the top of
    /// the viewport. Only the first key is considered.
    pub fn target_offset(&self, keys: &[IndexKey], ctx: &ResolveContext) -> Option<f32> {
        let key = keys.first()?;
        let rect = ctx.rect_for(*key)?;
        Some((rect.y - self.lead_in).max(0.0))
    }

    pub fn scroll_to_keys(
        &self,
        keys: &[IndexKey],
        ctx: &ResolveContext,
        target: &mut dyn ScrollTarget,
    ) -> Option<f32> {
        let offset = self.target_offset(keys, ctx)?;
        debug!("Scrolling to {} for {}", offset, keys[0]);
        target.scroll_to(offset, ScrollBehavior::Smooth);
        Some(offset)
    }
}
