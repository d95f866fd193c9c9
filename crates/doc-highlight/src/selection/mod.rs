pub mod controller;
pub mod resolver;

pub use controller::{DecayTicket, HighlightSelection, SelectionController, SelectionState};
pub use resolver::{ResolveContext, resolve, resolve_rects, try_resolve};
