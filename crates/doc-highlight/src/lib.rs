pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod ids;
pub mod merge;
#[cfg(feature = "egui")]
pub mod overlay;
pub mod payload;
pub mod scroll;
pub mod selection;
pub mod viewport;

pub use config::{HighlightConfig, Precedence, load_config};
pub use engine::{HighlightEngine, HighlightFrame};
pub use error::{HighlightError, Result};
pub use ids::{ActiveToken, HighlightId};
pub use merge::{MergeParams, MergedHighlight, merge, merge_with};
pub use payload::{GeometryIndex, GeometryRecord, IndexKey, IndexKind, RawBox, normalize};
pub use scroll::{ScrollBehavior, ScrollCoordinator, ScrollTarget};
pub use selection::{DecayTicket, SelectionController, SelectionState};
pub use viewport::{PageOffsetTable, PageViewport, ViewportRect};
