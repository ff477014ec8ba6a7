//! Frame Pipeline
//!
//! Connects the document state to the host's drawing surface.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Store + Tree → derived refresh → compute_layout → paint → Painter
//! ```
//!
//! ## Data Flow
//!
//! 1. **refresh** - derived variables are recomputed in declaration order
//! 2. **layout** - measure/place into `ComputedLayout`
//! 3. **paint** - pre-order traversal issuing calls on the host [`Painter`]
//!
//! ## Key Design Principles
//!
//! - **Pure layout**: the same tree and store always produce the same calls
//! - **Host owns pixels**: the runtime only describes what to draw

mod paint;
mod painter;
mod record;

pub use paint::paint;
pub use painter::{PaintStyle, Painter, Path, PathVerb};
pub use record::{PaintCall, RecordingPainter};
