//! Layout Module
//!
//! Measure and place the component tree with Row, Column and Box managers.
//!
//! # Architecture
//!
//! Layout is a pure function of the tree and a store snapshot:
//!
//! 1. Resolves visibility (`Visible | Invisible | Gone`) per component
//! 2. Measures with [`taffy::style::AvailableSpace`] constraints
//! 3. Places children by arrangement and alignment
//! 4. Writes results into [`ComputedLayout`] parallel arrays
//!
//! Text leaves are sized by the host through [`TextMeasure`].
//!
//! # Example
//!
//! ```ignore
//! use spark_remote::layout::{compute_layout, ComputedLayout, MonospaceMeasure};
//!
//! let mut layout = ComputedLayout::new();
//! compute_layout(&tree, &store, viewport, &MonospaceMeasure::default(), &mut layout);
//! let (x, y, w, h) = layout.get(0);
//! ```

mod managers;
mod text_measure;
mod types;

pub use managers::{compute_layout, resolve_visibility};
pub use text_measure::*;
pub use types::*;
