//! Engine - Component tree, modifiers and document construction.
//!
//! - Component: arena of owned nodes addressed by index
//! - Modifier: ordered per-component decorations
//! - Builder: operation list → store + derived slots + tree + actions
//! - Dependency: variable → components reading it
//!
//! # Architecture
//!
//! Components are indices into an arena, not linked objects:
//!
//! ```text
//! Index 0: Column (parent=None, children=[1, 2])
//! Index 1: Text   (parent=0, text=v3, color=v4)
//! Index 2: Row    (parent=0, children=[3])
//! Index 3: Spacer (parent=2)
//! ```
//!
//! Layout results live in parallel arrays indexed the same way
//! (see [`crate::layout::ComputedLayout`]).

mod builder;
mod component;
mod dependency;
mod modifier;

pub use builder::{build, BuiltDocument};
pub use component::*;
pub use dependency::DependencyIndex;
pub use modifier::*;
