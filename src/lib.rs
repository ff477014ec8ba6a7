//! # spark-remote
//!
//! Player for remote declarative UI documents.
//!
//! A server describes a UI as a compact binary document: typed variables,
//! expressions over them, a tree of Row/Column/Box/Text/Spacer components
//! decorated by modifiers, and actions that mutate variables on touch. The
//! player decodes it once, then every frame refreshes derived values, lays
//! the tree out and paints it through a host-supplied [`pipeline::Painter`].
//!
//! ## Architecture
//!
//! Components are indices into an arena rather than objects, and they never
//! hold values: text, colors and visibility are variable ids resolved through
//! the [`state::VariableStore`] at layout and paint time. Layout results live
//! in parallel arrays indexed the same way as the arena.
//!
//! ```text
//! bytes → codec (profile-checked) → engine::build → Document
//!                                                      ↓
//!         touch → input::Dispatcher → store → update → layout → paint → Painter
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ids, colors, visibility, arrangement, dimensions, dirty flags
//! - [`error`] - Decode, encode and store errors
//! - [`config`] - Player limits and runtime profile
//! - [`profile`] - Opcode-set profiles and the compiled-in registry
//! - [`state`] - Variable store, expression evaluator, derived variables
//! - [`codec`] - Binary wire format and the document writer
//! - [`engine`] - Component tree, modifiers, tree builder, dependency index
//! - [`layout`] - Row/Column/Box measure and place
//! - [`pipeline`] - Painter interface and paint traversal
//! - [`input`] - Actions, touch dispatch, crossterm bridge
//! - [`document`] - The playable document
//! - [`shared`] - Lock-protected document for multi-threaded hosts

pub mod codec;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod input;
pub mod layout;
pub mod pipeline;
pub mod profile;
pub mod shared;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use codec::{decode_document, encode_document, DecodedDocument, DocumentWriter, Header, Operation};
pub use config::PlayerConfig;
pub use document::Document;
pub use error::{DecodeError, EncodeError, Error, Result, StoreError};
pub use input::{HostActionEvent, Invalidation, TouchEvent};
pub use layout::{ComputedLayout, LayoutPhase, MonospaceMeasure, TextMeasure, TextStyle};
pub use pipeline::{PaintStyle, Painter, Path, RecordingPainter};
pub use profile::{Profile, ProfileRegistry};
pub use shared::SharedDocument;
pub use state::{Value, VariableStore};
