//! Input - actions, touch dispatch and the terminal bridge.
//!
//! - Action: declared state mutations and host actions
//! - Dispatch: hit testing, action application, invalidation records
//! - Terminal: crossterm mouse events → touch input

mod action;
mod dispatch;
pub mod terminal;

pub use action::{Action, ActionEffect, ActionOutcome};
pub use dispatch::{
    action_target, component_at, is_drawn, mark_dirty, DispatchContext, Dispatcher,
    HostActionEvent, Invalidation, TouchEvent,
};
pub use terminal::{convert_mouse_event, route_mouse_event};
