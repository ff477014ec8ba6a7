//! Terminal Input Bridge
//!
//! Turns crossterm mouse events into touch input for a [`Document`].
//!
//! Only the left button is a finger: `Down(Left)` is a touch-down and
//! `Up(Left)` a touch-up. Everything else (other buttons, drags, moves,
//! scrolling) is ignored.
//!
//! Terminal cells map to layout units through a cell size; the touch
//! position is the center of the cell.
//!
//! # Example
//!
//! ```ignore
//! use crossterm::event::{read, Event};
//! use spark_remote::input::route_mouse_event;
//!
//! if let Event::Mouse(mouse) = read()? {
//!     route_mouse_event(&mut document, mouse, CELL);
//! }
//! ```

use crossterm::event::{
    MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent,
    MouseEventKind,
};
use taffy::geometry::{Point, Size};

use crate::document::Document;

use super::dispatch::TouchEvent;

/// One layout unit per cell.
pub const UNIT_CELL: Size<f32> = Size { width: 1.0, height: 1.0 };

/// Convert a crossterm mouse event into a touch event and its position.
pub fn convert_mouse_event(
    event: CrosstermMouseEvent,
    cell: Size<f32>,
) -> Option<(TouchEvent, Point<f32>)> {
    let position = Point {
        x: (f32::from(event.column) + 0.5) * cell.width,
        y: (f32::from(event.row) + 0.5) * cell.height,
    };
    let touch = match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => TouchEvent::Down { position },
        MouseEventKind::Up(CrosstermMouseButton::Left) => TouchEvent::Up,
        _ => return None,
    };
    Some((touch, position))
}

/// Hit-test a crossterm mouse event and deliver it to the document.
///
/// The event goes to the nearest component at or above the hit one that
/// binds actions to the event's trigger. Returns whether any action ran.
pub fn route_mouse_event(document: &mut Document, event: CrosstermMouseEvent, cell: Size<f32>) -> bool {
    let Some((touch, position)) = convert_mouse_event(event, cell) else {
        return false;
    };
    let Some(target) = document.touch_target(position, touch.trigger()) else {
        log::trace!(target: "spark_remote::input", "no touch target at {position:?}");
        return false;
    };
    match touch {
        TouchEvent::Down { position } => document.on_touch_down(target, position),
        TouchEvent::Up => document.on_touch_up(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent { kind, column, row, modifiers: KeyModifiers::empty() }
    }

    #[test]
    fn test_convert_left_down() {
        let event = mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5);
        let (touch, position) = convert_mouse_event(event, UNIT_CELL).unwrap();
        assert_eq!(touch, TouchEvent::Down { position: Point { x: 10.5, y: 5.5 } });
        assert_eq!(position, Point { x: 10.5, y: 5.5 });
    }

    #[test]
    fn test_convert_left_up() {
        let event = mouse(MouseEventKind::Up(CrosstermMouseButton::Left), 2, 3);
        let (touch, position) = convert_mouse_event(event, Size { width: 8.0, height: 16.0 }).unwrap();
        assert_eq!(touch, TouchEvent::Up);
        assert_eq!(position, Point { x: 20.0, y: 56.0 });
    }

    #[test]
    fn test_ignored_events() {
        let ignored = [
            MouseEventKind::Down(CrosstermMouseButton::Right),
            MouseEventKind::Up(CrosstermMouseButton::Middle),
            MouseEventKind::Drag(CrosstermMouseButton::Left),
            MouseEventKind::Moved,
            MouseEventKind::ScrollUp,
            MouseEventKind::ScrollDown,
        ];
        for kind in ignored {
            assert!(convert_mouse_event(mouse(kind, 0, 0), UNIT_CELL).is_none(), "{kind:?}");
        }
    }
}
