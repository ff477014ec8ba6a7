//! Recording painter for tests and headless hosts.

use taffy::geometry::{Point, Size};

use crate::layout::{MonospaceMeasure, TextMeasure, TextStyle};

use super::painter::{PaintStyle, Painter, Path};

/// A single painter call, captured verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCall {
    Style(PaintStyle),
    Rect { origin: Point<f32>, size: Size<f32> },
    Path(Path),
    Text { text: String, origin: Point<f32> },
}

/// Painter that stores every call in order.
///
/// Measures text with a [`MonospaceMeasure`].
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub measure: MonospaceMeasure,
    pub calls: Vec<PaintCall>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measure(measure: MonospaceMeasure) -> Self {
        Self { measure, calls: Vec::new() }
    }

    /// Text of every `draw_text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                PaintCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TextMeasure for RecordingPainter {
    fn measure_text(&self, text: &str, style: &TextStyle) -> Size<f32> {
        self.measure.measure_text(text, style)
    }
}

impl Painter for RecordingPainter {
    fn set_paint_style(&mut self, style: &PaintStyle) {
        self.calls.push(PaintCall::Style(*style));
    }

    fn draw_rect(&mut self, origin: Point<f32>, size: Size<f32>) {
        self.calls.push(PaintCall::Rect { origin, size });
    }

    fn draw_path(&mut self, path: &Path) {
        self.calls.push(PaintCall::Path(path.clone()));
    }

    fn draw_text(&mut self, text: &str, origin: Point<f32>) {
        self.calls.push(PaintCall::Text { text: text.to_owned(), origin });
    }
}
