//! Painter - the host drawing capability.
//!
//! The runtime never rasterizes anything itself. Every frame it walks the
//! placed components and issues calls on a host [`Painter`]: one
//! [`Painter::set_paint_style`] before each group of primitives, then
//! rectangles, paths and text at absolute layout coordinates.
//!
//! Measurement comes from the same object ([`TextMeasure`] is a supertrait),
//! so a host cannot lay text out with one font and draw it with another.

use taffy::geometry::{Point, Size};

use crate::layout::TextMeasure;
use crate::types::Rgba;

/// Style applied to subsequent draw calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStyle {
    pub color: Rgba,
    /// Zero fills, anything else strokes.
    pub stroke_width: f32,
    pub weight: u16,
    pub italic: bool,
}

impl PaintStyle {
    /// Solid fill in `color`.
    pub const fn fill(color: Rgba) -> Self {
        Self { color, stroke_width: 0.0, weight: 400, italic: false }
    }

    /// Outline of `width` in `color`.
    pub const fn stroke(color: Rgba, width: f32) -> Self {
        Self { color, stroke_width: width, weight: 400, italic: false }
    }
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self::fill(Rgba::BLACK)
    }
}

/// One segment command of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathVerb {
    MoveTo(Point<f32>),
    LineTo(Point<f32>),
    Close,
}

/// Outline made of straight segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub verbs: Vec<PathVerb>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.verbs.push(PathVerb::MoveTo(Point { x, y }));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.verbs.push(PathVerb::LineTo(Point { x, y }));
        self
    }

    pub fn close(mut self) -> Self {
        self.verbs.push(PathVerb::Close);
        self
    }

    /// Closed rectangle outline, clockwise from the top-left corner.
    pub fn rect_outline(origin: Point<f32>, size: Size<f32>) -> Self {
        let (x, y) = (origin.x, origin.y);
        let (right, bottom) = (x + size.width, y + size.height);
        Self::new()
            .move_to(x, y)
            .line_to(right, y)
            .line_to(right, bottom)
            .line_to(x, bottom)
            .close()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

/// Host drawing surface.
pub trait Painter: TextMeasure {
    fn set_paint_style(&mut self, style: &PaintStyle);

    fn draw_rect(&mut self, origin: Point<f32>, size: Size<f32>);

    fn draw_path(&mut self, path: &Path);

    /// Draw `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point<f32>);
}
