//! Layout Types
//!
//! Derived per-component layout state, kept in parallel arrays indexed by
//! component arena index.

use taffy::geometry::{Point, Size};

use crate::types::{DirtyFlags, Visibility};

/// Where a component stands in the measure/place cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LayoutPhase {
    /// Never measured.
    #[default]
    Unmeasured = 0,
    /// Measured but not yet positioned.
    Measured = 1,
    /// Positioned in the last pass. Drawn and hit-testable.
    Placed = 2,
    /// Was placed before, skipped by the last pass (e.g. under a `Gone` ancestor).
    Unplaced = 3,
}

/// Computed layout result.
///
/// Contains parallel arrays indexed by component index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    /// X position of each component, absolute.
    pub x: Vec<f32>,

    /// Y position of each component, absolute.
    pub y: Vec<f32>,

    /// Width of each component.
    pub width: Vec<f32>,

    /// Height of each component.
    pub height: Vec<f32>,

    /// Resolved visibility of each component.
    pub visibility: Vec<Visibility>,

    /// Measure/place phase of each component.
    pub phase: Vec<LayoutPhase>,

    /// Pending invalidation of each component.
    pub dirty: Vec<DirtyFlags>,
}

impl ComputedLayout {
    /// Create a new empty computed layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout for `count` components, all unmeasured and fully dirty.
    pub fn with_len(count: usize) -> Self {
        Self {
            x: vec![0.0; count],
            y: vec![0.0; count],
            width: vec![0.0; count],
            height: vec![0.0; count],
            visibility: vec![Visibility::Visible; count],
            phase: vec![LayoutPhase::Unmeasured; count],
            dirty: vec![DirtyFlags::ALL; count],
        }
    }

    pub fn len(&self) -> usize {
        self.phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }

    /// Get the position and size of a component.
    ///
    /// Returns (x, y, width, height) or zeros if index is out of bounds.
    pub fn get(&self, index: usize) -> (f32, f32, f32, f32) {
        (
            self.x.get(index).copied().unwrap_or(0.0),
            self.y.get(index).copied().unwrap_or(0.0),
            self.width.get(index).copied().unwrap_or(0.0),
            self.height.get(index).copied().unwrap_or(0.0),
        )
    }

    pub fn origin(&self, index: usize) -> Point<f32> {
        let (x, y, _, _) = self.get(index);
        Point { x, y }
    }

    pub fn size(&self, index: usize) -> Size<f32> {
        let (_, _, width, height) = self.get(index);
        Size { width, height }
    }

    pub fn phase(&self, index: usize) -> LayoutPhase {
        self.phase.get(index).copied().unwrap_or_default()
    }

    pub fn visibility(&self, index: usize) -> Visibility {
        self.visibility.get(index).copied().unwrap_or_default()
    }

    #[inline]
    pub fn is_placed(&self, index: usize) -> bool {
        self.phase(index) == LayoutPhase::Placed
    }

    /// Whether `point` falls inside the component's bounds (right/bottom edges exclusive).
    pub fn contains(&self, index: usize, point: Point<f32>) -> bool {
        let (x, y, w, h) = self.get(index);
        point.x >= x && point.y >= y && point.x < x + w && point.y < y + h
    }

    pub fn mark_dirty(&mut self, index: usize, flags: DirtyFlags) {
        if let Some(slot) = self.dirty.get_mut(index) {
            *slot |= flags;
        }
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty.get(index).is_some_and(|d| !d.is_empty())
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.fill(DirtyFlags::NONE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_layout_get() {
        let mut layout = ComputedLayout::with_len(1);
        layout.x[0] = 10.0;
        layout.y[0] = 20.0;
        layout.width[0] = 30.0;
        layout.height[0] = 40.0;

        assert_eq!(layout.get(0), (10.0, 20.0, 30.0, 40.0));
        // Out of bounds returns zeros
        assert_eq!(layout.get(999), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(layout.phase(999), LayoutPhase::Unmeasured);
    }

    #[test]
    fn test_contains() {
        let mut layout = ComputedLayout::with_len(1);
        layout.x[0] = 10.0;
        layout.width[0] = 5.0;
        layout.height[0] = 5.0;
        assert!(layout.contains(0, Point { x: 10.0, y: 0.0 }));
        assert!(layout.contains(0, Point { x: 14.9, y: 4.9 }));
        assert!(!layout.contains(0, Point { x: 15.0, y: 0.0 }));
    }

    #[test]
    fn test_dirty_flags() {
        let mut layout = ComputedLayout::with_len(2);
        assert!(layout.is_dirty(0));
        layout.clear_dirty();
        assert!(!layout.is_dirty(1));
        layout.mark_dirty(1, DirtyFlags::PAINT);
        layout.mark_dirty(1, DirtyFlags::LAYOUT);
        assert_eq!(layout.dirty[1], DirtyFlags::PAINT | DirtyFlags::LAYOUT);
    }
}
