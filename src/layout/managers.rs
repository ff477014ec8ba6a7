//! Layout Managers
//!
//! Row, Column and Box measure-then-place over the component arena.
//!
//! # Algorithm
//!
//! 1. **Pass 1**: Resolve visibility of every component (`Gone` subtrees are skipped)
//! 2. **Pass 2**: Measure (top-down constraints, bottom-up sizes)
//!    - Row/Column: non-fill children at unbounded main axis, then `Fill`
//!      children share what is left
//!    - Box: every child against the same constraints
//!    - Text: host [`TextMeasure`], Spacer: zero
//! 3. **Pass 3**: Place (root → leaf) with arrangement and alignment
//! 4. **Pass 4**: Components skipped this pass that were placed before become `Unplaced`
//!
//! All positions are absolute. The pass only reads the tree and the store,
//! so the same tree and store snapshot always produce the same layout.

use taffy::geometry::{Point, Size};
use taffy::style::AvailableSpace;

use crate::engine::{BoxLayout, ComponentKind, ComponentNode, ComponentTree, LinearLayout};
use crate::state::VariableStore;
use crate::types::{Arrangement, Dimension, Visibility, VisibilitySource};

use super::text_measure::{TextMeasure, TextStyle};
use super::types::{ComputedLayout, LayoutPhase};

// =============================================================================
// AXIS HELPERS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    #[inline]
    fn main<T>(self, size: Size<T>) -> T {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    #[inline]
    fn cross<T>(self, size: Size<T>) -> T {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    #[inline]
    fn pack<T>(self, main: T, cross: T) -> Size<T> {
        match self {
            Self::Horizontal => Size { width: main, height: cross },
            Self::Vertical => Size { width: cross, height: main },
        }
    }
}

// =============================================================================
// SIZE RESOLUTION
// =============================================================================

/// NaN and negative sizes collapse to zero.
#[inline]
fn sanitize(value: f32) -> f32 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Resolve one axis of a component's outer size.
fn resolve_axis(dim: Dimension, available: AvailableSpace, content: f32) -> f32 {
    let value = match (dim, available) {
        (Dimension::Fixed(v), _) => v,
        (Dimension::Fill, AvailableSpace::Definite(space)) => space,
        (Dimension::Fill, _) => content,
        (Dimension::Wrap, AvailableSpace::Definite(space)) => content.min(space),
        (Dimension::Wrap, _) => content,
    };
    sanitize(value)
}

/// Constraint handed to a component's content after its own size modifier
/// and padding are taken into account.
fn inner_space(dim: Dimension, available: AvailableSpace, padding: f32) -> AvailableSpace {
    let outer = match dim {
        Dimension::Fixed(v) => AvailableSpace::Definite(sanitize(v)),
        _ => available,
    };
    match outer {
        AvailableSpace::Definite(space) => AvailableSpace::Definite(sanitize(space - padding)),
        other => other,
    }
}

/// Viewport dimensions of zero or less leave that axis unbounded.
fn viewport_space(value: f32) -> AvailableSpace {
    if value > 0.0 {
        AvailableSpace::Definite(value)
    } else {
        AvailableSpace::MaxContent
    }
}

/// Resolve a component's own visibility modifier.
pub fn resolve_visibility(node: &ComponentNode, store: &VariableStore) -> Visibility {
    match node.modifiers.visibility_source() {
        VisibilitySource::Literal(visibility) => visibility,
        VisibilitySource::Variable(id) => match store.get_int(id) {
            Ok(value) => Visibility::from_int(value),
            Err(err) => {
                log::warn!(
                    target: "spark_remote::state",
                    "visibility of {} unresolved ({err}), treating as visible",
                    node.id
                );
                Visibility::Visible
            }
        },
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Measure and place every reachable component.
///
/// # Arguments
///
/// * `tree` - The component tree
/// * `store` - Current variable values (text content, visibility variables)
/// * `viewport` - Space available to the root
/// * `measurer` - Host text metrics
/// * `layout` - Output arrays, resized to the tree when they do not match
pub fn compute_layout(
    tree: &ComponentTree,
    store: &VariableStore,
    viewport: Size<f32>,
    measurer: &dyn TextMeasure,
    layout: &mut ComputedLayout,
) {
    if layout.len() != tree.len() {
        *layout = ComputedLayout::with_len(tree.len());
    }

    // Pass 1: visibility
    for (i, node) in tree.nodes().iter().enumerate() {
        layout.visibility[i] = resolve_visibility(node, store);
    }

    let mut pass = LayoutPass {
        tree,
        store,
        measurer,
        layout,
        visited: vec![false; tree.len()],
    };

    if let Some(root) = tree.root() {
        if pass.layout.visibility(root).takes_space() {
            // Passes 2 and 3
            let space = Size {
                width: viewport_space(viewport.width),
                height: viewport_space(viewport.height),
            };
            pass.measure(root, space);
            pass.place(root, Point { x: 0.0, y: 0.0 });
        }
    }

    // Pass 4: everything not reached this time
    let LayoutPass { visited, layout, .. } = pass;
    let mut placed = 0usize;
    for (i, reached) in visited.into_iter().enumerate() {
        if reached {
            placed += 1;
            continue;
        }
        layout.phase[i] = match layout.phase[i] {
            LayoutPhase::Placed | LayoutPhase::Unplaced => LayoutPhase::Unplaced,
            other => other,
        };
    }

    log::debug!(
        target: "spark_remote::layout",
        "layout pass: {placed}/{} placed, viewport {}x{}",
        tree.len(),
        viewport.width,
        viewport.height
    );
}

// =============================================================================
// PASS STATE
// =============================================================================

struct LayoutPass<'a> {
    tree: &'a ComponentTree,
    store: &'a VariableStore,
    measurer: &'a dyn TextMeasure,
    layout: &'a mut ComputedLayout,
    visited: Vec<bool>,
}

impl LayoutPass<'_> {
    /// Children that take part in layout, in declaration order.
    fn flow_children(&self, node: &ComponentNode) -> Vec<usize> {
        node.children
            .iter()
            .copied()
            .filter(|&child| self.layout.visibility(child).takes_space())
            .collect()
    }

    // =========================================================================
    // MEASURE
    // =========================================================================

    fn measure(&mut self, i: usize, available: Size<AvailableSpace>) -> Size<f32> {
        let tree = self.tree;
        let Some(node) = tree.node(i) else {
            return Size { width: 0.0, height: 0.0 };
        };
        let width_dim = node.modifiers.width();
        let height_dim = node.modifiers.height();
        let padding = node.modifiers.padding();

        let inner = Size {
            width: inner_space(width_dim, available.width, padding.horizontal()),
            height: inner_space(height_dim, available.height, padding.vertical()),
        };

        let content = match node.kind {
            ComponentKind::Row(params) => self.measure_linear(node, Axis::Horizontal, params, inner),
            ComponentKind::Column(params) => self.measure_linear(node, Axis::Vertical, params, inner),
            ComponentKind::Box(params) => self.measure_box(node, params, inner),
            ComponentKind::Text(content) => {
                let text = match self.store.get_text(content.text) {
                    Ok(text) => text,
                    Err(err) => {
                        log::warn!(
                            target: "spark_remote::state",
                            "text of {} unresolved ({err}), measuring as empty",
                            node.id
                        );
                        ""
                    }
                };
                let style = TextStyle {
                    font_size: content.font_size,
                    weight: content.weight,
                    italic: content.italic,
                };
                self.measurer.measure_text(text, &style)
            }
            ComponentKind::Spacer => Size { width: 0.0, height: 0.0 },
        };

        let size = Size {
            width: resolve_axis(width_dim, available.width, sanitize(content.width) + padding.horizontal()),
            height: resolve_axis(height_dim, available.height, sanitize(content.height) + padding.vertical()),
        };

        self.layout.width[i] = size.width;
        self.layout.height[i] = size.height;
        self.layout.phase[i] = LayoutPhase::Measured;
        self.visited[i] = true;
        size
    }

    fn measure_linear(
        &mut self,
        node: &ComponentNode,
        axis: Axis,
        params: LinearLayout,
        inner: Size<AvailableSpace>,
    ) -> Size<f32> {
        let children = self.flow_children(node);
        if children.is_empty() {
            return Size { width: 0.0, height: 0.0 };
        }

        let main_space = axis.main(inner);
        let cross_space = axis.cross(inner);
        let spacing = sanitize(params.spacing) * (children.len() - 1) as f32;

        let mut used = 0.0f32;
        let mut cross = 0.0f32;
        let mut fills = Vec::new();

        // Non-fill children at unbounded main axis
        for &child in &children {
            let fills_main = match self.tree.node(child) {
                Some(c) => axis.main(Size { width: c.modifiers.width(), height: c.modifiers.height() }) == Dimension::Fill,
                None => false,
            };
            if fills_main {
                fills.push(child);
                continue;
            }
            let size = self.measure(child, axis.pack(AvailableSpace::MaxContent, cross_space));
            used += axis.main(size);
            cross = cross.max(axis.cross(size));
        }

        // Fill children share the remainder equally
        if !fills.is_empty() {
            let share = match main_space {
                AvailableSpace::Definite(space) => {
                    AvailableSpace::Definite(sanitize((space - used - spacing) / fills.len() as f32))
                }
                other => other,
            };
            for &child in &fills {
                let size = self.measure(child, axis.pack(share, cross_space));
                used += axis.main(size);
                cross = cross.max(axis.cross(size));
            }
        }

        axis.pack(used + spacing, cross)
    }

    fn measure_box(
        &mut self,
        node: &ComponentNode,
        _params: BoxLayout,
        inner: Size<AvailableSpace>,
    ) -> Size<f32> {
        let mut content = Size { width: 0.0f32, height: 0.0f32 };
        for child in self.flow_children(node) {
            let size = self.measure(child, inner);
            content.width = content.width.max(size.width);
            content.height = content.height.max(size.height);
        }
        content
    }

    // =========================================================================
    // PLACE
    // =========================================================================

    fn place(&mut self, i: usize, origin: Point<f32>) {
        let tree = self.tree;
        let Some(node) = tree.node(i) else {
            return;
        };
        self.layout.x[i] = origin.x;
        self.layout.y[i] = origin.y;
        self.layout.phase[i] = LayoutPhase::Placed;

        let padding = node.modifiers.padding();
        let inner_origin = Point { x: origin.x + padding.left, y: origin.y + padding.top };
        let inner_size = Size {
            width: sanitize(self.layout.width[i] - padding.horizontal()),
            height: sanitize(self.layout.height[i] - padding.vertical()),
        };

        match node.kind {
            ComponentKind::Row(params) => {
                self.place_linear(node, Axis::Horizontal, params, inner_origin, inner_size)
            }
            ComponentKind::Column(params) => {
                self.place_linear(node, Axis::Vertical, params, inner_origin, inner_size)
            }
            ComponentKind::Box(params) => {
                for child in self.flow_children(node) {
                    let size = self.layout.size(child);
                    let x = params.horizontal.offset(inner_size.width, size.width);
                    let y = params.vertical.offset(inner_size.height, size.height);
                    self.place(child, Point { x: inner_origin.x + x, y: inner_origin.y + y });
                }
            }
            ComponentKind::Text(_) | ComponentKind::Spacer => {}
        }
    }

    fn place_linear(
        &mut self,
        node: &ComponentNode,
        axis: Axis,
        params: LinearLayout,
        inner_origin: Point<f32>,
        inner_size: Size<f32>,
    ) {
        let children = self.flow_children(node);
        if children.is_empty() {
            return;
        }
        let count = children.len() as f32;
        let spacing = sanitize(params.spacing);

        let total: f32 = children.iter().map(|&c| axis.main(self.layout.size(c))).sum::<f32>()
            + spacing * (count - 1.0);
        let remaining = (axis.main(inner_size) - total).max(0.0);

        let (start, gap) = match params.arrangement {
            Arrangement::Start => (0.0, 0.0),
            Arrangement::Center => (remaining / 2.0, 0.0),
            Arrangement::End => (remaining, 0.0),
            Arrangement::SpaceBetween if children.len() > 1 => (0.0, remaining / (count - 1.0)),
            Arrangement::SpaceBetween => (0.0, 0.0),
            Arrangement::SpaceAround => (remaining / count / 2.0, remaining / count),
            Arrangement::SpaceEvenly => (remaining / (count + 1.0), remaining / (count + 1.0)),
        };

        let (origin_main, origin_cross) = match axis {
            Axis::Horizontal => (inner_origin.x, inner_origin.y),
            Axis::Vertical => (inner_origin.y, inner_origin.x),
        };
        let cross_space = axis.cross(inner_size);

        let mut cursor = start;
        for child in children {
            let size = self.layout.size(child);
            let cross = params.alignment.offset(cross_space, axis.cross(size));
            let offset = axis.pack(origin_main + cursor, origin_cross + cross);
            self.place(child, Point { x: offset.width, y: offset.height });
            cursor += axis.main(size) + spacing + gap;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Modifier, ModifierChain, TextContent};
    use crate::layout::MonospaceMeasure;
    use crate::state::Value;
    use crate::types::{Alignment, ComponentId, Padding, Rgba, VariableId};

    struct Fixture {
        store: VariableStore,
        nodes: Vec<ComponentNode>,
    }

    fn setup() -> Fixture {
        Fixture { store: VariableStore::new(), nodes: Vec::new() }
    }

    impl Fixture {
        fn add(&mut self, kind: ComponentKind, parent: Option<usize>, modifiers: Vec<Modifier>) -> usize {
            let index = self.nodes.len();
            self.nodes.push(ComponentNode {
                id: ComponentId(index as u32 + 1),
                kind,
                modifiers: ModifierChain::new(modifiers),
                parent,
                children: Vec::new(),
            });
            if let Some(parent) = parent {
                self.nodes[parent].children.push(index);
            }
            index
        }

        fn text(&mut self, text: &str, parent: usize) -> usize {
            let text = self.store.declare(Value::from(text));
            let color = self.store.declare(Value::Color(Rgba::BLACK));
            let content = TextContent { text, color, font_size: 1.0, weight: 400, italic: false };
            self.add(ComponentKind::Text(content), Some(parent), vec![])
        }

        fn run(&self, viewport: Size<f32>) -> ComputedLayout {
            let tree = ComponentTree::from_nodes(self.nodes.clone());
            let mut layout = ComputedLayout::new();
            compute_layout(&tree, &self.store, viewport, &MonospaceMeasure::TERMINAL, &mut layout);
            layout
        }
    }

    fn fixed(width: f32, height: f32) -> Vec<Modifier> {
        vec![
            Modifier::Width(Dimension::Fixed(width)),
            Modifier::Height(Dimension::Fixed(height)),
        ]
    }

    fn row(arrangement: Arrangement) -> ComponentKind {
        ComponentKind::Row(LinearLayout { arrangement, ..LinearLayout::default() })
    }

    fn viewport() -> Size<f32> {
        Size { width: 800.0, height: 600.0 }
    }

    #[test]
    fn test_resolve_axis() {
        let definite = AvailableSpace::Definite(50.0);
        assert_eq!(resolve_axis(Dimension::Fixed(80.0), definite, 10.0), 80.0);
        assert_eq!(resolve_axis(Dimension::Fill, definite, 10.0), 50.0);
        assert_eq!(resolve_axis(Dimension::Fill, AvailableSpace::MaxContent, 10.0), 10.0);
        assert_eq!(resolve_axis(Dimension::Wrap, definite, 70.0), 50.0);
        assert_eq!(resolve_axis(Dimension::Wrap, AvailableSpace::MaxContent, 70.0), 70.0);
        assert_eq!(resolve_axis(Dimension::Fixed(-5.0), definite, 0.0), 0.0);
        assert_eq!(resolve_axis(Dimension::Fixed(f32::NAN), definite, 0.0), 0.0);
    }

    #[test]
    fn test_space_between() {
        let mut f = setup();
        let root = f.add(row(Arrangement::SpaceBetween), None, fixed(300.0, 50.0));
        let a = f.add(ComponentKind::Spacer, Some(root), fixed(100.0, 10.0));
        let b = f.add(ComponentKind::Spacer, Some(root), fixed(100.0, 10.0));

        let layout = f.run(viewport());
        assert_eq!(layout.get(root), (0.0, 0.0, 300.0, 50.0));
        assert_eq!(layout.get(a), (0.0, 0.0, 100.0, 10.0));
        assert_eq!(layout.get(b), (200.0, 0.0, 100.0, 10.0));
    }

    #[test]
    fn test_gone_child_takes_no_space() {
        let mut f = setup();
        let root = f.add(row(Arrangement::SpaceBetween), None, fixed(300.0, 50.0));
        let mut gone = fixed(100.0, 10.0);
        gone.push(Modifier::Visibility(VisibilitySource::Literal(Visibility::Gone)));
        let a = f.add(ComponentKind::Spacer, Some(root), gone);
        let b = f.add(ComponentKind::Spacer, Some(root), fixed(100.0, 10.0));

        let layout = f.run(viewport());
        assert_eq!(layout.phase(a), LayoutPhase::Unmeasured);
        assert_eq!(layout.get(b).0, 0.0);
        assert!(layout.is_placed(b));
    }

    #[test]
    fn test_arrangements() {
        let third = 80.0f32 / 3.0;
        let cases = [
            (Arrangement::Start, [0.0, 10.0]),
            (Arrangement::Center, [40.0, 50.0]),
            (Arrangement::End, [80.0, 90.0]),
            (Arrangement::SpaceAround, [20.0, 70.0]),
            (Arrangement::SpaceEvenly, [third, third + (10.0 + third)]),
        ];
        for (arrangement, expected) in cases {
            let mut f = setup();
            let root = f.add(row(arrangement), None, fixed(100.0, 10.0));
            let a = f.add(ComponentKind::Spacer, Some(root), fixed(10.0, 10.0));
            let b = f.add(ComponentKind::Spacer, Some(root), fixed(10.0, 10.0));
            let layout = f.run(viewport());
            assert_eq!([layout.x[a], layout.x[b]], expected, "{arrangement:?}");
        }
    }

    #[test]
    fn test_column_spacing_and_alignment() {
        let mut f = setup();
        let root = f.add(
            ComponentKind::Column(LinearLayout {
                arrangement: Arrangement::Start,
                alignment: Alignment::Center,
                spacing: 5.0,
            }),
            None,
            vec![],
        );
        let a = f.text("abcd", root);
        let b = f.text("ab", root);

        let layout = f.run(viewport());
        // Wrap column sizes to its widest child.
        assert_eq!(layout.get(root), (0.0, 0.0, 4.0, 7.0));
        assert_eq!(layout.get(a), (0.0, 0.0, 4.0, 1.0));
        assert_eq!(layout.get(b), (1.0, 6.0, 2.0, 1.0));
    }

    #[test]
    fn test_fill_children_share_remainder() {
        let mut f = setup();
        let root = f.add(row(Arrangement::Start), None, fixed(100.0, 10.0));
        let a = f.add(ComponentKind::Spacer, Some(root), fixed(20.0, 10.0));
        let b = f.add(ComponentKind::Spacer, Some(root), vec![Modifier::Width(Dimension::Fill)]);
        let c = f.add(ComponentKind::Spacer, Some(root), vec![Modifier::Width(Dimension::Fill)]);

        let layout = f.run(viewport());
        assert_eq!(layout.width[b], 40.0);
        assert_eq!(layout.width[c], 40.0);
        assert_eq!(layout.x[b], 20.0);
        assert_eq!(layout.x[c], 60.0);
        assert_eq!(layout.width[a], 20.0);
    }

    #[test]
    fn test_box_alignment_and_padding() {
        let mut f = setup();
        let mut mods = vec![Modifier::Padding(Padding::all(2.0))];
        mods.extend(fixed(20.0, 20.0));
        let root = f.add(
            ComponentKind::Box(BoxLayout { horizontal: Alignment::End, vertical: Alignment::Center }),
            None,
            mods,
        );
        let child = f.add(ComponentKind::Spacer, Some(root), fixed(6.0, 4.0));

        let layout = f.run(viewport());
        // Inner box is 16x16 at (2, 2).
        assert_eq!(layout.get(child), (12.0, 8.0, 6.0, 4.0));
    }

    #[test]
    fn test_wrap_box_sizes_to_largest_child() {
        let mut f = setup();
        let root = f.add(
            ComponentKind::Box(BoxLayout::default()),
            None,
            vec![Modifier::Padding(Padding::new(1.0, 2.0, 3.0, 4.0))],
        );
        f.add(ComponentKind::Spacer, Some(root), fixed(10.0, 2.0));
        f.add(ComponentKind::Spacer, Some(root), fixed(4.0, 8.0));

        let layout = f.run(viewport());
        assert_eq!(layout.size(root), Size { width: 14.0, height: 14.0 });
    }

    #[test]
    fn test_invisible_keeps_space() {
        let mut f = setup();
        let root = f.add(row(Arrangement::Start), None, vec![]);
        let mut hidden = fixed(10.0, 10.0);
        hidden.push(Modifier::Visibility(VisibilitySource::Literal(Visibility::Invisible)));
        let a = f.add(ComponentKind::Spacer, Some(root), hidden);
        let b = f.add(ComponentKind::Spacer, Some(root), fixed(10.0, 10.0));

        let layout = f.run(viewport());
        assert!(layout.is_placed(a));
        assert_eq!(layout.visibility(a), Visibility::Invisible);
        assert_eq!(layout.x[b], 10.0);
    }

    #[test]
    fn test_visibility_from_variable_and_unplace() {
        let mut f = setup();
        let flag = f.store.declare_mutable(Value::Int(0));
        let root = f.add(row(Arrangement::Start), None, vec![]);
        let inner = f.add(
            row(Arrangement::Start),
            Some(root),
            vec![Modifier::Visibility(VisibilitySource::Variable(flag))],
        );
        let leaf = f.add(ComponentKind::Spacer, Some(inner), fixed(5.0, 5.0));

        let tree = ComponentTree::from_nodes(f.nodes.clone());
        let mut layout = ComputedLayout::new();
        let measure = MonospaceMeasure::TERMINAL;
        compute_layout(&tree, &f.store, viewport(), &measure, &mut layout);
        assert!(layout.is_placed(leaf));

        f.store.set(flag, Value::Int(2)).unwrap();
        compute_layout(&tree, &f.store, viewport(), &measure, &mut layout);
        assert_eq!(layout.phase(inner), LayoutPhase::Unplaced);
        assert_eq!(layout.phase(leaf), LayoutPhase::Unplaced);

        f.store.set(flag, Value::Int(0)).unwrap();
        compute_layout(&tree, &f.store, viewport(), &measure, &mut layout);
        assert!(layout.is_placed(leaf));
    }

    #[test]
    fn test_unresolved_text_measures_empty() {
        let mut f = setup();
        let root = f.add(row(Arrangement::Start), None, vec![]);
        let content = TextContent {
            text: VariableId(999),
            color: VariableId(999),
            font_size: 1.0,
            weight: 400,
            italic: false,
        };
        let text = f.add(ComponentKind::Text(content), Some(root), vec![]);
        let layout = f.run(viewport());
        assert!(layout.is_placed(text));
        assert_eq!(layout.size(text), Size { width: 0.0, height: 0.0 });
    }

    #[test]
    fn test_deterministic() {
        let mut f = setup();
        let root = f.add(row(Arrangement::SpaceEvenly), None, vec![Modifier::Width(Dimension::Fill)]);
        f.text("hello", root);
        f.text("日本", root);
        f.add(ComponentKind::Spacer, Some(root), vec![Modifier::Width(Dimension::Fill)]);
        assert_eq!(f.run(viewport()), f.run(viewport()));
    }
}
