//! Paint traversal - placed components → painter calls.
//!
//! Pre-order walk from the root: a parent paints before its children and
//! siblings paint in declaration order. A component paints its modifiers
//! in declaration order (backgrounds fill, borders stroke) and then its
//! own content.
//!
//! Subtrees that are not `Placed`, or whose visibility is not `Visible`,
//! produce no calls at all.

use taffy::geometry::Point;

use crate::engine::{ComponentKind, ComponentTree, Modifier};
use crate::layout::ComputedLayout;
use crate::state::VariableStore;
use crate::types::{ComponentId, Rgba, VariableId};

use super::painter::{PaintStyle, Painter, Path};

/// Paint every drawable component. Returns how many components painted.
pub fn paint(
    tree: &ComponentTree,
    store: &VariableStore,
    layout: &ComputedLayout,
    painter: &mut dyn Painter,
) -> usize {
    let Some(root) = tree.root() else {
        return 0;
    };
    let mut painted = 0;
    paint_component(tree, store, layout, painter, root, &mut painted);
    log::debug!(target: "spark_remote::paint", "painted {painted}/{} components", tree.len());
    painted
}

fn paint_component(
    tree: &ComponentTree,
    store: &VariableStore,
    layout: &ComputedLayout,
    painter: &mut dyn Painter,
    index: usize,
    painted: &mut usize,
) {
    let Some(node) = tree.node(index) else {
        return;
    };
    if !layout.is_placed(index) || !layout.visibility(index).is_drawn() {
        return;
    }
    *painted += 1;

    let origin = layout.origin(index);
    let size = layout.size(index);

    for modifier in node.modifiers.iter() {
        match modifier {
            Modifier::Background(color) => {
                painter.set_paint_style(&PaintStyle::fill(color_of(store, *color, node.id)));
                painter.draw_rect(origin, size);
            }
            Modifier::Border { width, color } => {
                painter.set_paint_style(&PaintStyle::stroke(color_of(store, *color, node.id), *width));
                painter.draw_path(&Path::rect_outline(origin, size));
            }
            _ => {}
        }
    }

    if let ComponentKind::Text(content) = node.kind {
        let text = match store.get_text(content.text) {
            Ok(text) => text,
            Err(err) => {
                log::warn!(
                    target: "spark_remote::state",
                    "text of {} unresolved ({err}), painting empty",
                    node.id
                );
                ""
            }
        };
        let padding = node.modifiers.padding();
        painter.set_paint_style(&PaintStyle {
            color: color_of(store, content.color, node.id),
            stroke_width: 0.0,
            weight: content.weight,
            italic: content.italic,
        });
        painter.draw_text(text, Point { x: origin.x + padding.left, y: origin.y + padding.top });
    }

    for &child in &node.children {
        paint_component(tree, store, layout, painter, child, painted);
    }
}

/// Color variable value, transparent when it cannot be resolved.
fn color_of(store: &VariableStore, id: VariableId, component: ComponentId) -> Rgba {
    store.get_color(id).unwrap_or_else(|err| {
        log::warn!(
            target: "spark_remote::state",
            "color of {component} unresolved ({err}), using transparent"
        );
        Rgba::TRANSPARENT
    })
}
