//! Action Dispatcher
//!
//! Routes touch input to the actions a component binds, applies them to the
//! store and records what has to be redrawn.
//!
//! - Only components that are `Placed` and drawn (themselves and every
//!   ancestor `Visible`) receive input.
//! - Bound actions run in declaration order. A failing action is logged and
//!   skipped; the remaining actions still run.
//! - Every dispatch that reaches a component appends one [`Invalidation`].
//!   Records are never merged, even when the written value did not change.
//! - Host actions are queued as [`HostActionEvent`]s for the host to drain.

use std::collections::{HashMap, VecDeque};

use taffy::geometry::Point;

use crate::engine::{ComponentTree, DependencyIndex};
use crate::layout::ComputedLayout;
use crate::state::{refresh, DerivedVariable, VariableStore};
use crate::types::{ActionId, ComponentId, DirtyFlags, TouchTrigger, VariableId};

use super::action::{Action, ActionOutcome};

// =============================================================================
// EVENTS
// =============================================================================

/// Touch input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Down { position: Point<f32> },
    Up,
}

impl TouchEvent {
    pub fn trigger(&self) -> TouchTrigger {
        match self {
            Self::Down { .. } => TouchTrigger::Down,
            Self::Up => TouchTrigger::Up,
        }
    }

    pub fn position(&self) -> Option<Point<f32>> {
        match self {
            Self::Down { position } => Some(*position),
            Self::Up => None,
        }
    }
}

/// Record of one dispatch, consumed by the next frame update.
#[derive(Debug, Clone, PartialEq)]
pub struct Invalidation {
    /// Monotonic dispatch counter, starting at 1.
    pub sequence: u64,
    pub component: ComponentId,
    pub trigger: TouchTrigger,
    /// Variables written by the dispatched actions, in first-write order.
    pub mutated: Vec<VariableId>,
    /// Arena indices of components reading a mutated variable.
    pub affected: Vec<usize>,
}

/// A host action fired by a touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostActionEvent {
    pub host_id: u32,
    pub component: ComponentId,
    /// Touch position for touch-down, `None` for touch-up.
    pub position: Option<Point<f32>>,
}

// =============================================================================
// HIT TESTING
// =============================================================================

/// Whether the component and all of its ancestors are placed and visible.
pub fn is_drawn(tree: &ComponentTree, layout: &ComputedLayout, index: usize) -> bool {
    layout.is_placed(index)
        && layout.visibility(index).is_drawn()
        && tree
            .ancestors(index)
            .into_iter()
            .all(|a| layout.is_placed(a) && layout.visibility(a).is_drawn())
}

/// Topmost drawn component containing `point`.
///
/// Later components in pre-order paint on top of earlier ones, so the
/// search runs backwards over the arena.
pub fn component_at(tree: &ComponentTree, layout: &ComputedLayout, point: Point<f32>) -> Option<usize> {
    (0..tree.len())
        .rev()
        .find(|&i| layout.contains(i, point) && is_drawn(tree, layout, i))
}

/// Nearest component at or above `index` that binds actions to `trigger`.
pub fn action_target(tree: &ComponentTree, index: usize, trigger: TouchTrigger) -> Option<usize> {
    std::iter::once(index)
        .chain(tree.ancestors(index))
        .find(|&i| {
            tree.node(i)
                .is_some_and(|n| !n.modifiers.actions_for(trigger).is_empty())
        })
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Borrowed document state a dispatch works on.
pub struct DispatchContext<'a> {
    pub tree: &'a ComponentTree,
    pub store: &'a mut VariableStore,
    pub derived: &'a [DerivedVariable],
    pub actions: &'a HashMap<ActionId, Action>,
    pub layout: &'a mut ComputedLayout,
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    dependencies: DependencyIndex,
    invalidations: Vec<Invalidation>,
    host_events: VecDeque<HostActionEvent>,
    sequence: u64,
}

impl Dispatcher {
    pub fn new(dependencies: DependencyIndex) -> Self {
        Self { dependencies, ..Self::default() }
    }

    pub fn dependencies(&self) -> &DependencyIndex {
        &self.dependencies
    }

    /// Replace the index, after a write changed which variables a lookup can reach.
    pub fn set_dependencies(&mut self, dependencies: DependencyIndex) {
        self.dependencies = dependencies;
    }

    /// Deliver `event` to the component at arena `index`.
    ///
    /// Returns `false` when the component cannot receive input (unknown,
    /// not placed, not drawn) or binds nothing to the event's trigger.
    pub fn dispatch(&mut self, ctx: DispatchContext<'_>, index: usize, event: TouchEvent) -> bool {
        let DispatchContext { tree, store, derived, actions, layout } = ctx;
        let Some(node) = tree.node(index) else {
            return false;
        };
        if !is_drawn(tree, layout, index) {
            log::debug!(target: "spark_remote::input", "{} not drawn, ignoring {event:?}", node.id);
            return false;
        }
        let trigger = event.trigger();
        let bound = node.modifiers.actions_for(trigger);
        if bound.is_empty() {
            return false;
        }

        // Expression-valued actions read current derived values, including
        // the effect of earlier actions in the same dispatch.
        refresh(derived, store);

        let mut mutated = Vec::new();
        for id in bound {
            let Some(action) = actions.get(&id) else {
                log::warn!(target: "spark_remote::input", "{} binds unknown action {id}", node.id);
                continue;
            };
            match action.apply(store) {
                Ok(ActionOutcome::Mutated { target, changed }) => {
                    log::trace!(
                        target: "spark_remote::input",
                        "{id} on {}: {target} {}",
                        node.id,
                        if changed { "changed" } else { "unchanged" }
                    );
                    if !mutated.contains(&target) {
                        mutated.push(target);
                    }
                    refresh(derived, store);
                }
                Ok(ActionOutcome::Host(host_id)) => {
                    self.host_events.push_back(HostActionEvent {
                        host_id,
                        component: node.id,
                        position: event.position(),
                    });
                }
                Err(err) => {
                    log::warn!(target: "spark_remote::input", "{id} on {} skipped: {err}", node.id);
                }
            }
        }

        let mut affected: Vec<usize> = mutated
            .iter()
            .flat_map(|&var| self.dependencies.affected(var))
            .collect();
        affected.sort_unstable();
        affected.dedup();
        mark_dirty(tree, layout, &affected);

        self.sequence += 1;
        self.invalidations.push(Invalidation {
            sequence: self.sequence,
            component: node.id,
            trigger,
            mutated,
            affected,
        });
        true
    }

    /// Invalidations recorded since the last [`Dispatcher::take_invalidations`].
    pub fn pending(&self) -> &[Invalidation] {
        &self.invalidations
    }

    pub fn take_invalidations(&mut self) -> Vec<Invalidation> {
        std::mem::take(&mut self.invalidations)
    }

    pub fn drain_host_actions(&mut self) -> Vec<HostActionEvent> {
        self.host_events.drain(..).collect()
    }

    /// Forget queued records and restart the sequence.
    pub fn reset(&mut self) {
        self.invalidations.clear();
        self.host_events.clear();
        self.sequence = 0;
    }
}

/// Mark `components` with their subtrees fully dirty, their ancestors for
/// layout and paint, and always the root for paint.
pub fn mark_dirty(tree: &ComponentTree, layout: &mut ComputedLayout, components: &[usize]) {
    for &index in components {
        for i in tree.subtree(index) {
            layout.mark_dirty(i, DirtyFlags::ALL);
        }
        for a in tree.ancestors(index) {
            layout.mark_dirty(a, DirtyFlags::LAYOUT | DirtyFlags::PAINT);
        }
    }
    if let Some(root) = tree.root() {
        layout.mark_dirty(root, DirtyFlags::PAINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        ComponentKind, ComponentNode, LinearLayout, Modifier, ModifierChain, TextContent,
    };
    use crate::input::ActionEffect;
    use crate::layout::{compute_layout, MonospaceMeasure};
    use crate::state::{BinaryOp, DerivedValue, Expression, Value};
    use crate::types::{Dimension, Rgba, Visibility, VisibilitySource};
    use taffy::geometry::Size;

    struct Fixture {
        tree: ComponentTree,
        store: VariableStore,
        derived: Vec<DerivedVariable>,
        actions: HashMap<ActionId, Action>,
        layout: ComputedLayout,
        dispatcher: Dispatcher,
        count: VariableId,
        label: VariableId,
    }

    impl Fixture {
        fn dispatch(&mut self, index: usize, event: TouchEvent) -> bool {
            let ctx = DispatchContext {
                tree: &self.tree,
                store: &mut self.store,
                derived: &self.derived,
                actions: &self.actions,
                layout: &mut self.layout,
            };
            self.dispatcher.dispatch(ctx, index, event)
        }

        fn relayout(&mut self) {
            compute_layout(
                &self.tree,
                &self.store,
                Size { width: 80.0, height: 24.0 },
                &MonospaceMeasure::TERMINAL,
                &mut self.layout,
            );
            self.layout.clear_dirty();
        }
    }

    fn down() -> TouchEvent {
        TouchEvent::Down { position: Point { x: 0.0, y: 0.0 } }
    }

    /// Column (touch-up: count = count + 1, twice) [
    ///     Text(label) with touch-down actions,
    ///     Spacer hidden by `hidden`,
    /// ]
    fn setup() -> Fixture {
        let mut store = VariableStore::new();
        let count = store.declare_mutable(Value::Int(0));
        let label = store.declare_mutable(Value::from(""));
        let color = store.declare(Value::Color(Rgba::BLACK));
        let hidden = store.declare(Value::Int(Visibility::Invisible as i32));
        let next = store.declare_mutable(Value::Int(0));
        let derived = vec![
            DerivedVariable::new(label, DerivedValue::TextFromNumber { source: count, digits: 0 }),
            DerivedVariable::new(
                next,
                DerivedValue::Integer(Expression::binary(
                    BinaryOp::Add,
                    Expression::var(count),
                    Expression::int(1),
                )),
            ),
        ];

        let mut actions = HashMap::new();
        actions.insert(
            ActionId(1),
            Action::new(ActionId(1), ActionEffect::ValueIntegerChange { target: count, value: 5 }),
        );
        actions.insert(ActionId(2), Action::new(ActionId(2), ActionEffect::Host { host_id: 77 }));
        // Fails: text action into an integer slot.
        actions.insert(
            ActionId(3),
            Action::new(ActionId(3), ActionEffect::ValueStringChange { target: count, text: label }),
        );
        actions.insert(
            ActionId(4),
            Action::new(
                ActionId(4),
                ActionEffect::ValueIntegerExpressionChange { target: count, expression: next },
            ),
        );

        let nodes = vec![
            ComponentNode {
                id: ComponentId(1),
                kind: ComponentKind::Column(LinearLayout::default()),
                modifiers: ModifierChain::new(vec![Modifier::TouchAction {
                    trigger: TouchTrigger::Up,
                    actions: vec![ActionId(4), ActionId(4)],
                }]),
                parent: None,
                children: vec![1, 2],
            },
            ComponentNode {
                id: ComponentId(2),
                kind: ComponentKind::Text(TextContent {
                    text: label,
                    color,
                    font_size: 1.0,
                    weight: 400,
                    italic: false,
                }),
                modifiers: ModifierChain::new(vec![Modifier::TouchAction {
                    trigger: TouchTrigger::Down,
                    actions: vec![ActionId(3), ActionId(1), ActionId(2)],
                }]),
                parent: Some(0),
                children: vec![],
            },
            ComponentNode {
                id: ComponentId(3),
                kind: ComponentKind::Spacer,
                modifiers: ModifierChain::new(vec![
                    Modifier::Width(Dimension::Fixed(4.0)),
                    Modifier::Height(Dimension::Fixed(1.0)),
                    Modifier::Visibility(VisibilitySource::Variable(hidden)),
                    Modifier::TouchAction { trigger: TouchTrigger::Down, actions: vec![ActionId(1)] },
                ]),
                parent: Some(0),
                children: vec![],
            },
        ];
        let tree = ComponentTree::from_nodes(nodes);
        let dispatcher = Dispatcher::new(DependencyIndex::build(&tree, &derived, &store));
        let mut fixture = Fixture {
            tree,
            store,
            derived,
            actions,
            layout: ComputedLayout::new(),
            dispatcher,
            count,
            label,
        };
        refresh(&fixture.derived, &mut fixture.store);
        fixture.relayout();
        fixture
    }

    #[test]
    fn test_dispatch_applies_in_order_and_skips_errors() {
        let mut f = setup();
        assert!(f.dispatch(1, down()));
        assert_eq!(f.store.get_int(f.count), Ok(5));
        assert_eq!(f.store.get_text(f.label), Ok("5"));

        let pending = f.dispatcher.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].sequence, 1);
        assert_eq!(pending[0].component, ComponentId(2));
        assert_eq!(pending[0].mutated, vec![f.count]);
        assert_eq!(pending[0].affected, vec![1]);

        let hosts = f.dispatcher.drain_host_actions();
        assert_eq!(
            hosts,
            vec![HostActionEvent {
                host_id: 77,
                component: ComponentId(2),
                position: Some(Point { x: 0.0, y: 0.0 }),
            }]
        );
        assert!(f.dispatcher.drain_host_actions().is_empty());
    }

    #[test]
    fn test_later_actions_see_earlier_writes() {
        let mut f = setup();
        assert!(f.dispatch(0, TouchEvent::Up));
        assert_eq!(f.store.get_int(f.count), Ok(2));
        assert_eq!(f.store.get_text(f.label), Ok("2"));

        let records = f.dispatcher.take_invalidations();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mutated, vec![f.count]);
    }

    #[test]
    fn test_same_value_still_invalidates() {
        let mut f = setup();
        assert!(f.dispatch(1, down()));
        f.relayout();
        assert!(f.dispatch(1, down()));

        let records = f.dispatcher.take_invalidations();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].sequence, 2);
        assert!(f.layout.is_dirty(0));
        assert!(f.layout.dirty[1].contains(DirtyFlags::ALL));
        assert!(f.dispatcher.pending().is_empty());
    }

    #[test]
    fn test_invisible_component_ignores_input() {
        let mut f = setup();
        assert!(f.layout.is_placed(2));
        assert!(!f.dispatch(2, down()));
        assert!(f.dispatcher.pending().is_empty());
        assert_eq!(f.store.get_int(f.count), Ok(0));
    }

    #[test]
    fn test_unbound_trigger() {
        let mut f = setup();
        assert!(!f.dispatch(1, TouchEvent::Up));
        assert!(!f.dispatch(0, down()));
        assert!(!f.dispatch(99, down()));
    }

    #[test]
    fn test_hit_testing() {
        let f = setup();
        // Text "0" occupies (0,0) 1x1, the hidden spacer (0,1) 4x1.
        assert_eq!(component_at(&f.tree, &f.layout, Point { x: 0.5, y: 0.5 }), Some(1));
        assert_eq!(component_at(&f.tree, &f.layout, Point { x: 2.0, y: 1.5 }), Some(0));
        assert_eq!(component_at(&f.tree, &f.layout, Point { x: 50.0, y: 50.0 }), None);
        assert_eq!(action_target(&f.tree, 1, TouchTrigger::Down), Some(1));
        assert_eq!(action_target(&f.tree, 0, TouchTrigger::Down), None);
    }
}
