//! Document - a decoded, playable remote UI.
//!
//! Owns everything one document needs at runtime: the variable store, the
//! derived slots, the component tree, the action table, the computed layout
//! and the dispatcher. Construction is all-or-nothing; any decode or build
//! error leaves no document behind.
//!
//! # Frame Cycle
//!
//! ```text
//! on_touch_down / on_touch_up / set_named   (mutate store, record invalidation)
//!        ↓
//! update(viewport, measure)                 (refresh derived, layout, consume records)
//!        ↓
//! paint(painter)                            (placed + visible components only)
//! ```
//!
//! # Example
//!
//! ```
//! use spark_remote::codec::DocumentWriter;
//! use spark_remote::config::PlayerConfig;
//! use spark_remote::document::Document;
//! use spark_remote::engine::LinearLayout;
//! use spark_remote::pipeline::RecordingPainter;
//! use spark_remote::profile::CORE_V3;
//! use spark_remote::types::Rgba;
//! use taffy::geometry::Size;
//!
//! let mut writer = DocumentWriter::new(&CORE_V3);
//! let text = writer.text("hello")?;
//! let color = writer.color(Rgba::BLACK)?;
//! writer.start_column(LinearLayout::default())?;
//! writer.text_component(text, color, 1.0)?;
//! writer.end()?;
//! let bytes = writer.finish()?;
//!
//! let mut document = Document::from_bytes(&bytes, &PlayerConfig::default()).unwrap();
//! let mut painter = RecordingPainter::new();
//! document.render_frame(Size { width: 80.0, height: 24.0 }, &mut painter);
//! assert_eq!(painter.texts(), vec!["hello"]);
//! # Ok::<(), spark_remote::error::EncodeError>(())
//! ```

use std::collections::HashMap;

use taffy::geometry::{Point, Size};

use crate::codec::{decode_document, Header};
use crate::config::PlayerConfig;
use crate::engine::{build, ComponentTree, DependencyIndex};
use crate::error::{DecodeError, StoreError};
use crate::input::{
    action_target, component_at, mark_dirty, Action, DispatchContext, Dispatcher,
    HostActionEvent, Invalidation, TouchEvent,
};
use crate::layout::{compute_layout, ComputedLayout, LayoutPhase, TextMeasure};
use crate::pipeline::{paint, Painter};
use crate::profile::Profile;
use crate::state::{refresh, DerivedVariable, Value, VariableKind, VariableStore};
use crate::types::{ActionId, ComponentId, TouchTrigger, VariableId, Visibility};

#[derive(Debug, Clone)]
pub struct Document {
    header: Header,
    profile: &'static Profile,
    /// Store as decoded, restored by [`Document::initialize`].
    initial: VariableStore,
    store: VariableStore,
    derived: Vec<DerivedVariable>,
    tree: ComponentTree,
    actions: HashMap<ActionId, Action>,
    layout: ComputedLayout,
    dispatcher: Dispatcher,
    viewport: Size<f32>,
}

impl Document {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Decode and build a document.
    pub fn from_bytes(bytes: &[u8], config: &PlayerConfig) -> Result<Self, DecodeError> {
        let decoded = decode_document(bytes, config)?;
        let built = build(&decoded.operations, config.max_depth)?;

        let mut store = built.store;
        refresh(&built.derived, &mut store);
        let dependencies = DependencyIndex::build(&built.tree, &built.derived, &store);

        log::debug!(
            target: "spark_remote::engine",
            "document loaded: {} components, profile {}@{}",
            built.tree.len(),
            decoded.profile.name,
            decoded.profile.api_level
        );

        Ok(Self {
            header: decoded.header,
            profile: decoded.profile,
            initial: store.clone(),
            store,
            derived: built.derived,
            layout: ComputedLayout::with_len(built.tree.len()),
            tree: built.tree,
            actions: built.actions,
            dispatcher: Dispatcher::new(dependencies),
            viewport: config.viewport,
        })
    }

    /// Return to the freshly decoded state: initial values, no layout, no
    /// pending records.
    pub fn initialize(&mut self) {
        self.store = self.initial.clone();
        refresh(&self.derived, &mut self.store);
        self.layout = ComputedLayout::with_len(self.tree.len());
        self.dispatcher.reset();
        self.dispatcher
            .set_dependencies(DependencyIndex::build(&self.tree, &self.derived, &self.store));
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Refresh derived values and lay the tree out for `viewport`.
    ///
    /// Consumes and returns the invalidations recorded since the last update.
    pub fn update(&mut self, viewport: Size<f32>, measure: &dyn TextMeasure) -> Vec<Invalidation> {
        self.viewport = viewport;
        refresh(&self.derived, &mut self.store);
        compute_layout(&self.tree, &self.store, viewport, measure, &mut self.layout);
        self.layout.clear_dirty();
        self.dispatcher.take_invalidations()
    }

    /// Issue painter calls for the current layout. Returns components painted.
    pub fn paint(&self, painter: &mut dyn Painter) -> usize {
        paint(&self.tree, &self.store, &self.layout, painter)
    }

    /// [`Document::update`] measured by `painter`, then [`Document::paint`].
    pub fn render_frame<P: Painter>(&mut self, viewport: Size<f32>, painter: &mut P) -> Vec<Invalidation> {
        let invalidations = self.update(viewport, &*painter);
        self.paint(painter);
        invalidations
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn on_touch_down(&mut self, component: ComponentId, position: Point<f32>) -> bool {
        self.dispatch(component, TouchEvent::Down { position })
    }

    pub fn on_touch_up(&mut self, component: ComponentId) -> bool {
        self.dispatch(component, TouchEvent::Up)
    }

    fn dispatch(&mut self, component: ComponentId, event: TouchEvent) -> bool {
        let Some(index) = self.tree.index_of(component) else {
            log::debug!(target: "spark_remote::input", "touch on unknown component {component}");
            return false;
        };
        let ctx = DispatchContext {
            tree: &self.tree,
            store: &mut self.store,
            derived: &self.derived,
            actions: &self.actions,
            layout: &mut self.layout,
        };
        self.dispatcher.dispatch(ctx, index, event)
    }

    /// Topmost drawn component at `point`.
    pub fn component_at(&self, point: Point<f32>) -> Option<ComponentId> {
        component_at(&self.tree, &self.layout, point).and_then(|i| self.id_at(i))
    }

    /// Component that handles `trigger` for a touch at `point`: the hit
    /// component or its nearest ancestor binding actions to `trigger`.
    pub fn touch_target(&self, point: Point<f32>, trigger: TouchTrigger) -> Option<ComponentId> {
        let hit = component_at(&self.tree, &self.layout, point)?;
        action_target(&self.tree, hit, trigger).and_then(|i| self.id_at(i))
    }

    pub fn pending_invalidations(&self) -> &[Invalidation] {
        self.dispatcher.pending()
    }

    pub fn drain_host_actions(&mut self) -> Vec<HostActionEvent> {
        self.dispatcher.drain_host_actions()
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Write a named variable from the host. Returns whether the value changed.
    ///
    /// Replacing a list also re-indexes lookups over it, so later writes to
    /// the new elements reach the components that display them.
    pub fn set_named(&mut self, name: &str, value: impl Into<Value>) -> Result<bool, StoreError> {
        let id = self
            .store
            .lookup_name(name)
            .ok_or_else(|| StoreError::UnknownName(name.to_owned()))?;
        let value = value.into();
        let is_list = value.kind() == VariableKind::List;
        let changed = self.store.set(id, value)?;
        if changed {
            if is_list {
                self.dispatcher.set_dependencies(DependencyIndex::build(
                    &self.tree,
                    &self.derived,
                    &self.store,
                ));
            }
            refresh(&self.derived, &mut self.store);
            let affected = self.dispatcher.dependencies().affected(id);
            mark_dirty(&self.tree, &mut self.layout, &affected);
        }
        Ok(changed)
    }

    pub fn get(&self, id: VariableId) -> Result<&Value, StoreError> {
        self.store.get(id)
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn layout(&self) -> &ComputedLayout {
        &self.layout
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn profile(&self) -> &'static Profile {
        self.profile
    }

    pub fn viewport(&self) -> Size<f32> {
        self.viewport
    }

    // =========================================================================
    // Component State
    // =========================================================================

    fn id_at(&self, index: usize) -> Option<ComponentId> {
        self.tree.node(index).map(|n| n.id)
    }

    /// Whether any component has pending invalidation.
    pub fn is_dirty(&self) -> bool {
        (0..self.layout.len()).any(|i| self.layout.is_dirty(i))
    }

    pub fn phase(&self, component: ComponentId) -> Option<LayoutPhase> {
        self.tree.index_of(component).map(|i| self.layout.phase(i))
    }

    pub fn visibility(&self, component: ComponentId) -> Option<Visibility> {
        self.tree.index_of(component).map(|i| self.layout.visibility(i))
    }

    /// Absolute origin and size from the last layout pass.
    pub fn component_bounds(&self, component: ComponentId) -> Option<(Point<f32>, Size<f32>)> {
        self.tree
            .index_of(component)
            .map(|i| (self.layout.origin(i), self.layout.size(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DocumentWriter;
    use crate::engine::LinearLayout;
    use crate::input::ActionEffect;
    use crate::layout::MonospaceMeasure;
    use crate::profile::{CORE_V1, CORE_V3};
    use crate::types::{Dimension, Rgba};

    struct Fixture {
        document: Document,
        count: VariableId,
        label: VariableId,
        button: ComponentId,
    }

    fn viewport() -> Size<f32> {
        Size { width: 80.0, height: 24.0 }
    }

    fn setup() -> Fixture {
        let mut w = DocumentWriter::new(&CORE_V3);
        let count = w.variable(0).unwrap();
        w.name(count, "count").unwrap();
        let label = w.text_from_number(count, 0).unwrap();
        let color = w.color(Rgba::BLACK).unwrap();
        let bump = w
            .action(ActionEffect::ValueIntegerChange { target: count, value: 7 })
            .unwrap();
        w.width(Dimension::Fill).unwrap();
        let root = w.start_column(LinearLayout::default()).unwrap();
        w.on_touch(TouchTrigger::Down, &[bump]).unwrap();
        let button = w.text_component(label, color, 1.0).unwrap();
        w.end().unwrap();
        assert_eq!(root, ComponentId(1));
        let bytes = w.finish().unwrap();
        Fixture {
            document: Document::from_bytes(&bytes, &PlayerConfig::default()).unwrap(),
            count,
            label,
            button,
        }
    }

    #[test]
    fn test_from_bytes_refreshes_derived() {
        let f = setup();
        assert_eq!(f.document.store().get_text(f.label), Ok("0"));
        assert_eq!(f.document.profile().api_level, 3);
        assert_eq!(f.document.phase(f.button), Some(LayoutPhase::Unmeasured));
        assert!(f.document.is_dirty());
    }

    #[test]
    fn test_rejects_incompatible_runtime() {
        let mut w = DocumentWriter::new(&CORE_V3);
        w.start_row(LinearLayout::default()).unwrap();
        w.end().unwrap();
        let bytes = w.finish().unwrap();
        let config = PlayerConfig::default().with_profile(&CORE_V1);
        assert!(matches!(
            Document::from_bytes(&bytes, &config),
            Err(DecodeError::IncompatibleProfile { .. })
        ));
    }

    #[test]
    fn test_touch_cycle() {
        let mut f = setup();
        let measure = MonospaceMeasure::TERMINAL;
        assert!(f.document.update(viewport(), &measure).is_empty());
        assert!(!f.document.is_dirty());

        assert!(f.document.on_touch_down(f.button, Point { x: 0.5, y: 0.5 }));
        assert_eq!(f.document.store().get_int(f.count), Ok(7));
        assert!(f.document.is_dirty());
        assert_eq!(f.document.pending_invalidations().len(), 1);

        let records = f.document.update(viewport(), &measure);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].component, f.button);
        assert!(f.document.pending_invalidations().is_empty());
        assert!(!f.document.on_touch_up(f.button));
        assert!(!f.document.on_touch_down(ComponentId(99), Point { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn test_touch_target_and_bounds() {
        let mut f = setup();
        f.document.update(viewport(), &MonospaceMeasure::TERMINAL);
        let point = Point { x: 0.5, y: 0.5 };
        assert_eq!(f.document.component_at(point), Some(f.button));
        assert_eq!(f.document.touch_target(point, TouchTrigger::Down), Some(f.button));
        assert_eq!(f.document.touch_target(point, TouchTrigger::Up), None);
        assert_eq!(
            f.document.component_bounds(ComponentId(1)),
            Some((Point { x: 0.0, y: 0.0 }, Size { width: 80.0, height: 1.0 }))
        );
    }

    #[test]
    fn test_set_named() {
        let mut f = setup();
        f.document.update(viewport(), &MonospaceMeasure::TERMINAL);
        assert_eq!(f.document.set_named("count", 3), Ok(true));
        assert_eq!(f.document.store().get_text(f.label), Ok("3"));
        assert!(f.document.is_dirty());
        assert_eq!(f.document.set_named("count", 3), Ok(false));
        assert_eq!(
            f.document.set_named("missing", 1),
            Err(StoreError::UnknownName("missing".into()))
        );
    }

    #[test]
    fn test_initialize_restores_decoded_state() {
        let mut f = setup();
        f.document.update(viewport(), &MonospaceMeasure::TERMINAL);
        f.document.on_touch_down(f.button, Point { x: 0.5, y: 0.5 });
        f.document.initialize();
        assert_eq!(f.document.store().get_int(f.count), Ok(0));
        assert_eq!(f.document.store().get_text(f.label), Ok("0"));
        assert!(f.document.pending_invalidations().is_empty());
        assert_eq!(f.document.phase(f.button), Some(LayoutPhase::Unmeasured));
    }
}
