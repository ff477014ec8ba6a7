//! Shared document for hosts that deliver input on another thread.
//!
//! A [`Document`] is single-threaded. `SharedDocument` puts it behind one
//! coarse lock so applying an action and rendering a frame never
//! interleave. Clones share the same document.
//!
//! # Example
//!
//! ```ignore
//! let shared = SharedDocument::new(document);
//! let input = shared.clone();
//! std::thread::spawn(move || {
//!     input.on_touch_down(button, Point { x: 1.0, y: 1.0 });
//! });
//! shared.render_frame(viewport, &mut painter);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use taffy::geometry::{Point, Size};

use crate::document::Document;
use crate::input::{HostActionEvent, Invalidation};
use crate::pipeline::Painter;
use crate::types::ComponentId;

#[derive(Debug, Clone)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self { inner: Arc::new(Mutex::new(document)) }
    }

    pub fn on_touch_down(&self, component: ComponentId, position: Point<f32>) -> bool {
        self.inner.lock().on_touch_down(component, position)
    }

    pub fn on_touch_up(&self, component: ComponentId) -> bool {
        self.inner.lock().on_touch_up(component)
    }

    /// Update and paint under the lock.
    pub fn render_frame<P: Painter>(&self, viewport: Size<f32>, painter: &mut P) -> Vec<Invalidation> {
        self.inner.lock().render_frame(viewport, painter)
    }

    pub fn drain_host_actions(&self) -> Vec<HostActionEvent> {
        self.inner.lock().drain_host_actions()
    }

    /// Run `f` with exclusive access to the document.
    pub fn with<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
