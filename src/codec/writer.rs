//! Writers - byte-level output and the profile-checked document builder.
//!
//! # API
//!
//! - [`WireWriter`] - big-endian primitive writes
//! - [`encode_document`] - header + operations for a target profile
//! - [`DocumentWriter`] - builder that assigns ids, interns constants and
//!   rejects operations outside its profile as soon as they are added
//!
//! # Example
//!
//! ```
//! use spark_remote::codec::DocumentWriter;
//! use spark_remote::engine::LinearLayout;
//! use spark_remote::profile::CORE_V1;
//! use spark_remote::types::{Dimension, Rgba};
//!
//! let mut writer = DocumentWriter::new(&CORE_V1);
//! let hello = writer.text("hello")?;
//! let black = writer.color(Rgba::BLACK)?;
//! writer.width(Dimension::Fill)?;
//! writer.start_column(LinearLayout::default())?;
//! writer.text_component(hello, black, 12.0)?;
//! writer.end()?;
//! let bytes = writer.finish()?;
//! assert_eq!(&bytes[..4], &[0, 1, 0, 0]);
//! # Ok::<(), spark_remote::error::EncodeError>(())
//! ```

use crate::engine::{BoxLayout, LinearLayout, Modifier, TextContent};
use crate::error::EncodeError;
use crate::input::{Action, ActionEffect};
use crate::profile::Profile;
use crate::state::{Expression, Value, VariableStore};
use crate::types::{
    ActionId, ComponentId, Dimension, Padding, Rgba, TouchTrigger, VariableId, VisibilitySource,
};

use super::header::{Header, HEADER_LEN};
use super::opcode as op;
use super::operation::{DataOp, ExpressionOp, LayoutOp, Operation};

// =============================================================================
// Wire Writer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn variable(&mut self, id: VariableId) {
        self.u32(id.get());
    }

    pub fn component(&mut self, id: ComponentId) {
        self.u32(id.get());
    }

    pub fn action(&mut self, id: ActionId) {
        self.u32(id.get());
    }

    pub fn string(&mut self, s: &str) -> Result<(), EncodeError> {
        let len = u32::try_from(s.len()).map_err(|_| EncodeError::TooLarge(s.len()))?;
        self.u32(len);
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    pub fn id_list(
        &mut self,
        what: &'static str,
        ids: impl ExactSizeIterator<Item = u32>,
    ) -> Result<(), EncodeError> {
        let count = ids.len();
        let count_u16 =
            u16::try_from(count).map_err(|_| EncodeError::TooManyEntries { what, count })?;
        self.u16(count_u16);
        for id in ids {
            self.u32(id);
        }
        Ok(())
    }
}

// =============================================================================
// Document Encoding
// =============================================================================

fn check(profile: &Profile, opcode: u8) -> Result<(), EncodeError> {
    if profile.allows(opcode) {
        Ok(())
    } else {
        Err(EncodeError::UnsupportedOperation { opcode, profile: profile.name })
    }
}

/// Encode `ops` as a complete document for `profile`.
pub fn encode_document(ops: &[Operation], profile: &Profile) -> Result<Vec<u8>, EncodeError> {
    let mut body = WireWriter::new();
    for operation in ops {
        check(profile, operation.opcode())?;
        operation.encode(&mut body)?;
    }
    let length = u32::try_from(body.len()).map_err(|_| EncodeError::TooLarge(body.len()))?;
    let header = Header {
        api_level: profile.api_level,
        profile_id: profile.id,
        length,
    };
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(body.as_bytes());
    log::debug!(
        target: "spark_remote::codec",
        "encoded {} operations ({} bytes) for profile {}@{}",
        ops.len(),
        out.len(),
        profile.name,
        profile.api_level
    );
    Ok(out)
}

// =============================================================================
// Document Writer
// =============================================================================

/// Profile-checked document builder.
///
/// Modifier calls apply to the next component call, the same way modifier
/// operations attach on the wire.
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    profile: &'static Profile,
    ops: Vec<Operation>,
    store: VariableStore,
    next_component: u32,
    next_action: u32,
}

impl DocumentWriter {
    pub fn new(profile: &'static Profile) -> Self {
        Self {
            profile,
            ops: Vec::new(),
            store: VariableStore::new(),
            next_component: 1,
            next_action: 1,
        }
    }

    pub fn profile(&self) -> &'static Profile {
        self.profile
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    fn push(&mut self, op: Operation) -> Result<(), EncodeError> {
        check(self.profile, op.opcode())?;
        self.ops.push(op);
        Ok(())
    }

    fn data_op(id: VariableId, value: &Value) -> Operation {
        Operation::Data(match value {
            Value::Int(v) => DataOp::Integer { id, value: *v },
            Value::Float(v) => DataOp::Float { id, value: *v },
            Value::Text(s) => DataOp::Text { id, text: s.clone() },
            Value::Color(c) => DataOp::Color { id, color: *c },
            Value::List(items) => DataOp::List { id, items: items.clone() },
        })
    }

    fn constant(&mut self, value: Value) -> Result<VariableId, EncodeError> {
        let before = self.store.len();
        check(self.profile, Self::data_op(VariableId(0), &value).opcode())?;
        let id = self.store.declare(value.clone());
        if self.store.len() > before {
            self.ops.push(Self::data_op(id, &value));
        }
        Ok(id)
    }

    fn mutable(&mut self, value: Value) -> Result<VariableId, EncodeError> {
        check(self.profile, Self::data_op(VariableId(0), &value).opcode())?;
        let id = self.store.declare_mutable(value.clone());
        self.ops.push(Self::data_op(id, &value));
        Ok(id)
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Interned integer constant.
    pub fn integer(&mut self, value: i32) -> Result<VariableId, EncodeError> {
        self.constant(Value::Int(value))
    }

    /// Interned float constant.
    pub fn float(&mut self, value: f32) -> Result<VariableId, EncodeError> {
        self.constant(Value::Float(value))
    }

    /// Interned text constant.
    pub fn text(&mut self, value: &str) -> Result<VariableId, EncodeError> {
        self.constant(Value::from(value))
    }

    /// Interned color constant.
    pub fn color(&mut self, value: Rgba) -> Result<VariableId, EncodeError> {
        self.constant(Value::Color(value))
    }

    /// Interned list of variable ids.
    pub fn list(&mut self, items: &[VariableId]) -> Result<VariableId, EncodeError> {
        self.constant(Value::List(items.to_vec()))
    }

    /// Mutable variable with an initial value. Never interned.
    pub fn variable(&mut self, initial: impl Into<Value>) -> Result<VariableId, EncodeError> {
        self.mutable(initial.into())
    }

    /// Expose `id` under a host-visible name.
    pub fn name(&mut self, id: VariableId, name: &str) -> Result<(), EncodeError> {
        self.push(Operation::Data(DataOp::Named { id, name: name.to_string() }))
    }

    // =========================================================================
    // Derived
    // =========================================================================

    fn derived(
        &mut self,
        opcode: u8,
        initial: Value,
        build: impl FnOnce(VariableId) -> ExpressionOp,
    ) -> Result<VariableId, EncodeError> {
        check(self.profile, opcode)?;
        let id = self.store.declare_mutable(initial);
        self.ops.push(Operation::Expression(build(id)));
        Ok(id)
    }

    pub fn integer_expression(&mut self, expression: Expression) -> Result<VariableId, EncodeError> {
        self.derived(op::INTEGER_EXPRESSION, Value::Int(0), |id| ExpressionOp::Integer { id, expression })
    }

    pub fn float_expression(&mut self, expression: Expression) -> Result<VariableId, EncodeError> {
        self.derived(op::FLOAT_EXPRESSION, Value::Float(0.0), |id| ExpressionOp::Float { id, expression })
    }

    pub fn text_lookup(&mut self, list: VariableId, index: VariableId) -> Result<VariableId, EncodeError> {
        self.derived(op::TEXT_LOOKUP, Value::Text(String::new()), |id| ExpressionOp::TextLookup { id, list, index })
    }

    pub fn text_from_number(&mut self, source: VariableId, digits: u8) -> Result<VariableId, EncodeError> {
        self.derived(op::TEXT_FROM_NUMBER, Value::Text(String::new()), |id| ExpressionOp::TextFromNumber {
            id,
            source,
            digits,
        })
    }

    // =========================================================================
    // Components
    // =========================================================================

    fn component(&mut self, build: impl FnOnce(ComponentId) -> LayoutOp) -> Result<ComponentId, EncodeError> {
        let component = ComponentId(self.next_component);
        self.push(Operation::Layout(build(component)))?;
        self.next_component += 1;
        Ok(component)
    }

    pub fn start_row(&mut self, layout: LinearLayout) -> Result<ComponentId, EncodeError> {
        self.component(|component| LayoutOp::Row { component, layout })
    }

    pub fn start_column(&mut self, layout: LinearLayout) -> Result<ComponentId, EncodeError> {
        self.component(|component| LayoutOp::Column { component, layout })
    }

    pub fn start_box(&mut self, layout: BoxLayout) -> Result<ComponentId, EncodeError> {
        self.component(|component| LayoutOp::Box { component, layout })
    }

    /// Close the innermost open container.
    pub fn end(&mut self) -> Result<(), EncodeError> {
        self.push(Operation::Layout(LayoutOp::End))
    }

    /// Text leaf with regular weight.
    pub fn text_component(
        &mut self,
        text: VariableId,
        color: VariableId,
        font_size: f32,
    ) -> Result<ComponentId, EncodeError> {
        self.styled_text(TextContent { text, color, font_size, weight: 400, italic: false })
    }

    pub fn styled_text(&mut self, content: TextContent) -> Result<ComponentId, EncodeError> {
        self.component(|component| LayoutOp::Text { component, content })
    }

    pub fn spacer(&mut self) -> Result<ComponentId, EncodeError> {
        self.component(|component| LayoutOp::Spacer { component })
    }

    // =========================================================================
    // Modifiers (apply to the next component)
    // =========================================================================

    pub fn modifier(&mut self, modifier: Modifier) -> Result<(), EncodeError> {
        self.push(Operation::Modifier(modifier))
    }

    pub fn width(&mut self, width: Dimension) -> Result<(), EncodeError> {
        self.modifier(Modifier::Width(width))
    }

    pub fn height(&mut self, height: Dimension) -> Result<(), EncodeError> {
        self.modifier(Modifier::Height(height))
    }

    pub fn padding(&mut self, padding: Padding) -> Result<(), EncodeError> {
        self.modifier(Modifier::Padding(padding))
    }

    pub fn background(&mut self, color: VariableId) -> Result<(), EncodeError> {
        self.modifier(Modifier::Background(color))
    }

    pub fn border(&mut self, width: f32, color: VariableId) -> Result<(), EncodeError> {
        self.modifier(Modifier::Border { width, color })
    }

    pub fn visibility(&mut self, source: VisibilitySource) -> Result<(), EncodeError> {
        self.modifier(Modifier::Visibility(source))
    }

    pub fn on_touch(&mut self, trigger: TouchTrigger, actions: &[ActionId]) -> Result<(), EncodeError> {
        self.modifier(Modifier::TouchAction { trigger, actions: actions.to_vec() })
    }

    // =========================================================================
    // Actions
    // =========================================================================

    pub fn action(&mut self, effect: ActionEffect) -> Result<ActionId, EncodeError> {
        let id = ActionId(self.next_action);
        self.push(Operation::Action(Action::new(id, effect)))?;
        self.next_action += 1;
        Ok(id)
    }

    /// Encode everything added so far.
    pub fn finish(self) -> Result<Vec<u8>, EncodeError> {
        encode_document(&self.ops, self.profile)
    }
}
