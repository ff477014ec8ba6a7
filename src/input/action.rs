//! Actions - declared state mutations bound to touch triggers.
//!
//! Applying an action writes one store slot (or, for host actions, asks the
//! host to do something). Applying the same literal twice leaves the value
//! unchanged but is still reported, so the dispatcher can invalidate.

use crate::codec::opcode;
use crate::error::StoreError;
use crate::state::{Value, VariableStore};
use crate::types::{ActionId, VariableId};

/// What an action does when triggered.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    ValueIntegerChange { target: VariableId, value: i32 },
    ValueFloatChange { target: VariableId, value: f32 },
    /// Copy the text held by variable `text` into `target`.
    ValueStringChange { target: VariableId, text: VariableId },
    /// Write the current value of integer variable `expression` into `target`.
    ///
    /// `expression` is normally a derived integer slot; derived values are
    /// refreshed before every action, so the value read is current.
    ValueIntegerExpressionChange { target: VariableId, expression: VariableId },
    /// Forward an opaque id to the host.
    Host { host_id: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: ActionId,
    pub effect: ActionEffect,
}

/// Result of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A store slot was written. `changed` is false for a same-value write.
    Mutated { target: VariableId, changed: bool },
    /// The host must handle `host_id`.
    Host(u32),
}

impl Action {
    pub fn new(id: ActionId, effect: ActionEffect) -> Self {
        Self { id, effect }
    }

    pub fn opcode(&self) -> u8 {
        match self.effect {
            ActionEffect::ValueIntegerChange { .. } => opcode::VALUE_INTEGER_CHANGE,
            ActionEffect::ValueFloatChange { .. } => opcode::VALUE_FLOAT_CHANGE,
            ActionEffect::ValueStringChange { .. } => opcode::VALUE_STRING_CHANGE,
            ActionEffect::ValueIntegerExpressionChange { .. } => {
                opcode::VALUE_INTEGER_EXPRESSION_CHANGE
            }
            ActionEffect::Host { .. } => opcode::HOST_ACTION,
        }
    }

    /// Variable written by the action, if any.
    pub fn target(&self) -> Option<VariableId> {
        match self.effect {
            ActionEffect::ValueIntegerChange { target, .. }
            | ActionEffect::ValueFloatChange { target, .. }
            | ActionEffect::ValueStringChange { target, .. }
            | ActionEffect::ValueIntegerExpressionChange { target, .. } => Some(target),
            ActionEffect::Host { .. } => None,
        }
    }

    pub fn apply(&self, store: &mut VariableStore) -> Result<ActionOutcome, StoreError> {
        let (target, value) = match &self.effect {
            ActionEffect::ValueIntegerChange { target, value } => (*target, Value::Int(*value)),
            ActionEffect::ValueFloatChange { target, value } => (*target, Value::Float(*value)),
            ActionEffect::ValueStringChange { target, text } => {
                (*target, Value::Text(store.get_text(*text)?.to_string()))
            }
            ActionEffect::ValueIntegerExpressionChange { target, expression } => {
                (*target, Value::Int(store.get_scalar(*expression)?.as_i32()))
            }
            ActionEffect::Host { host_id } => return Ok(ActionOutcome::Host(*host_id)),
        };
        let changed = store.set(target, value)?;
        Ok(ActionOutcome::Mutated { target, changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (VariableStore, VariableId, VariableId) {
        let mut store = VariableStore::new();
        let count = store.declare_mutable(Value::Int(0));
        let label = store.declare_mutable(Value::from("idle"));
        (store, count, label)
    }

    #[test]
    fn test_integer_change() {
        let (mut store, count, _) = setup();
        let action = Action::new(
            ActionId(1),
            ActionEffect::ValueIntegerChange { target: count, value: 3 },
        );
        assert_eq!(
            action.apply(&mut store),
            Ok(ActionOutcome::Mutated { target: count, changed: true })
        );
        assert_eq!(
            action.apply(&mut store),
            Ok(ActionOutcome::Mutated { target: count, changed: false })
        );
        assert_eq!(store.get_int(count), Ok(3));
        assert_eq!(action.target(), Some(count));
    }

    #[test]
    fn test_string_change_copies_text() {
        let (mut store, _, label) = setup();
        let busy = store.declare(Value::from("busy"));
        let action = Action::new(
            ActionId(2),
            ActionEffect::ValueStringChange { target: label, text: busy },
        );
        action.apply(&mut store).unwrap();
        assert_eq!(store.get_text(label), Ok("busy"));
    }

    #[test]
    fn test_expression_change_reads_current_value() {
        let (mut store, count, _) = setup();
        let source = store.declare_mutable(Value::Int(41));
        let action = Action::new(
            ActionId(3),
            ActionEffect::ValueIntegerExpressionChange { target: count, expression: source },
        );
        action.apply(&mut store).unwrap();
        assert_eq!(store.get_int(count), Ok(41));
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let (mut store, _, label) = setup();
        let action = Action::new(
            ActionId(4),
            ActionEffect::ValueFloatChange { target: label, value: 1.0 },
        );
        assert!(matches!(
            action.apply(&mut store),
            Err(StoreError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_host_action() {
        let (mut store, _, _) = setup();
        let action = Action::new(ActionId(5), ActionEffect::Host { host_id: 77 });
        assert_eq!(action.apply(&mut store), Ok(ActionOutcome::Host(77)));
        assert_eq!(action.target(), None);
        assert_eq!(action.opcode(), opcode::HOST_ACTION);
    }
}
