//! Derived variables - store slots recomputed from other slots.
//!
//! Expression and lookup operations declare a variable whose value is a
//! function of the store. `refresh` recomputes every derived slot in
//! declaration order and writes the result back, so later derived values see
//! the fresh results of earlier ones within the same pass.
//!
//! A derived slot that cannot be computed (missing variable, kind mismatch,
//! list index out of range) takes the default value for its kind and the
//! failure is logged. The frame continues.

use crate::error::StoreError;
use crate::types::VariableId;

use super::expression::{evaluate, Expression};
use super::store::VariableStore;
use super::value::{Value, VariableKind};

/// How a derived slot computes its value.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedValue {
    /// Integer result of an expression (floats truncate).
    Integer(Expression),
    /// Float result of an expression.
    Float(Expression),
    /// Text element of `list` selected by the integer variable `index`.
    TextLookup { list: VariableId, index: VariableId },
    /// Decimal rendering of a numeric variable.
    ///
    /// `digits` is the number of fraction digits for float sources; integer
    /// sources render without a fraction.
    TextFromNumber { source: VariableId, digits: u8 },
}

/// A derived slot together with its recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedVariable {
    pub id: VariableId,
    pub source: DerivedValue,
}

impl DerivedVariable {
    pub fn new(id: VariableId, source: DerivedValue) -> Self {
        Self { id, source }
    }

    pub fn kind(&self) -> VariableKind {
        match self.source {
            DerivedValue::Integer(_) => VariableKind::Int,
            DerivedValue::Float(_) => VariableKind::Float,
            DerivedValue::TextLookup { .. } | DerivedValue::TextFromNumber { .. } => {
                VariableKind::Text
            }
        }
    }

    /// Variables read when computing this slot.
    ///
    /// For a lookup this includes every element of the list as it currently
    /// stands, since any of them may become the selected one.
    pub fn dependencies(&self, store: &VariableStore) -> Vec<VariableId> {
        match &self.source {
            DerivedValue::Integer(expr) | DerivedValue::Float(expr) => expr.variables(),
            DerivedValue::TextLookup { list, index } => {
                let mut deps = vec![*list, *index];
                if let Ok(items) = store.get_list(*list) {
                    for id in items.iter().copied() {
                        if !deps.contains(&id) {
                            deps.push(id);
                        }
                    }
                }
                deps
            }
            DerivedValue::TextFromNumber { source, .. } => vec![*source],
        }
    }

    /// Compute the current value without writing it.
    pub fn compute(&self, store: &VariableStore) -> Result<Value, StoreError> {
        match &self.source {
            DerivedValue::Integer(expr) => Ok(Value::Int(evaluate(expr, store)?.as_i32())),
            DerivedValue::Float(expr) => Ok(Value::Float(evaluate(expr, store)?.as_f32())),
            DerivedValue::TextLookup { list, index } => {
                let index = store.get_int(*index)?;
                let element = store.list_get(*list, i64::from(index))?;
                Ok(Value::Text(store.get_text(element)?.to_string()))
            }
            DerivedValue::TextFromNumber { source, digits } => {
                let text = match store.get(*source)? {
                    Value::Int(v) => v.to_string(),
                    Value::Float(v) => format!("{:.*}", usize::from(*digits), v),
                    other => {
                        return Err(StoreError::KindMismatch {
                            id: *source,
                            expected: "number",
                            actual: other.kind().name(),
                        });
                    }
                };
                Ok(Value::Text(text))
            }
        }
    }
}

/// Recompute every derived slot in order. Returns the ids whose value changed.
pub fn refresh(derived: &[DerivedVariable], store: &mut VariableStore) -> Vec<VariableId> {
    let mut changed = Vec::new();
    for var in derived {
        let value = match var.compute(store) {
            Ok(value) => value,
            Err(err) => {
                log::warn!(
                    target: "spark_remote::state",
                    "derived {} falls back to default: {err}",
                    var.id
                );
                Value::default_for(var.kind())
            }
        };
        match store.set(var.id, value) {
            Ok(true) => changed.push(var.id),
            Ok(false) => {}
            Err(err) => {
                log::warn!(target: "spark_remote::state", "derived {} not written: {err}", var.id);
            }
        }
    }
    changed
}
