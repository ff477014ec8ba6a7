//! Variable Store - typed, id-addressed mutable slots.
//!
//! Slots live in a dense arena; ids map to arena indices the same way the
//! component registry maps component ids to array indices.
//!
//! # API
//!
//! - `declare(value)` - Intern a literal constant (same value + kind = same id)
//! - `declare_mutable(value)` - Fresh slot, never interned
//! - `insert(id, value)` - Register a writer-assigned id
//! - `get(id)` / `get_int` / `get_float` / `get_text` / `get_color` / `get_list`
//! - `set(id, value)` - Kind-checked write
//! - `list_get(list, index)` - Element id lookup for dynamic content
//! - `bind_name` / `lookup_name` - Host-visible variable names
//!
//! Reads and writes are synchronous. A write is visible to the very next read;
//! there is no batching.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::types::{Rgba, VariableId};

use super::value::{Scalar, Value, VariableKind};

// =============================================================================
// Interning
// =============================================================================

/// Hashable identity of a literal value. Floats compare by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum InternKey {
    Int(i32),
    Float(u32),
    Text(String),
    Color(u32),
    List(Vec<u32>),
}

impl From<&Value> for InternKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(v.to_bits()),
            Value::Text(s) => Self::Text(s.clone()),
            Value::Color(c) => Self::Color(c.to_argb()),
            Value::List(ids) => Self::List(ids.iter().map(|id| id.get()).collect()),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
struct Slot {
    id: VariableId,
    value: Value,
    /// Interned constants are shared between declarations and cannot be set.
    constant: bool,
}

/// Typed mutable slots addressed by [`VariableId`].
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    slots: Vec<Slot>,
    id_to_index: HashMap<VariableId, usize>,
    interned: HashMap<InternKey, VariableId>,
    names: HashMap<String, VariableId>,
    next_id: u32,
}

impl VariableStore {
    /// Ids handed out by `declare` start here; 0 is never allocated.
    const FIRST_ID: u32 = 1;

    pub fn new() -> Self {
        Self {
            next_id: Self::FIRST_ID,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: VariableId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    /// All ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    // =========================================================================
    // Declaration
    // =========================================================================

    /// Declare a literal constant.
    ///
    /// Declaring an equal value of the same kind again returns the same id.
    pub fn declare(&mut self, value: Value) -> VariableId {
        let key = InternKey::from(&value);
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let id = self.allocate_id();
        self.push_slot(id, value, true);
        self.interned.insert(key, id);
        id
    }

    /// Declare a mutable variable. Always returns a fresh id.
    pub fn declare_mutable(&mut self, value: Value) -> VariableId {
        let id = self.allocate_id();
        self.push_slot(id, value, false);
        id
    }

    /// Register a slot under an id chosen by the document writer.
    pub fn insert(&mut self, id: VariableId, value: Value) -> Result<(), StoreError> {
        if self.contains(id) {
            return Err(StoreError::DuplicateVariable(id));
        }
        self.push_slot(id, value, false);
        self.next_id = self.next_id.max(id.get().saturating_add(1));
        Ok(())
    }

    fn allocate_id(&mut self) -> VariableId {
        while self.id_to_index.contains_key(&VariableId(self.next_id)) {
            self.next_id = self.next_id.wrapping_add(1).max(Self::FIRST_ID);
        }
        let id = VariableId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(Self::FIRST_ID);
        id
    }

    fn push_slot(&mut self, id: VariableId, value: Value, constant: bool) {
        self.id_to_index.insert(id, self.slots.len());
        self.slots.push(Slot { id, value, constant });
    }

    // =========================================================================
    // Reads
    // =========================================================================

    fn slot(&self, id: VariableId) -> Result<&Slot, StoreError> {
        self.id_to_index
            .get(&id)
            .map(|&index| &self.slots[index])
            .ok_or(StoreError::UnknownVariable(id))
    }

    pub fn get(&self, id: VariableId) -> Result<&Value, StoreError> {
        self.slot(id).map(|slot| &slot.value)
    }

    pub fn kind(&self, id: VariableId) -> Result<VariableKind, StoreError> {
        self.get(id).map(Value::kind)
    }

    /// Whether the slot is an interned constant.
    pub fn is_constant(&self, id: VariableId) -> bool {
        self.slot(id).is_ok_and(|slot| slot.constant)
    }

    pub fn get_int(&self, id: VariableId) -> Result<i32, StoreError> {
        match self.get(id)? {
            Value::Int(v) => Ok(*v),
            other => Err(mismatch(id, VariableKind::Int, other)),
        }
    }

    pub fn get_float(&self, id: VariableId) -> Result<f32, StoreError> {
        match self.get(id)? {
            Value::Float(v) => Ok(*v),
            other => Err(mismatch(id, VariableKind::Float, other)),
        }
    }

    pub fn get_text(&self, id: VariableId) -> Result<&str, StoreError> {
        match self.get(id)? {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(id, VariableKind::Text, other)),
        }
    }

    pub fn get_color(&self, id: VariableId) -> Result<Rgba, StoreError> {
        match self.get(id)? {
            Value::Color(c) => Ok(*c),
            other => Err(mismatch(id, VariableKind::Color, other)),
        }
    }

    pub fn get_list(&self, id: VariableId) -> Result<&[VariableId], StoreError> {
        match self.get(id)? {
            Value::List(ids) => Ok(ids),
            other => Err(mismatch(id, VariableKind::List, other)),
        }
    }

    /// Numeric read for expression evaluation (int or float slots).
    pub fn get_scalar(&self, id: VariableId) -> Result<Scalar, StoreError> {
        let value = self.get(id)?;
        value.as_scalar().ok_or_else(|| StoreError::KindMismatch {
            id,
            expected: "number",
            actual: value.kind().name(),
        })
    }

    /// Resolve the element id at `index` of a list variable.
    pub fn list_get(&self, list: VariableId, index: i64) -> Result<VariableId, StoreError> {
        let items = self.get_list(list)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i).copied())
            .ok_or(StoreError::IndexOutOfBounds { list, index })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write a new value. Returns whether the stored value changed.
    ///
    /// The kind of a slot never changes; a value of another kind is rejected.
    pub fn set(&mut self, id: VariableId, value: Value) -> Result<bool, StoreError> {
        let index = *self
            .id_to_index
            .get(&id)
            .ok_or(StoreError::UnknownVariable(id))?;
        let slot = &mut self.slots[index];
        if slot.constant {
            return Err(StoreError::ReadOnly(id));
        }
        if slot.value.kind() != value.kind() {
            return Err(mismatch(id, slot.value.kind(), &value));
        }
        let changed = slot.value != value;
        slot.value = value;
        Ok(changed)
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Expose a variable under a host-visible name. Rebinding replaces.
    pub fn bind_name(&mut self, name: impl Into<String>, id: VariableId) {
        self.names.insert(name.into(), id);
    }

    pub fn lookup_name(&self, name: &str) -> Option<VariableId> {
        self.names.get(name).copied()
    }
}

fn mismatch(id: VariableId, expected: VariableKind, actual: &Value) -> StoreError {
    StoreError::KindMismatch {
        id,
        expected: expected.name(),
        actual: actual.kind().name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> VariableStore {
        VariableStore::new()
    }

    #[test]
    fn test_declare_interns_constants() {
        let mut store = setup();
        let a = store.declare(Value::from("hello"));
        let b = store.declare(Value::from("hello"));
        let c = store.declare(Value::from("world"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_interning_is_kind_aware() {
        let mut store = setup();
        let int_one = store.declare(Value::Int(1));
        let float_one = store.declare(Value::Float(1.0));
        assert_ne!(int_one, float_one);
        assert_eq!(store.declare(Value::Float(1.0)), float_one);
    }

    #[test]
    fn test_declare_mutable_is_fresh() {
        let mut store = setup();
        let a = store.declare_mutable(Value::Int(0));
        let b = store.declare_mutable(Value::Int(0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_unknown() {
        let store = setup();
        assert_eq!(
            store.get(VariableId(99)),
            Err(StoreError::UnknownVariable(VariableId(99)))
        );
    }

    #[test]
    fn test_set_checks_kind() {
        let mut store = setup();
        let id = store.declare_mutable(Value::Int(1));
        assert_eq!(store.set(id, Value::Int(5)), Ok(true));
        assert_eq!(store.get_int(id), Ok(5));
        assert_eq!(store.set(id, Value::Int(5)), Ok(false));

        let err = store.set(id, Value::from("nope")).unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { expected: "int", actual: "text", .. }));
        // Failed write leaves the value untouched.
        assert_eq!(store.get_int(id), Ok(5));
    }

    #[test]
    fn test_typed_getters_report_mismatch() {
        let mut store = setup();
        let id = store.declare(Value::from("text"));
        assert!(matches!(store.get_int(id), Err(StoreError::KindMismatch { .. })));
        assert!(matches!(store.get_scalar(id), Err(StoreError::KindMismatch { .. })));
        assert_eq!(store.get_text(id), Ok("text"));
    }

    #[test]
    fn test_constants_are_read_only() {
        let mut store = setup();
        let id = store.declare(Value::Int(3));
        assert_eq!(store.set(id, Value::Int(4)), Err(StoreError::ReadOnly(id)));
    }

    #[test]
    fn test_insert_explicit_ids() {
        let mut store = setup();
        store.insert(VariableId(10), Value::Int(1)).unwrap();
        assert_eq!(
            store.insert(VariableId(10), Value::Int(2)),
            Err(StoreError::DuplicateVariable(VariableId(10)))
        );
        // Later declarations never collide with explicit ids.
        let fresh = store.declare_mutable(Value::Int(0));
        assert!(fresh.get() > 10);
    }

    #[test]
    fn test_list_get() {
        let mut store = setup();
        let a = store.declare(Value::from("zero"));
        let b = store.declare(Value::from("one"));
        let list = store.declare(Value::List(vec![a, b]));

        assert_eq!(store.list_get(list, 1), Ok(b));
        assert_eq!(store.get_text(store.list_get(list, 0).unwrap()), Ok("zero"));
        assert_eq!(
            store.list_get(list, 2),
            Err(StoreError::IndexOutOfBounds { list, index: 2 })
        );
        assert!(store.list_get(list, -1).is_err());
    }

    #[test]
    fn test_names() {
        let mut store = setup();
        let id = store.declare_mutable(Value::Int(0));
        store.bind_name("counter", id);
        assert_eq!(store.lookup_name("counter"), Some(id));
        assert_eq!(store.lookup_name("missing"), None);
    }
}
