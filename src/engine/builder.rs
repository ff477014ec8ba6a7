//! Tree builder - turns a decoded operation list into document state.
//!
//! Walks the operations once:
//!
//! - data operations fill the store under their writer-assigned ids
//! - expression operations register derived slots
//! - modifiers accumulate until the next component operation takes them
//! - container operations open a scope that `ContainerEnd` closes
//! - action operations fill the action table
//!
//! Structural problems (second root, unbalanced scopes, dangling modifiers,
//! excessive nesting) are decode errors; no partial tree is produced.

use std::collections::HashMap;

use crate::codec::{DataOp, ExpressionOp, LayoutOp, Operation};
use crate::error::DecodeError;
use crate::input::Action;
use crate::state::{DerivedValue, DerivedVariable, Value, VariableStore};
use crate::types::{ActionId, ComponentId, VariableId};

use super::component::{ComponentKind, ComponentNode, ComponentTree};
use super::modifier::{Modifier, ModifierChain};

/// Everything a document owns after construction.
#[derive(Debug, Clone, Default)]
pub struct BuiltDocument {
    pub store: VariableStore,
    pub derived: Vec<DerivedVariable>,
    pub tree: ComponentTree,
    pub actions: HashMap<ActionId, Action>,
}

/// Build store, derived slots, component tree and action table.
pub fn build(ops: &[Operation], max_depth: usize) -> Result<BuiltDocument, DecodeError> {
    let mut builder = Builder::default();
    for op in ops {
        builder.apply(op, max_depth)?;
    }
    builder.finish()
}

#[derive(Default)]
struct Builder {
    out: BuiltDocument,
    nodes: Vec<ComponentNode>,
    seen_components: HashMap<ComponentId, usize>,
    open: Vec<usize>,
    pending: Vec<Modifier>,
}

impl Builder {
    fn apply(&mut self, op: &Operation, max_depth: usize) -> Result<(), DecodeError> {
        match op {
            Operation::Data(data) => self.data(data),
            Operation::Expression(expr) => self.expression(expr),
            Operation::Layout(layout) => {
                let (component, kind) = match layout {
                    LayoutOp::Row { component, layout } => (*component, ComponentKind::Row(*layout)),
                    LayoutOp::Column { component, layout } => (*component, ComponentKind::Column(*layout)),
                    LayoutOp::Box { component, layout } => (*component, ComponentKind::Box(*layout)),
                    LayoutOp::Text { component, content } => (*component, ComponentKind::Text(*content)),
                    LayoutOp::Spacer { component } => (*component, ComponentKind::Spacer),
                    LayoutOp::End => return self.close(),
                };
                self.open_component(component, kind, max_depth)
            }
            Operation::Modifier(modifier) => {
                self.pending.push(modifier.clone());
                Ok(())
            }
            Operation::Action(action) => {
                if self.out.actions.insert(action.id, action.clone()).is_some() {
                    return Err(DecodeError::DuplicateAction(action.id));
                }
                Ok(())
            }
        }
    }

    fn insert(&mut self, id: VariableId, value: Value) -> Result<(), DecodeError> {
        self.out
            .store
            .insert(id, value)
            .map_err(|_| DecodeError::DuplicateVariable(id))
    }

    fn data(&mut self, data: &DataOp) -> Result<(), DecodeError> {
        match data {
            DataOp::Integer { id, value } => self.insert(*id, Value::Int(*value)),
            DataOp::Float { id, value } => self.insert(*id, Value::Float(*value)),
            DataOp::Text { id, text } => self.insert(*id, Value::Text(text.clone())),
            DataOp::Color { id, color } => self.insert(*id, Value::Color(*color)),
            DataOp::List { id, items } => self.insert(*id, Value::List(items.clone())),
            DataOp::Named { id, name } => {
                self.out.store.bind_name(name.clone(), *id);
                Ok(())
            }
        }
    }

    fn expression(&mut self, expr: &ExpressionOp) -> Result<(), DecodeError> {
        let derived = match expr {
            ExpressionOp::Integer { id, expression } => {
                DerivedVariable::new(*id, DerivedValue::Integer(expression.clone()))
            }
            ExpressionOp::Float { id, expression } => {
                DerivedVariable::new(*id, DerivedValue::Float(expression.clone()))
            }
            ExpressionOp::TextLookup { id, list, index } => {
                DerivedVariable::new(*id, DerivedValue::TextLookup { list: *list, index: *index })
            }
            ExpressionOp::TextFromNumber { id, source, digits } => DerivedVariable::new(
                *id,
                DerivedValue::TextFromNumber { source: *source, digits: *digits },
            ),
        };
        self.insert(derived.id, Value::default_for(derived.kind()))?;
        self.out.derived.push(derived);
        Ok(())
    }

    fn open_component(
        &mut self,
        id: ComponentId,
        kind: ComponentKind,
        max_depth: usize,
    ) -> Result<(), DecodeError> {
        let parent = self.open.last().copied();
        if parent.is_none() && !self.nodes.is_empty() {
            return Err(DecodeError::MalformedTree("more than one root component"));
        }
        if parent.is_none() && !kind.is_container() {
            return Err(DecodeError::MalformedTree("root component must be a container"));
        }
        if self.open.len() + 1 > max_depth {
            return Err(DecodeError::NestingTooDeep { max: max_depth });
        }

        let index = self.nodes.len();
        if self.seen_components.insert(id, index).is_some() {
            return Err(DecodeError::DuplicateComponent(id));
        }
        self.nodes.push(ComponentNode {
            id,
            kind,
            modifiers: ModifierChain::new(std::mem::take(&mut self.pending)),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        if kind.is_container() {
            self.open.push(index);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DecodeError> {
        if !self.pending.is_empty() {
            return Err(DecodeError::MalformedTree("modifiers not followed by a component"));
        }
        self.open
            .pop()
            .map(|_| ())
            .ok_or(DecodeError::MalformedTree("container end without open container"))
    }

    fn finish(mut self) -> Result<BuiltDocument, DecodeError> {
        if !self.pending.is_empty() {
            return Err(DecodeError::MalformedTree("modifiers not followed by a component"));
        }
        if !self.open.is_empty() {
            return Err(DecodeError::MalformedTree("unclosed container"));
        }
        if self.nodes.is_empty() {
            return Err(DecodeError::MalformedTree("document has no root component"));
        }
        for node in &self.nodes {
            for modifier in node.modifiers.iter() {
                if let Modifier::TouchAction { actions, .. } = modifier {
                    if let Some(missing) = actions.iter().find(|a| !self.out.actions.contains_key(a)) {
                        return Err(DecodeError::UnknownAction(*missing));
                    }
                }
            }
        }
        self.out.tree = ComponentTree::from_nodes(self.nodes);
        log::debug!(
            target: "spark_remote::engine",
            "built tree: {} components, {} variables, {} derived, {} actions",
            self.out.tree.len(),
            self.out.store.len(),
            self.out.derived.len(),
            self.out.actions.len()
        );
        Ok(self.out)
    }
}
