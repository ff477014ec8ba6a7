//! Dependency index - which components read which variables.
//!
//! Built once after the tree. A component depends on a variable when its
//! content or modifiers reference it directly, or when they reference a
//! derived slot computed from it (transitively).

use std::collections::{HashMap, HashSet, VecDeque};

use crate::state::{DerivedVariable, VariableStore};
use crate::types::VariableId;

use super::component::ComponentTree;

#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    /// Variable → arena indices of components reading it directly.
    readers: HashMap<VariableId, Vec<usize>>,
    /// Variable → derived slots computed from it.
    dependents: HashMap<VariableId, Vec<VariableId>>,
}

impl DependencyIndex {
    pub fn build(tree: &ComponentTree, derived: &[DerivedVariable], store: &VariableStore) -> Self {
        let mut index = Self::default();
        for (i, node) in tree.nodes().iter().enumerate() {
            let mut vars = node.kind.variables();
            vars.extend(node.modifiers.variables());
            for var in vars {
                let readers = index.readers.entry(var).or_default();
                if !readers.contains(&i) {
                    readers.push(i);
                }
            }
        }
        for slot in derived {
            for dep in slot.dependencies(store) {
                index.dependents.entry(dep).or_default().push(slot.id);
            }
        }
        index
    }

    /// Components affected by a write to `var`, sorted by arena index.
    pub fn affected(&self, var: VariableId) -> Vec<usize> {
        let mut seen_vars = HashSet::from([var]);
        let mut queue = VecDeque::from([var]);
        let mut components = HashSet::new();

        while let Some(current) = queue.pop_front() {
            if let Some(readers) = self.readers.get(&current) {
                components.extend(readers.iter().copied());
            }
            for &next in self.dependents.get(&current).into_iter().flatten() {
                if seen_vars.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let mut out: Vec<usize> = components.into_iter().collect();
        out.sort_unstable();
        out
    }
}
