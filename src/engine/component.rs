//! Component tree - arena of owned nodes addressed by index.
//!
//! Nodes are stored in declaration (pre-order) order. Every node but the
//! root has exactly one parent; children are kept in declaration order.
//! The shape of the tree never changes after it is built. Derived layout
//! state lives next to it in [`crate::layout::ComputedLayout`].

use std::collections::HashMap;

use crate::types::{Alignment, Arrangement, ComponentId, VariableId};

use super::modifier::ModifierChain;

// =============================================================================
// Layout Manager Parameters
// =============================================================================

/// Row / Column parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearLayout {
    /// Main-axis distribution.
    pub arrangement: Arrangement,
    /// Cross-axis alignment.
    pub alignment: Alignment,
    /// Gap between consecutive children.
    pub spacing: f32,
}

/// Box parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxLayout {
    pub horizontal: Alignment,
    pub vertical: Alignment,
}

/// Text leaf content. Text and color are variable references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextContent {
    pub text: VariableId,
    pub color: VariableId,
    pub font_size: f32,
    pub weight: u16,
    pub italic: bool,
}

/// What a component is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentKind {
    Row(LinearLayout),
    Column(LinearLayout),
    Box(BoxLayout),
    Text(TextContent),
    Spacer,
}

impl ComponentKind {
    #[inline]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Row(_) | Self::Column(_) | Self::Box(_))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Row(_) => "row",
            Self::Column(_) => "column",
            Self::Box(_) => "box",
            Self::Text(_) => "text",
            Self::Spacer => "spacer",
        }
    }

    /// Variables read by the component's own content.
    pub fn variables(&self) -> Vec<VariableId> {
        match self {
            Self::Text(content) if content.text == content.color => vec![content.text],
            Self::Text(content) => vec![content.text, content.color],
            _ => Vec::new(),
        }
    }
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub modifiers: ModifierChain,
    /// Arena index of the parent, `None` for the root.
    pub parent: Option<usize>,
    /// Arena indices of the children, in declaration order.
    pub children: Vec<usize>,
}

/// Immutable component tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentTree {
    nodes: Vec<ComponentNode>,
    index: HashMap<ComponentId, usize>,
}

impl ComponentTree {
    /// Assemble from nodes whose links are already consistent.
    pub(crate) fn from_nodes(nodes: Vec<ComponentNode>) -> Self {
        let index = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        Self { nodes, index }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of the root. The root is always the first node.
    pub fn root(&self) -> Option<usize> {
        if self.nodes.is_empty() { None } else { Some(0) }
    }

    pub fn node(&self, index: usize) -> Option<&ComponentNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[ComponentNode] {
        &self.nodes
    }

    /// Arena index of a component id.
    pub fn index_of(&self, id: ComponentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentNode> {
        self.index_of(id).and_then(|i| self.nodes.get(i))
    }

    /// Arena indices of `index` and all its descendants, pre-order.
    pub fn subtree(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![index];
        while let Some(i) = stack.pop() {
            let Some(node) = self.nodes.get(i) else { continue };
            out.push(i);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Parent chain of `index`, nearest first, excluding `index` itself.
    pub fn ancestors(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(index).and_then(|n| n.parent);
        while let Some(i) = current {
            out.push(i);
            current = self.nodes.get(i).and_then(|n| n.parent);
        }
        out
    }

    /// Depth of `index` below the root (root = 0).
    pub fn depth(&self, index: usize) -> usize {
        self.ancestors(index).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32, kind: ComponentKind, parent: Option<usize>, children: Vec<usize>) -> ComponentNode {
        ComponentNode {
            id: ComponentId(id),
            kind,
            modifiers: ModifierChain::default(),
            parent,
            children,
        }
    }

    fn setup() -> ComponentTree {
        // 0: column
        //   1: row
        //     2: spacer
        //   3: spacer
        let column = ComponentKind::Column(LinearLayout::default());
        let row = ComponentKind::Row(LinearLayout::default());
        ComponentTree::from_nodes(vec![
            node(10, column, None, vec![1, 3]),
            node(11, row, Some(0), vec![2]),
            node(12, ComponentKind::Spacer, Some(1), vec![]),
            node(13, ComponentKind::Spacer, Some(0), vec![]),
        ])
    }

    #[test]
    fn test_lookup() {
        let tree = setup();
        assert_eq!(tree.root(), Some(0));
        assert_eq!(tree.index_of(ComponentId(12)), Some(2));
        assert!(tree.get(ComponentId(99)).is_none());
        assert!(ComponentTree::default().root().is_none());
    }

    #[test]
    fn test_subtree_pre_order() {
        let tree = setup();
        assert_eq!(tree.subtree(0), vec![0, 1, 2, 3]);
        assert_eq!(tree.subtree(1), vec![1, 2]);
    }

    #[test]
    fn test_ancestors() {
        let tree = setup();
        assert_eq!(tree.ancestors(2), vec![1, 0]);
        assert_eq!(tree.depth(2), 2);
        assert!(tree.ancestors(0).is_empty());
    }
}
