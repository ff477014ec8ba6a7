//! Modifiers - per-component decorations applied in declaration order.
//!
//! A component carries a [`ModifierChain`]. Precedence rules:
//!
//! - `width`, `height`, `visibility`: the last declaration wins
//! - `padding`: declarations accumulate
//! - `background`, `border`: all paint, in declaration order
//! - touch actions: concatenate per trigger, in declaration order

use crate::types::{ActionId, Dimension, Padding, TouchTrigger, VariableId, Visibility, VisibilitySource};

/// One modifier operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Width(Dimension),
    Height(Dimension),
    Padding(Padding),
    /// Fill with the color held by a color variable.
    Background(VariableId),
    /// Stroke the outline with the color held by a color variable.
    Border { width: f32, color: VariableId },
    Visibility(VisibilitySource),
    TouchAction {
        trigger: TouchTrigger,
        actions: Vec<ActionId>,
    },
}

/// Ordered modifiers of one component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierChain {
    items: Vec<Modifier>,
}

impl ModifierChain {
    pub fn new(items: Vec<Modifier>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, modifier: Modifier) {
        self.items.push(modifier);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn width(&self) -> Dimension {
        self.items
            .iter()
            .rev()
            .find_map(|m| match m {
                Modifier::Width(d) => Some(*d),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn height(&self) -> Dimension {
        self.items
            .iter()
            .rev()
            .find_map(|m| match m {
                Modifier::Height(d) => Some(*d),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn padding(&self) -> Padding {
        self.items.iter().fold(Padding::ZERO, |acc, m| match m {
            Modifier::Padding(p) => acc.add(*p),
            _ => acc,
        })
    }

    pub fn visibility_source(&self) -> VisibilitySource {
        self.items
            .iter()
            .rev()
            .find_map(|m| match m {
                Modifier::Visibility(source) => Some(*source),
                _ => None,
            })
            .unwrap_or(VisibilitySource::Literal(Visibility::Visible))
    }

    /// Actions bound to `trigger`, in declaration order.
    pub fn actions_for(&self, trigger: TouchTrigger) -> Vec<ActionId> {
        self.items
            .iter()
            .filter_map(|m| match m {
                Modifier::TouchAction { trigger: t, actions } if *t == trigger => Some(actions),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Whether any action is bound to any trigger.
    pub fn is_interactive(&self) -> bool {
        self.items
            .iter()
            .any(|m| matches!(m, Modifier::TouchAction { actions, .. } if !actions.is_empty()))
    }

    /// Every variable the chain reads while laying out or painting.
    pub fn variables(&self) -> Vec<VariableId> {
        let mut out = Vec::new();
        for m in &self.items {
            let id = match m {
                Modifier::Background(color) => *color,
                Modifier::Border { color, .. } => *color,
                Modifier::Visibility(VisibilitySource::Variable(id)) => *id,
                _ => continue,
            };
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ModifierChain {
        ModifierChain::new(vec![
            Modifier::Width(Dimension::Fixed(10.0)),
            Modifier::Padding(Padding::all(2.0)),
            Modifier::Background(VariableId(1)),
            Modifier::TouchAction { trigger: TouchTrigger::Down, actions: vec![ActionId(1)] },
            Modifier::Width(Dimension::Fill),
            Modifier::Padding(Padding::new(1.0, 0.0, 0.0, 0.0)),
            Modifier::Visibility(VisibilitySource::Variable(VariableId(5))),
            Modifier::Border { width: 1.0, color: VariableId(1) },
            Modifier::TouchAction {
                trigger: TouchTrigger::Down,
                actions: vec![ActionId(2), ActionId(3)],
            },
            Modifier::TouchAction { trigger: TouchTrigger::Up, actions: vec![ActionId(4)] },
        ])
    }

    #[test]
    fn test_last_size_wins() {
        let chain = setup();
        assert_eq!(chain.width(), Dimension::Fill);
        assert_eq!(chain.height(), Dimension::Wrap);
    }

    #[test]
    fn test_padding_accumulates() {
        assert_eq!(setup().padding(), Padding::new(3.0, 2.0, 2.0, 2.0));
    }

    #[test]
    fn test_actions_concatenate() {
        let chain = setup();
        assert_eq!(
            chain.actions_for(TouchTrigger::Down),
            vec![ActionId(1), ActionId(2), ActionId(3)]
        );
        assert_eq!(chain.actions_for(TouchTrigger::Up), vec![ActionId(4)]);
        assert!(chain.is_interactive());
    }

    #[test]
    fn test_variables() {
        let chain = setup();
        assert_eq!(chain.variables(), vec![VariableId(1), VariableId(5)]);
        assert_eq!(
            chain.visibility_source(),
            VisibilitySource::Variable(VariableId(5))
        );
        assert_eq!(
            ModifierChain::default().visibility_source(),
            VisibilitySource::Literal(Visibility::Visible)
        );
    }
}
