//! Typed values held by the variable store.

use std::fmt;

use crate::types::{Rgba, VariableId};

/// Kind of a store slot. Fixed when the slot is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Int,
    Float,
    Text,
    Color,
    List,
}

impl VariableKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Color => "color",
            Self::List => "list",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored in a variable slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Text(String),
    Color(Rgba),
    /// Ordered ids of other variables.
    List(Vec<VariableId>),
}

impl Value {
    pub fn kind(&self) -> VariableKind {
        match self {
            Self::Int(_) => VariableKind::Int,
            Self::Float(_) => VariableKind::Float,
            Self::Text(_) => VariableKind::Text,
            Self::Color(_) => VariableKind::Color,
            Self::List(_) => VariableKind::List,
        }
    }

    /// Value substituted when a reference of `kind` cannot be resolved.
    pub fn default_for(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Int => Self::Int(0),
            VariableKind::Float => Self::Float(0.0),
            VariableKind::Text => Self::Text(String::new()),
            VariableKind::Color => Self::Color(Rgba::TRANSPARENT),
            VariableKind::List => Self::List(Vec::new()),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Int(v) => Some(Scalar::Int(*v)),
            Self::Float(v) => Some(Scalar::Float(*v)),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Rgba> for Value {
    fn from(value: Rgba) -> Self {
        Self::Color(value)
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => Self::Int(v),
            Scalar::Float(v) => Self::Float(v),
        }
    }
}

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i32),
    Float(f32),
}

impl Scalar {
    pub const ZERO: Self = Self::Int(0);

    /// Boolean as 0/1 int.
    #[inline]
    pub const fn from_bool(value: bool) -> Self {
        Self::Int(value as i32)
    }

    #[inline]
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Int(v) => v as f32,
            Self::Float(v) => v,
        }
    }

    /// Integer view. Floats truncate toward zero, NaN becomes 0.
    #[inline]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Int(v) => v,
            Self::Float(v) => v as i32,
        }
    }

    #[inline]
    pub fn is_truthy(self) -> bool {
        match self {
            Self::Int(v) => v != 0,
            Self::Float(v) => v != 0.0,
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::from(3).kind(), VariableKind::Int);
        assert_eq!(Value::from(1.5).kind(), VariableKind::Float);
        assert_eq!(Value::from("hi").kind(), VariableKind::Text);
        assert_eq!(Value::from(Rgba::RED).kind(), VariableKind::Color);
        assert_eq!(Value::List(vec![]).kind(), VariableKind::List);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::Float(2.9).as_i32(), 2);
        assert_eq!(Scalar::Float(-2.9).as_i32(), -2);
        assert_eq!(Scalar::Float(f32::NAN).as_i32(), 0);
        assert_eq!(Scalar::Int(7).as_f32(), 7.0);
        assert!(Scalar::from_bool(true).is_truthy());
        assert!(!Scalar::Float(0.0).is_truthy());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Value::default_for(VariableKind::Int), Value::Int(0));
        assert_eq!(Value::default_for(VariableKind::Text), Value::Text(String::new()));
        assert_eq!(
            Value::default_for(VariableKind::Color),
            Value::Color(Rgba::TRANSPARENT)
        );
    }
}
