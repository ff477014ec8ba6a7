//! Expression Evaluator - scalar arithmetic over the variable store.
//!
//! Expressions are small trees of constants, variable references and
//! operators. Evaluation is pure: the same tree against the same store
//! snapshot always yields the same scalar. Nothing is cached between frames.
//!
//! # Semantics
//!
//! - If either operand is a float the operation runs in `f32` (IEEE rules).
//! - Otherwise integer arithmetic wraps on overflow.
//! - Integer division or remainder by zero yields `0`.
//! - Comparisons and logical operators yield `Int(0)` or `Int(1)`.
//!
//! # Example
//!
//! ```
//! use spark_remote::state::{evaluate, BinaryOp, Expression, Scalar, VariableStore, Value};
//!
//! let mut store = VariableStore::new();
//! let count = store.declare_mutable(Value::Int(4));
//! let expr = Expression::binary(BinaryOp::Mul, Expression::var(count), Expression::int(3));
//! assert_eq!(evaluate(&expr, &store), Ok(Scalar::Int(12)));
//! ```

use crate::error::StoreError;
use crate::types::VariableId;

use super::store::VariableStore;
use super::value::Scalar;

// =============================================================================
// Operators
// =============================================================================

/// Binary operator. Discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinaryOp {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Rem = 4,
    Min = 5,
    Max = 6,
    Eq = 7,
    Ne = 8,
    Lt = 9,
    Le = 10,
    Gt = 11,
    Ge = 12,
    And = 13,
    Or = 14,
}

impl TryFrom<u8> for BinaryOp {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::Mul,
            3 => Self::Div,
            4 => Self::Rem,
            5 => Self::Min,
            6 => Self::Max,
            7 => Self::Eq,
            8 => Self::Ne,
            9 => Self::Lt,
            10 => Self::Le,
            11 => Self::Gt,
            12 => Self::Ge,
            13 => Self::And,
            14 => Self::Or,
            other => return Err(other),
        })
    }
}

/// Unary operator. Discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UnaryOp {
    Neg = 0,
    Abs = 1,
    Not = 2,
    ToInt = 3,
    ToFloat = 4,
}

impl TryFrom<u8> for UnaryOp {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Neg,
            1 => Self::Abs,
            2 => Self::Not,
            3 => Self::ToInt,
            4 => Self::ToFloat,
            other => return Err(other),
        })
    }
}

// =============================================================================
// Expression Tree
// =============================================================================

/// Expression tree over scalars and store variables.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Scalar),
    Variable(VariableId),
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
}

impl Expression {
    pub fn int(value: i32) -> Self {
        Self::Constant(Scalar::Int(value))
    }

    pub fn float(value: f32) -> Self {
        Self::Constant(Scalar::Float(value))
    }

    pub fn var(id: VariableId) -> Self {
        Self::Variable(id)
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Every variable the expression reads, in first-visit order.
    pub fn variables(&self) -> Vec<VariableId> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<VariableId>) {
        match self {
            Self::Constant(_) => {}
            Self::Variable(id) => {
                if !out.contains(id) {
                    out.push(*id);
                }
            }
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            Self::Unary { operand, .. } => operand.collect_variables(out),
        }
    }

    /// Number of nodes in the tree (one wire token per node).
    pub fn node_count(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Variable(_) => 1,
            Self::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
            Self::Unary { operand, .. } => 1 + operand.node_count(),
        }
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluate `expr` against the current store contents.
///
/// Fails only when a referenced variable is missing or not numeric.
pub fn evaluate(expr: &Expression, store: &VariableStore) -> Result<Scalar, StoreError> {
    match expr {
        Expression::Constant(value) => Ok(*value),
        Expression::Variable(id) => store.get_scalar(*id),
        Expression::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, store)?;
            let rhs = evaluate(rhs, store)?;
            Ok(apply_binary(*op, lhs, rhs))
        }
        Expression::Unary { op, operand } => {
            let operand = evaluate(operand, store)?;
            Ok(apply_unary(*op, operand))
        }
    }
}

pub fn apply_binary(op: BinaryOp, lhs: Scalar, rhs: Scalar) -> Scalar {
    use BinaryOp::*;

    match (lhs, rhs) {
        (Scalar::Int(a), Scalar::Int(b)) => match op {
            Add => Scalar::Int(a.wrapping_add(b)),
            Sub => Scalar::Int(a.wrapping_sub(b)),
            Mul => Scalar::Int(a.wrapping_mul(b)),
            Div => Scalar::Int(if b == 0 { 0 } else { a.wrapping_div(b) }),
            Rem => Scalar::Int(if b == 0 { 0 } else { a.wrapping_rem(b) }),
            Min => Scalar::Int(a.min(b)),
            Max => Scalar::Int(a.max(b)),
            Eq => Scalar::from_bool(a == b),
            Ne => Scalar::from_bool(a != b),
            Lt => Scalar::from_bool(a < b),
            Le => Scalar::from_bool(a <= b),
            Gt => Scalar::from_bool(a > b),
            Ge => Scalar::from_bool(a >= b),
            And => Scalar::from_bool(a != 0 && b != 0),
            Or => Scalar::from_bool(a != 0 || b != 0),
        },
        _ => {
            let (a, b) = (lhs.as_f32(), rhs.as_f32());
            match op {
                Add => Scalar::Float(a + b),
                Sub => Scalar::Float(a - b),
                Mul => Scalar::Float(a * b),
                Div => Scalar::Float(a / b),
                Rem => Scalar::Float(a % b),
                Min => Scalar::Float(a.min(b)),
                Max => Scalar::Float(a.max(b)),
                Eq => Scalar::from_bool(a == b),
                Ne => Scalar::from_bool(a != b),
                Lt => Scalar::from_bool(a < b),
                Le => Scalar::from_bool(a <= b),
                Gt => Scalar::from_bool(a > b),
                Ge => Scalar::from_bool(a >= b),
                And => Scalar::from_bool(a != 0.0 && b != 0.0),
                Or => Scalar::from_bool(a != 0.0 || b != 0.0),
            }
        }
    }
}

pub fn apply_unary(op: UnaryOp, operand: Scalar) -> Scalar {
    match (op, operand) {
        (UnaryOp::Neg, Scalar::Int(v)) => Scalar::Int(v.wrapping_neg()),
        (UnaryOp::Neg, Scalar::Float(v)) => Scalar::Float(-v),
        (UnaryOp::Abs, Scalar::Int(v)) => Scalar::Int(v.wrapping_abs()),
        (UnaryOp::Abs, Scalar::Float(v)) => Scalar::Float(v.abs()),
        (UnaryOp::Not, v) => Scalar::from_bool(!v.is_truthy()),
        (UnaryOp::ToInt, v) => Scalar::Int(v.as_i32()),
        (UnaryOp::ToFloat, v) => Scalar::Float(v.as_f32()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Value;

    fn setup() -> (VariableStore, VariableId, VariableId) {
        let mut store = VariableStore::new();
        let count = store.declare_mutable(Value::Int(7));
        let ratio = store.declare_mutable(Value::Float(0.5));
        (store, count, ratio)
    }

    fn eval(expr: &Expression) -> Scalar {
        let (store, _, _) = setup();
        evaluate(expr, &store).unwrap()
    }

    #[test]
    fn test_integer_arithmetic() {
        let e = Expression::binary(BinaryOp::Add, Expression::int(2), Expression::int(3));
        assert_eq!(eval(&e), Scalar::Int(5));
        let e = Expression::binary(BinaryOp::Div, Expression::int(7), Expression::int(2));
        assert_eq!(eval(&e), Scalar::Int(3));
        let e = Expression::binary(BinaryOp::Rem, Expression::int(-7), Expression::int(3));
        assert_eq!(eval(&e), Scalar::Int(-1));
    }

    #[test]
    fn test_integer_wraps() {
        let e = Expression::binary(BinaryOp::Add, Expression::int(i32::MAX), Expression::int(1));
        assert_eq!(eval(&e), Scalar::Int(i32::MIN));
        let e = Expression::unary(UnaryOp::Neg, Expression::int(i32::MIN));
        assert_eq!(eval(&e), Scalar::Int(i32::MIN));
    }

    #[test]
    fn test_integer_division_by_zero_is_zero() {
        let e = Expression::binary(BinaryOp::Div, Expression::int(5), Expression::int(0));
        assert_eq!(eval(&e), Scalar::Int(0));
        let e = Expression::binary(BinaryOp::Rem, Expression::int(5), Expression::int(0));
        assert_eq!(eval(&e), Scalar::Int(0));
        let e = Expression::binary(BinaryOp::Div, Expression::int(i32::MIN), Expression::int(-1));
        assert_eq!(eval(&e), Scalar::Int(i32::MIN));
    }

    #[test]
    fn test_float_promotion() {
        let e = Expression::binary(BinaryOp::Add, Expression::int(1), Expression::float(0.5));
        assert_eq!(eval(&e), Scalar::Float(1.5));
        let e = Expression::binary(BinaryOp::Div, Expression::float(1.0), Expression::int(0));
        assert_eq!(eval(&e), Scalar::Float(f32::INFINITY));
    }

    #[test]
    fn test_comparisons_and_logic() {
        let e = Expression::binary(BinaryOp::Lt, Expression::int(1), Expression::float(1.5));
        assert_eq!(eval(&e), Scalar::Int(1));
        let e = Expression::binary(BinaryOp::And, Expression::int(1), Expression::float(0.0));
        assert_eq!(eval(&e), Scalar::Int(0));
        let e = Expression::binary(BinaryOp::Or, Expression::int(0), Expression::int(9));
        assert_eq!(eval(&e), Scalar::Int(1));
        let e = Expression::unary(UnaryOp::Not, Expression::int(0));
        assert_eq!(eval(&e), Scalar::Int(1));
    }

    #[test]
    fn test_unary_conversions() {
        assert_eq!(eval(&Expression::unary(UnaryOp::ToInt, Expression::float(3.9))), Scalar::Int(3));
        assert_eq!(eval(&Expression::unary(UnaryOp::ToFloat, Expression::int(2))), Scalar::Float(2.0));
        assert_eq!(eval(&Expression::unary(UnaryOp::Abs, Expression::int(-4))), Scalar::Int(4));
    }

    #[test]
    fn test_variables() {
        let (store, count, ratio) = setup();
        let e = Expression::binary(BinaryOp::Mul, Expression::var(count), Expression::var(ratio));
        assert_eq!(evaluate(&e, &store), Ok(Scalar::Float(3.5)));
        assert_eq!(e.variables(), vec![count, ratio]);
        assert_eq!(e.node_count(), 3);
    }

    #[test]
    fn test_lookup_failures() {
        let (mut store, _, _) = setup();
        let missing = Expression::var(VariableId(500));
        assert_eq!(
            evaluate(&missing, &store),
            Err(StoreError::UnknownVariable(VariableId(500)))
        );
        let text = store.declare(Value::from("x"));
        assert!(matches!(
            evaluate(&Expression::var(text), &store),
            Err(StoreError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_operator_wire_codes() {
        assert_eq!(BinaryOp::try_from(14), Ok(BinaryOp::Or));
        assert_eq!(BinaryOp::try_from(15), Err(15));
        assert_eq!(UnaryOp::try_from(4), Ok(UnaryOp::ToFloat));
        assert_eq!(UnaryOp::Abs as u8, 1);
    }
}
