//! Operations - the closed set of instructions a document is made of.
//!
//! Each operation knows its opcode and how to write and read its operands.
//! Profile checks happen one level up, in [`super::decode`] and the writers.

use crate::engine::{BoxLayout, LinearLayout, Modifier, TextContent};
use crate::error::{DecodeError, EncodeError};
use crate::input::{Action, ActionEffect};
use crate::state::{BinaryOp, Expression, Scalar, UnaryOp};
use crate::types::{
    ActionId, Alignment, Arrangement, ComponentId, Dimension, Padding, Rgba, TouchTrigger,
    VariableId, Visibility, VisibilitySource,
};

use super::opcode as op;
use super::reader::WireReader;
use super::writer::WireWriter;

// =============================================================================
// Operation Groups
// =============================================================================

/// Variable declarations with literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOp {
    Integer { id: VariableId, value: i32 },
    Float { id: VariableId, value: f32 },
    Text { id: VariableId, text: String },
    Color { id: VariableId, color: Rgba },
    List { id: VariableId, items: Vec<VariableId> },
    /// Expose an already declared variable under a host-visible name.
    Named { id: VariableId, name: String },
}

/// Variable declarations recomputed every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionOp {
    Integer { id: VariableId, expression: Expression },
    Float { id: VariableId, expression: Expression },
    TextLookup { id: VariableId, list: VariableId, index: VariableId },
    TextFromNumber { id: VariableId, source: VariableId, digits: u8 },
}

/// Component declarations and scope closing.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOp {
    Row { component: ComponentId, layout: LinearLayout },
    Column { component: ComponentId, layout: LinearLayout },
    Box { component: ComponentId, layout: BoxLayout },
    Text { component: ComponentId, content: TextContent },
    Spacer { component: ComponentId },
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Data(DataOp),
    Expression(ExpressionOp),
    Layout(LayoutOp),
    Modifier(Modifier),
    Action(Action),
}

impl Operation {
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Data(data) => match data {
                DataOp::Integer { .. } => op::INTEGER_VALUE,
                DataOp::Float { .. } => op::FLOAT_VALUE,
                DataOp::Text { .. } => op::TEXT_DATA,
                DataOp::Color { .. } => op::COLOR_VALUE,
                DataOp::List { .. } => op::LIST_VALUE,
                DataOp::Named { .. } => op::NAMED_VARIABLE,
            },
            Self::Expression(expr) => match expr {
                ExpressionOp::Integer { .. } => op::INTEGER_EXPRESSION,
                ExpressionOp::Float { .. } => op::FLOAT_EXPRESSION,
                ExpressionOp::TextLookup { .. } => op::TEXT_LOOKUP,
                ExpressionOp::TextFromNumber { .. } => op::TEXT_FROM_NUMBER,
            },
            Self::Layout(layout) => match layout {
                LayoutOp::Row { .. } => op::ROW_START,
                LayoutOp::Column { .. } => op::COLUMN_START,
                LayoutOp::Box { .. } => op::BOX_START,
                LayoutOp::Text { .. } => op::TEXT,
                LayoutOp::Spacer { .. } => op::SPACER,
                LayoutOp::End => op::CONTAINER_END,
            },
            Self::Modifier(modifier) => match modifier {
                Modifier::Width(_) => op::WIDTH,
                Modifier::Height(_) => op::HEIGHT,
                Modifier::Padding(_) => op::PADDING,
                Modifier::Background(_) => op::BACKGROUND,
                Modifier::Border { .. } => op::BORDER,
                Modifier::Visibility(_) => op::VISIBILITY,
                Modifier::TouchAction { .. } => op::TOUCH_ACTION,
            },
            Self::Action(action) => action.opcode(),
        }
    }

    // =========================================================================
    // Encode
    // =========================================================================

    /// Write opcode and operands.
    pub fn encode(&self, w: &mut WireWriter) -> Result<(), EncodeError> {
        w.u8(self.opcode());
        match self {
            Self::Data(data) => match data {
                DataOp::Integer { id, value } => {
                    w.variable(*id);
                    w.i32(*value);
                }
                DataOp::Float { id, value } => {
                    w.variable(*id);
                    w.f32(*value);
                }
                DataOp::Text { id, text } => {
                    w.variable(*id);
                    w.string(text)?;
                }
                DataOp::Color { id, color } => {
                    w.variable(*id);
                    w.u32(color.to_argb());
                }
                DataOp::List { id, items } => {
                    w.variable(*id);
                    w.id_list("list", items.iter().map(|v| v.get()))?;
                }
                DataOp::Named { id, name } => {
                    w.variable(*id);
                    w.string(name)?;
                }
            },
            Self::Expression(expr) => match expr {
                ExpressionOp::Integer { id, expression } | ExpressionOp::Float { id, expression } => {
                    w.variable(*id);
                    encode_expression(expression, w)?;
                }
                ExpressionOp::TextLookup { id, list, index } => {
                    w.variable(*id);
                    w.variable(*list);
                    w.variable(*index);
                }
                ExpressionOp::TextFromNumber { id, source, digits } => {
                    w.variable(*id);
                    w.variable(*source);
                    w.u8(*digits);
                }
            },
            Self::Layout(layout) => match layout {
                LayoutOp::Row { component, layout } | LayoutOp::Column { component, layout } => {
                    w.component(*component);
                    w.u8(layout.arrangement as u8);
                    w.u8(layout.alignment as u8);
                    w.f32(layout.spacing);
                }
                LayoutOp::Box { component, layout } => {
                    w.component(*component);
                    w.u8(layout.horizontal as u8);
                    w.u8(layout.vertical as u8);
                }
                LayoutOp::Text { component, content } => {
                    w.component(*component);
                    w.variable(content.text);
                    w.variable(content.color);
                    w.f32(content.font_size);
                    w.u16(content.weight);
                    w.u8(content.italic as u8);
                }
                LayoutOp::Spacer { component } => w.component(*component),
                LayoutOp::End => {}
            },
            Self::Modifier(modifier) => match modifier {
                Modifier::Width(d) | Modifier::Height(d) => {
                    w.u8(d.tag());
                    w.f32(d.value());
                }
                Modifier::Padding(p) => {
                    w.f32(p.left);
                    w.f32(p.top);
                    w.f32(p.right);
                    w.f32(p.bottom);
                }
                Modifier::Background(color) => w.variable(*color),
                Modifier::Border { width, color } => {
                    w.f32(*width);
                    w.variable(*color);
                }
                Modifier::Visibility(source) => match source {
                    VisibilitySource::Literal(v) => {
                        w.u8(0);
                        w.u32(*v as u32);
                    }
                    VisibilitySource::Variable(id) => {
                        w.u8(1);
                        w.variable(*id);
                    }
                },
                Modifier::TouchAction { trigger, actions } => {
                    w.u8(*trigger as u8);
                    w.id_list("touch action", actions.iter().map(|a| a.get()))?;
                }
            },
            Self::Action(action) => {
                w.action(action.id);
                match &action.effect {
                    ActionEffect::ValueIntegerChange { target, value } => {
                        w.variable(*target);
                        w.i32(*value);
                    }
                    ActionEffect::ValueFloatChange { target, value } => {
                        w.variable(*target);
                        w.f32(*value);
                    }
                    ActionEffect::ValueStringChange { target, text } => {
                        w.variable(*target);
                        w.variable(*text);
                    }
                    ActionEffect::ValueIntegerExpressionChange { target, expression } => {
                        w.variable(*target);
                        w.variable(*expression);
                    }
                    ActionEffect::Host { host_id } => w.u32(*host_id),
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Decode
    // =========================================================================

    /// Read operands for `opcode`, which has already been consumed.
    pub fn decode_operands(opcode: u8, r: &mut WireReader<'_>) -> Result<Self, DecodeError> {
        let offset = r.offset().saturating_sub(1);
        Ok(match opcode {
            op::INTEGER_VALUE => Self::Data(DataOp::Integer { id: r.variable()?, value: r.i32()? }),
            op::FLOAT_VALUE => Self::Data(DataOp::Float { id: r.variable()?, value: r.f32()? }),
            op::TEXT_DATA => Self::Data(DataOp::Text { id: r.variable()?, text: r.string()? }),
            op::COLOR_VALUE => Self::Data(DataOp::Color {
                id: r.variable()?,
                color: Rgba::from_argb(r.u32()?),
            }),
            op::LIST_VALUE => Self::Data(DataOp::List {
                id: r.variable()?,
                items: r.id_list()?.into_iter().map(VariableId).collect(),
            }),
            op::NAMED_VARIABLE => Self::Data(DataOp::Named { id: r.variable()?, name: r.string()? }),

            op::INTEGER_EXPRESSION => Self::Expression(ExpressionOp::Integer {
                id: r.variable()?,
                expression: decode_expression(r)?,
            }),
            op::FLOAT_EXPRESSION => Self::Expression(ExpressionOp::Float {
                id: r.variable()?,
                expression: decode_expression(r)?,
            }),
            op::TEXT_LOOKUP => Self::Expression(ExpressionOp::TextLookup {
                id: r.variable()?,
                list: r.variable()?,
                index: r.variable()?,
            }),
            op::TEXT_FROM_NUMBER => Self::Expression(ExpressionOp::TextFromNumber {
                id: r.variable()?,
                source: r.variable()?,
                digits: r.u8()?,
            }),

            op::ROW_START => {
                let component = r.component()?;
                Self::Layout(LayoutOp::Row { component, layout: decode_linear(r)? })
            }
            op::COLUMN_START => {
                let component = r.component()?;
                Self::Layout(LayoutOp::Column { component, layout: decode_linear(r)? })
            }
            op::BOX_START => Self::Layout(LayoutOp::Box {
                component: r.component()?,
                layout: BoxLayout {
                    horizontal: r.enum_u8::<Alignment>("horizontal alignment")?,
                    vertical: r.enum_u8::<Alignment>("vertical alignment")?,
                },
            }),
            op::TEXT => Self::Layout(LayoutOp::Text {
                component: r.component()?,
                content: TextContent {
                    text: r.variable()?,
                    color: r.variable()?,
                    font_size: r.f32()?,
                    weight: r.u16()?,
                    italic: decode_bool(r, "italic flag")?,
                },
            }),
            op::SPACER => Self::Layout(LayoutOp::Spacer { component: r.component()? }),
            op::CONTAINER_END => Self::Layout(LayoutOp::End),

            op::WIDTH => Self::Modifier(Modifier::Width(decode_dimension(r)?)),
            op::HEIGHT => Self::Modifier(Modifier::Height(decode_dimension(r)?)),
            op::PADDING => Self::Modifier(Modifier::Padding(Padding::new(
                r.f32()?,
                r.f32()?,
                r.f32()?,
                r.f32()?,
            ))),
            op::BACKGROUND => Self::Modifier(Modifier::Background(r.variable()?)),
            op::BORDER => Self::Modifier(Modifier::Border { width: r.f32()?, color: r.variable()? }),
            op::VISIBILITY => Self::Modifier(Modifier::Visibility(decode_visibility(r)?)),
            op::TOUCH_ACTION => Self::Modifier(Modifier::TouchAction {
                trigger: r.enum_u8::<TouchTrigger>("touch trigger")?,
                actions: r.id_list()?.into_iter().map(ActionId).collect(),
            }),

            op::VALUE_INTEGER_CHANGE => {
                let id = r.action()?;
                let effect = ActionEffect::ValueIntegerChange { target: r.variable()?, value: r.i32()? };
                Self::Action(Action::new(id, effect))
            }
            op::VALUE_FLOAT_CHANGE => {
                let id = r.action()?;
                let effect = ActionEffect::ValueFloatChange { target: r.variable()?, value: r.f32()? };
                Self::Action(Action::new(id, effect))
            }
            op::VALUE_STRING_CHANGE => {
                let id = r.action()?;
                let effect = ActionEffect::ValueStringChange { target: r.variable()?, text: r.variable()? };
                Self::Action(Action::new(id, effect))
            }
            op::VALUE_INTEGER_EXPRESSION_CHANGE => {
                let id = r.action()?;
                let effect = ActionEffect::ValueIntegerExpressionChange {
                    target: r.variable()?,
                    expression: r.variable()?,
                };
                Self::Action(Action::new(id, effect))
            }
            op::HOST_ACTION => {
                let id = r.action()?;
                Self::Action(Action::new(id, ActionEffect::Host { host_id: r.u32()? }))
            }

            other => return Err(DecodeError::UnknownOpcode { opcode: other, offset }),
        })
    }
}

fn decode_linear(r: &mut WireReader<'_>) -> Result<LinearLayout, DecodeError> {
    Ok(LinearLayout {
        arrangement: r.enum_u8::<Arrangement>("arrangement")?,
        alignment: r.enum_u8::<Alignment>("alignment")?,
        spacing: r.f32()?,
    })
}

fn decode_bool(r: &mut WireReader<'_>, reason: &'static str) -> Result<bool, DecodeError> {
    let offset = r.offset();
    match r.u8()? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::InvalidOperand { offset, reason }),
    }
}

fn decode_dimension(r: &mut WireReader<'_>) -> Result<Dimension, DecodeError> {
    let offset = r.offset();
    let tag = r.u8()?;
    let value = r.f32()?;
    Dimension::from_wire(tag, value).ok_or(DecodeError::InvalidOperand {
        offset,
        reason: "dimension kind",
    })
}

fn decode_visibility(r: &mut WireReader<'_>) -> Result<VisibilitySource, DecodeError> {
    let offset = r.offset();
    let source = r.u8()?;
    let value = r.u32()?;
    match source {
        0 => u8::try_from(value)
            .ok()
            .and_then(|v| Visibility::try_from(v).ok())
            .map(VisibilitySource::Literal)
            .ok_or(DecodeError::InvalidOperand {
                offset: offset + 1,
                reason: "visibility literal",
            }),
        1 => Ok(VisibilitySource::Variable(VariableId(value))),
        _ => Err(DecodeError::InvalidOperand { offset, reason: "visibility source" }),
    }
}

// =============================================================================
// Expressions (postfix tokens)
// =============================================================================

fn encode_expression(expr: &Expression, w: &mut WireWriter) -> Result<(), EncodeError> {
    let count = expr.node_count();
    if count > op::MAX_EXPRESSION_TOKENS {
        return Err(EncodeError::TooManyEntries { what: "expression", count });
    }
    w.u16(count as u16);
    encode_tokens(expr, w);
    Ok(())
}

fn encode_tokens(expr: &Expression, w: &mut WireWriter) {
    match expr {
        Expression::Constant(Scalar::Int(v)) => {
            w.u8(op::TOKEN_INT);
            w.i32(*v);
        }
        Expression::Constant(Scalar::Float(v)) => {
            w.u8(op::TOKEN_FLOAT);
            w.f32(*v);
        }
        Expression::Variable(id) => {
            w.u8(op::TOKEN_VARIABLE);
            w.variable(*id);
        }
        Expression::Binary { op: binary, lhs, rhs } => {
            encode_tokens(lhs, w);
            encode_tokens(rhs, w);
            w.u8(op::TOKEN_BINARY);
            w.u8(*binary as u8);
        }
        Expression::Unary { op: unary, operand } => {
            encode_tokens(operand, w);
            w.u8(op::TOKEN_UNARY);
            w.u8(*unary as u8);
        }
    }
}

fn decode_expression(r: &mut WireReader<'_>) -> Result<Expression, DecodeError> {
    let offset = r.offset();
    let count = r.u16()? as usize;
    if count == 0 || count > op::MAX_EXPRESSION_TOKENS {
        return Err(DecodeError::MalformedExpression { offset });
    }
    let mut stack: Vec<Expression> = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let token_offset = r.offset();
        let malformed = DecodeError::MalformedExpression { offset: token_offset };
        match r.u8()? {
            op::TOKEN_INT => stack.push(Expression::int(r.i32()?)),
            op::TOKEN_FLOAT => stack.push(Expression::float(r.f32()?)),
            op::TOKEN_VARIABLE => stack.push(Expression::var(r.variable()?)),
            op::TOKEN_BINARY => {
                let binary = BinaryOp::try_from(r.u8()?).map_err(|_| malformed.clone())?;
                let rhs = stack.pop().ok_or_else(|| malformed.clone())?;
                let lhs = stack.pop().ok_or(malformed)?;
                stack.push(Expression::binary(binary, lhs, rhs));
            }
            op::TOKEN_UNARY => {
                let unary = UnaryOp::try_from(r.u8()?).map_err(|_| malformed.clone())?;
                let operand = stack.pop().ok_or(malformed)?;
                stack.push(Expression::unary(unary, operand));
            }
            _ => return Err(malformed),
        }
    }
    match (stack.pop(), stack.is_empty()) {
        (Some(expr), true) => Ok(expr),
        _ => Err(DecodeError::MalformedExpression { offset }),
    }
}
