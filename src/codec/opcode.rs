//! Opcode constants, grouped by the kind of operation they introduce.
//!
//! Operand layout is fully determined by the opcode; there is no length
//! prefix per operation.

// ── data ────────────────────────────────────────────────────────────────────
pub const INTEGER_VALUE: u8 = 0x01;
pub const FLOAT_VALUE: u8 = 0x02;
pub const TEXT_DATA: u8 = 0x03;
pub const COLOR_VALUE: u8 = 0x04;
pub const LIST_VALUE: u8 = 0x05;
pub const NAMED_VARIABLE: u8 = 0x06;

// ── expression ──────────────────────────────────────────────────────────────
pub const INTEGER_EXPRESSION: u8 = 0x10;
pub const FLOAT_EXPRESSION: u8 = 0x11;
pub const TEXT_LOOKUP: u8 = 0x12;
pub const TEXT_FROM_NUMBER: u8 = 0x13;

// ── layout ──────────────────────────────────────────────────────────────────
pub const ROW_START: u8 = 0x20;
pub const COLUMN_START: u8 = 0x21;
pub const BOX_START: u8 = 0x22;
pub const TEXT: u8 = 0x23;
pub const SPACER: u8 = 0x24;
pub const CONTAINER_END: u8 = 0x2F;

// ── modifier ────────────────────────────────────────────────────────────────
pub const WIDTH: u8 = 0x30;
pub const HEIGHT: u8 = 0x31;
pub const PADDING: u8 = 0x32;
pub const BACKGROUND: u8 = 0x33;
pub const BORDER: u8 = 0x34;
pub const VISIBILITY: u8 = 0x35;
pub const TOUCH_ACTION: u8 = 0x36;

// ── action ──────────────────────────────────────────────────────────────────
pub const VALUE_INTEGER_CHANGE: u8 = 0x40;
pub const VALUE_FLOAT_CHANGE: u8 = 0x41;
pub const VALUE_STRING_CHANGE: u8 = 0x42;
pub const VALUE_INTEGER_EXPRESSION_CHANGE: u8 = 0x43;
pub const HOST_ACTION: u8 = 0x44;

// ── expression tokens ───────────────────────────────────────────────────────
pub const TOKEN_INT: u8 = 0x00;
pub const TOKEN_FLOAT: u8 = 0x01;
pub const TOKEN_VARIABLE: u8 = 0x02;
pub const TOKEN_BINARY: u8 = 0x03;
pub const TOKEN_UNARY: u8 = 0x04;

/// Longest expression accepted on the wire, in tokens.
pub const MAX_EXPRESSION_TOKENS: usize = 1024;

/// Coarse classification of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeGroup {
    Data,
    Expression,
    Layout,
    Modifier,
    Action,
}

/// Group of a known opcode, `None` for unknown ones.
pub const fn group(opcode: u8) -> Option<OpcodeGroup> {
    match opcode {
        INTEGER_VALUE..=NAMED_VARIABLE => Some(OpcodeGroup::Data),
        INTEGER_EXPRESSION..=TEXT_FROM_NUMBER => Some(OpcodeGroup::Expression),
        ROW_START..=SPACER | CONTAINER_END => Some(OpcodeGroup::Layout),
        WIDTH..=TOUCH_ACTION => Some(OpcodeGroup::Modifier),
        VALUE_INTEGER_CHANGE..=HOST_ACTION => Some(OpcodeGroup::Action),
        _ => None,
    }
}

#[inline]
pub const fn is_known(opcode: u8) -> bool {
    group(opcode).is_some()
}

/// Human-readable opcode name for logs.
pub const fn name(opcode: u8) -> &'static str {
    match opcode {
        INTEGER_VALUE => "IntegerValue",
        FLOAT_VALUE => "FloatValue",
        TEXT_DATA => "TextData",
        COLOR_VALUE => "ColorValue",
        LIST_VALUE => "ListValue",
        NAMED_VARIABLE => "NamedVariable",
        INTEGER_EXPRESSION => "IntegerExpression",
        FLOAT_EXPRESSION => "FloatExpression",
        TEXT_LOOKUP => "TextLookup",
        TEXT_FROM_NUMBER => "TextFromNumber",
        ROW_START => "RowStart",
        COLUMN_START => "ColumnStart",
        BOX_START => "BoxStart",
        TEXT => "Text",
        SPACER => "Spacer",
        CONTAINER_END => "ContainerEnd",
        WIDTH => "Width",
        HEIGHT => "Height",
        PADDING => "Padding",
        BACKGROUND => "Background",
        BORDER => "Border",
        VISIBILITY => "Visibility",
        TOUCH_ACTION => "TouchAction",
        VALUE_INTEGER_CHANGE => "ValueIntegerChange",
        VALUE_FLOAT_CHANGE => "ValueFloatChange",
        VALUE_STRING_CHANGE => "ValueStringChange",
        VALUE_INTEGER_EXPRESSION_CHANGE => "ValueIntegerExpressionChange",
        HOST_ACTION => "HostAction",
        _ => "Unknown",
    }
}
