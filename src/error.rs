//! Error taxonomy.
//!
//! - [`DecodeError`] - fatal, a document that fails to decode never exists.
//! - [`EncodeError`] - fatal to the writer call that produced it.
//! - [`StoreError`] - recoverable; the frame substitutes a default value.

use thiserror::Error;

use crate::types::{ActionId, ComponentId, VariableId};

/// Failure while decoding a document buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("buffer too short for header: {len} bytes")]
    MissingHeader { len: usize },

    #[error("declared api level {declared} exceeds supported maximum {max}")]
    UnsupportedApiLevel { declared: u16, max: u16 },

    #[error("unknown profile id {0}")]
    UnknownProfile(u16),

    #[error("api level {declared} is below the level {required} of profile '{profile}'")]
    ApiLevelBelowProfile {
        declared: u16,
        profile: &'static str,
        required: u16,
    },

    #[error("document profile '{document}' is not supported by runtime profile '{runtime}'")]
    IncompatibleProfile {
        document: &'static str,
        runtime: &'static str,
    },

    #[error("header declares {declared} bytes of operations but {actual} follow")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("unknown opcode 0x{opcode:02x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("opcode 0x{opcode:02x} at offset {offset} is not allowed by the document profile")]
    UnsupportedOperation { opcode: u8, offset: usize },

    #[error("truncated operand at offset {offset}: {needed} more bytes needed")]
    Truncated { offset: usize, needed: usize },

    #[error("invalid operand at offset {offset}: {reason}")]
    InvalidOperand { offset: usize, reason: &'static str },

    #[error("malformed expression at offset {offset}")]
    MalformedExpression { offset: usize },

    #[error("malformed component tree: {0}")]
    MalformedTree(&'static str),

    #[error("component nesting deeper than {max}")]
    NestingTooDeep { max: usize },

    #[error("more than {max} operations")]
    TooManyOperations { max: usize },

    #[error("duplicate variable id {0}")]
    DuplicateVariable(VariableId),

    #[error("duplicate component id {0}")]
    DuplicateComponent(ComponentId),

    #[error("duplicate action id {0}")]
    DuplicateAction(ActionId),

    #[error("touch modifier references undeclared action {0}")]
    UnknownAction(ActionId),
}

/// Failure while producing a document buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("opcode 0x{opcode:02x} is not allowed by profile '{profile}'")]
    UnsupportedOperation { opcode: u8, profile: &'static str },

    #[error("document body of {0} bytes does not fit the header length field")]
    TooLarge(usize),

    #[error("{what} has {count} entries, more than the wire format allows")]
    TooManyEntries { what: &'static str, count: usize },
}

/// Failure while reading or writing the variable store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown variable {0}")]
    UnknownVariable(VariableId),

    #[error("variable {id} holds {actual}, expected {expected}")]
    KindMismatch {
        id: VariableId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("variable {0} is an interned constant")]
    ReadOnly(VariableId),

    #[error("duplicate variable id {0}")]
    DuplicateVariable(VariableId),

    #[error("index {index} out of bounds for list {list}")]
    IndexOutOfBounds { list: VariableId, index: i64 },

    #[error("no variable named {0:?}")]
    UnknownName(String),
}

/// Any error surfaced by the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for crate operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
