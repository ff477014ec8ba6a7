//! Operation Codec - binary encoding of documents.
//!
//! ```text
//! header   : api_level u16 | profile_id u16 | length u32
//! operation: opcode u8 | operands (layout fixed per opcode)
//! string   : len u32 | utf-8 bytes
//! id list  : count u16 | u32 * count
//! expr     : token count u16 | tokens (postfix)
//! ```
//!
//! All integers are big-endian. A document decodes in one forward pass; each
//! operation is checked against the profile the document declares, and that
//! profile must be contained in the runtime profile.
//!
//! # Example
//!
//! ```
//! use spark_remote::codec::{decode_document, DocumentWriter};
//! use spark_remote::config::PlayerConfig;
//! use spark_remote::engine::LinearLayout;
//! use spark_remote::profile::CORE_V2;
//!
//! let mut writer = DocumentWriter::new(&CORE_V2);
//! writer.start_row(LinearLayout::default())?;
//! writer.end()?;
//! let bytes = writer.finish()?;
//!
//! let decoded = decode_document(&bytes, &PlayerConfig::default()).unwrap();
//! assert_eq!(decoded.profile.id, CORE_V2.id);
//! assert_eq!(decoded.operations.len(), 2);
//! # Ok::<(), spark_remote::error::EncodeError>(())
//! ```

mod header;
pub mod opcode;
mod operation;
mod reader;
mod writer;

pub use header::{Header, HEADER_LEN};
pub use operation::{DataOp, ExpressionOp, LayoutOp, Operation};
pub use reader::WireReader;
pub use writer::{encode_document, DocumentWriter, WireWriter};

use crate::config::PlayerConfig;
use crate::error::{DecodeError, EncodeError};
use crate::profile::{Profile, ProfileRegistry};

/// Append one operation, rejecting opcodes outside `profile`.
pub fn encode(op: &Operation, writer: &mut WireWriter, profile: &Profile) -> Result<(), EncodeError> {
    let opcode = op.opcode();
    if !profile.allows(opcode) {
        return Err(EncodeError::UnsupportedOperation { opcode, profile: profile.name });
    }
    op.encode(writer)
}

/// Read the next operation, rejecting opcodes outside `profile`.
pub fn decode(reader: &mut WireReader<'_>, profile: &Profile) -> Result<Operation, DecodeError> {
    let offset = reader.offset();
    let opcode = reader.u8()?;
    if !opcode::is_known(opcode) {
        return Err(DecodeError::UnknownOpcode { opcode, offset });
    }
    if !profile.allows(opcode) {
        return Err(DecodeError::UnsupportedOperation { opcode, offset });
    }
    let op = Operation::decode_operands(opcode, reader)?;
    log::trace!(
        target: "spark_remote::codec",
        "{offset:>6}: {} {:?}",
        opcode::name(opcode),
        op
    );
    Ok(op)
}

/// Header, resolved profile and operations of a buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedDocument {
    pub header: Header,
    pub profile: &'static Profile,
    pub operations: Vec<Operation>,
}

/// Validate the header and decode every operation in `bytes`.
pub fn decode_document(bytes: &[u8], config: &PlayerConfig) -> Result<DecodedDocument, DecodeError> {
    let header = Header::parse(bytes)?;
    let registry = ProfileRegistry::builtin();

    let max = registry.max_api_level();
    if header.api_level > max {
        return Err(DecodeError::UnsupportedApiLevel { declared: header.api_level, max });
    }
    let profile = registry
        .by_id(header.profile_id)
        .ok_or(DecodeError::UnknownProfile(header.profile_id))?;
    if header.api_level < profile.api_level {
        return Err(DecodeError::ApiLevelBelowProfile {
            declared: header.api_level,
            profile: profile.name,
            required: profile.api_level,
        });
    }
    if !config.profile.accepts(profile) {
        return Err(DecodeError::IncompatibleProfile {
            document: profile.name,
            runtime: config.profile.name,
        });
    }

    let body = &bytes[HEADER_LEN..];
    if body.len() != header.length as usize {
        return Err(DecodeError::LengthMismatch { declared: header.length, actual: body.len() });
    }

    let mut reader = WireReader::with_base(body, HEADER_LEN);
    let mut operations = Vec::new();
    while !reader.is_empty() {
        if operations.len() >= config.max_operations {
            return Err(DecodeError::TooManyOperations { max: config.max_operations });
        }
        operations.push(decode(&mut reader, profile)?);
    }

    log::debug!(
        target: "spark_remote::codec",
        "decoded {} operations, profile {}@{} (id {})",
        operations.len(),
        profile.name,
        profile.api_level,
        profile.id
    );
    Ok(DecodedDocument { header, profile, operations })
}
