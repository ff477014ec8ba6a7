//! Document header.
//!
//! ```text
//! api_level u16 | profile_id u16 | length u32
//! ```
//!
//! `length` counts the operation bytes that follow the header.

use crate::error::DecodeError;

/// Encoded size of [`Header`].
pub const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    pub api_level: u16,
    pub profile_id: u16,
    pub length: u32,
}

impl Header {
    /// Parse the fixed-size header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let Some(raw) = bytes.get(..HEADER_LEN) else {
            return Err(DecodeError::MissingHeader { len: bytes.len() });
        };
        Ok(Self {
            api_level: u16::from_be_bytes([raw[0], raw[1]]),
            profile_id: u16::from_be_bytes([raw[2], raw[3]]),
            length: u32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&self.api_level.to_be_bytes());
        out[2..4].copy_from_slice(&self.profile_id.to_be_bytes());
        out[4..8].copy_from_slice(&self.length.to_be_bytes());
        out
    }
}
