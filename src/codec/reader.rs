//! Resumable big-endian cursor over a byte buffer.
//!
//! Every read either advances the cursor by exactly the bytes consumed or
//! fails with [`DecodeError::Truncated`] and leaves the cursor where it was.

use crate::error::DecodeError;
use crate::types::{ActionId, ComponentId, VariableId};

#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    /// Absolute offset of `bytes[0]` in the document, for error reporting.
    base: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_base(bytes, 0)
    }

    /// Reader whose reported offsets start at `base`.
    pub fn with_base(bytes: &'a [u8], base: usize) -> Self {
        Self { bytes, pos: 0, base }
    }

    /// Absolute offset of the next unread byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let slice = self.take_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn take_slice(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                offset: self.offset(),
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.take().map(u16::from_be_bytes)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.take().map(u32::from_be_bytes)
    }

    pub fn i32(&mut self) -> Result<i32, DecodeError> {
        self.take().map(i32::from_be_bytes)
    }

    pub fn f32(&mut self) -> Result<f32, DecodeError> {
        self.take().map(f32::from_be_bytes)
    }

    /// `len u32 | utf-8 bytes`
    pub fn string(&mut self) -> Result<String, DecodeError> {
        let start = self.pos;
        let len = self.u32()? as usize;
        let offset = self.offset();
        let bytes = match self.take_slice(len) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.pos = start;
                return Err(err);
            }
        };
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| DecodeError::InvalidOperand {
                offset,
                reason: "string is not valid utf-8",
            })
    }

    pub fn variable(&mut self) -> Result<VariableId, DecodeError> {
        self.u32().map(VariableId)
    }

    pub fn component(&mut self) -> Result<ComponentId, DecodeError> {
        self.u32().map(ComponentId)
    }

    pub fn action(&mut self) -> Result<ActionId, DecodeError> {
        self.u32().map(ActionId)
    }

    /// `count u16 | u32 * count`
    pub fn id_list(&mut self) -> Result<Vec<u32>, DecodeError> {
        let start = self.pos;
        let count = self.u16()? as usize;
        if self.remaining() < count * 4 {
            let err = DecodeError::Truncated {
                offset: self.offset(),
                needed: count * 4 - self.remaining(),
            };
            self.pos = start;
            return Err(err);
        }
        (0..count).map(|_| self.u32()).collect()
    }

    /// Read an enum byte through its `TryFrom<u8>` impl.
    pub fn enum_u8<T: TryFrom<u8>>(&mut self, reason: &'static str) -> Result<T, DecodeError> {
        let offset = self.offset();
        let raw = self.u8()?;
        T::try_from(raw).map_err(|_| DecodeError::InvalidOperand { offset, reason })
    }
}
