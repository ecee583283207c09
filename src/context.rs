//! Per-call decode state: the source buffer and the cursor offset.
//!
//! A context exists for the duration of one top-level decode call. It
//! borrows the buffer read-only and never outlives the call; the cursor
//! only moves forward. Out-of-bounds reads are surfaced as
//! [DecodeError::TruncatedInput] with an empty path, which the engine
//! fills in while the error unwinds.

use crate::{
    bytes,
    errors::DecodeError,
    field::{Endianness, Width},
};

pub struct DecodeContext<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> DecodeContext<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current cursor position in bytes from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    pub(crate) fn read_unsigned(
        &mut self,
        width: Width,
        endianness: Endianness,
    ) -> Result<u64, DecodeError> {
        let (value, consumed) = bytes::read_unsigned(self.data, self.offset, width, endianness)?;
        self.offset += consumed;
        Ok(value)
    }

    pub(crate) fn read_signed(
        &mut self,
        width: Width,
        endianness: Endianness,
    ) -> Result<i64, DecodeError> {
        let (value, consumed) = bytes::read_signed(self.data, self.offset, width, endianness)?;
        self.offset += consumed;
        Ok(value)
    }

    pub(crate) fn read_f32(&mut self, endianness: Endianness) -> Result<f32, DecodeError> {
        let (value, consumed) = bytes::read_f32(self.data, self.offset, endianness)?;
        self.offset += consumed;
        Ok(value)
    }

    pub(crate) fn read_f64(&mut self, endianness: Endianness) -> Result<f64, DecodeError> {
        let (value, consumed) = bytes::read_f64(self.data, self.offset, endianness)?;
        self.offset += consumed;
        Ok(value)
    }
}
