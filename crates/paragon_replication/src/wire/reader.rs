//! # Wire Reader
//!
//! Borrowing input cursor over a caller-owned buffer.
//!
//! A failed read moves the cursor to the end of the buffer: a truncated
//! record can never be mistaken for the start of the next one, and every
//! later read on the same cursor fails as well.

use paragon_shared::Vec3;

use super::quantize::{dequantize, zigzag_decode_32};
use crate::error::{CodecError, CodecResult};

/// Longest legal varint (64 bits in 7-bit groups).
const MAX_VARINT_BYTES: usize = 10;

/// Record reader - decodes wire primitives from a byte slice.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a new reader positioned at the start of `buffer`.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns the number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails the read and drains the cursor.
    fn underrun(&mut self, needed: usize) -> CodecError {
        let remaining = self.remaining();
        self.position = self.buffer.len();
        CodecError::BufferUnderrun { needed, remaining }
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> CodecResult<u8> {
        match self.buffer.get(self.position) {
            Some(&value) => {
                self.position += 1;
                Ok(value)
            }
            None => Err(self.underrun(1)),
        }
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.underrun(len));
        }
        let bytes = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Reads an unsigned 64-bit varint.
    pub fn read_varint_u64(&mut self) -> CodecResult<u64> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::MalformedVarint {
            max_bytes: MAX_VARINT_BYTES,
        })
    }

    /// Reads an unsigned 32-bit varint.
    ///
    /// Bits above 32 are discarded, so sign-extended 64-bit encodings of
    /// negative 32-bit values read back as their two's complement pattern.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_varint_u32(&mut self) -> CodecResult<u32> {
        self.read_varint_u64().map(|value| value as u32)
    }

    /// Reads a zig-zag varint signed 32-bit integer.
    #[inline]
    pub fn read_zigzag_i32(&mut self) -> CodecResult<i32> {
        self.read_varint_u32().map(zigzag_decode_32)
    }

    /// Reads a raw little-endian IEEE-754 float.
    pub fn read_f32(&mut self) -> CodecResult<f32> {
        let bytes = self.read_bytes(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a float quantized at `precision_bits`.
    #[inline]
    pub fn read_quantized_f32(&mut self, precision_bits: u8) -> CodecResult<f32> {
        self.read_zigzag_i32()
            .map(|value| dequantize(value, precision_bits))
    }

    /// Reads a vector whose components were quantized at `precision_bits`.
    ///
    /// All three components are attempted; the first failure is reported.
    pub fn read_quantized_vec3(&mut self, precision_bits: u8) -> CodecResult<Vec3> {
        let x = self.read_quantized_f32(precision_bits);
        let y = self.read_quantized_f32(precision_bits);
        let z = self.read_quantized_f32(precision_bits);
        Ok(Vec3::new(x?, y?, z?))
    }

    /// Validates a decoded element count before anything is allocated for it.
    ///
    /// Every element occupies at least `min_element_bytes`, so a count that
    /// cannot fit in the remaining bytes is rejected as malformed.
    pub fn check_count(
        &self,
        what: &'static str,
        count: u64,
        min_element_bytes: usize,
    ) -> CodecResult<usize> {
        let remaining = self.remaining();
        let fits = usize::try_from(count)
            .ok()
            .filter(|&n| n.saturating_mul(min_element_bytes) <= remaining);
        fits.ok_or(CodecError::MalformedCount {
            what,
            count,
            remaining,
        })
    }
}
