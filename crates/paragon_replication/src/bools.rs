//! # Bool Batching
//!
//! Boolean fields of a batch of records are not written inline. Each record
//! queues its bools on a shared [`BoolEncoder`]; after the last record the
//! encoder flushes them as one packed tail:
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────┐
//! │ count varint │ ceil(count / 8) bytes, LSB first │
//! └──────────────┴──────────────────────────────────┘
//! ```
//!
//! On the read side the batch decodes every record first, reads the tail
//! with [`BoolDecoder::read_tail`], then hands the bools back to the records
//! in queue order.

use crate::error::{CodecError, CodecResult};
use crate::wire::{WireReader, WireWriter};

/// Bool packer - collects bools and flushes them as a packed tail.
#[derive(Debug, Default, Clone)]
pub struct BoolEncoder {
    buffer: Vec<u8>,
    bit_position: usize,
}

impl BoolEncoder {
    /// Creates an empty encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            bit_position: 0,
        }
    }

    /// Resets the encoder.
    pub fn reset(&mut self) {
        self.bit_position = 0;
        self.buffer.clear();
    }

    /// Number of queued bools.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bit_position
    }

    /// True if nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bit_position == 0
    }

    /// Number of packed bytes (rounded up).
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        (self.bit_position + 7) / 8
    }

    /// Returns the packed bits.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.byte_len()]
    }

    /// Queues one bool at the next bit, least significant first.
    pub fn queue(&mut self, value: bool) {
        let byte_idx = self.bit_position / 8;
        if byte_idx == self.buffer.len() {
            self.buffer.push(0);
        }
        if value {
            self.buffer[byte_idx] |= 1 << (self.bit_position % 8);
        }
        self.bit_position += 1;
    }

    /// Writes the packed tail and resets the encoder.
    #[allow(clippy::cast_possible_truncation)]
    pub fn flush(&mut self, writer: &mut WireWriter) {
        writer.write_varint_u32(self.bit_position as u32);
        writer.write_bytes(self.as_slice());
        self.reset();
    }
}

/// Bool unpacker - hands out the bools of a packed tail in order.
#[derive(Debug, Default, Clone)]
pub struct BoolDecoder {
    bits: Vec<u8>,
    count: usize,
    read_position: usize,
}

impl BoolDecoder {
    /// Reads a packed tail.
    ///
    /// # Errors
    ///
    /// Primitive read failures, or [`CodecError::MalformedCount`] if the
    /// declared count needs more bytes than remain.
    pub fn read_tail(reader: &mut WireReader<'_>) -> CodecResult<Self> {
        let declared = u64::from(reader.read_varint_u32()?);
        let byte_len = usize::try_from(declared.div_ceil(8)).unwrap_or(usize::MAX);
        if byte_len > reader.remaining() {
            return Err(CodecError::MalformedCount {
                what: "bool tail",
                count: declared,
                remaining: reader.remaining(),
            });
        }
        let bits = reader.read_bytes(byte_len)?.to_vec();
        Ok(Self {
            bits,
            count: usize::try_from(declared).unwrap_or(usize::MAX),
            read_position: 0,
        })
    }

    /// Bools not yet handed out.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.count - self.read_position
    }

    /// Next bool in queue order.
    ///
    /// # Errors
    ///
    /// [`CodecError::MalformedCount`] if the tail holds fewer bools than the
    /// batch's records asked for.
    pub fn next_bool(&mut self) -> CodecResult<bool> {
        if self.read_position >= self.count {
            return Err(CodecError::MalformedCount {
                what: "bool tail",
                count: self.count as u64,
                remaining: 0,
            });
        }
        let byte = self.bits[self.read_position / 8];
        let value = (byte >> (self.read_position % 8)) & 1 == 1;
        self.read_position += 1;
        Ok(value)
    }
}
