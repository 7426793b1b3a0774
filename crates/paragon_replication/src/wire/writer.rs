//! # Wire Writer
//!
//! Growable output cursor for replicated records.
//!
//! Writes never fail: the buffer grows as needed and every finite input has
//! an encoding. Callers that reuse a writer across records should `reset()`
//! it instead of allocating a new one.

use paragon_shared::Vec3;

use super::quantize::{quantize, zigzag_encode_32};

/// Default initial capacity (one MTU-safe packet).
pub const DEFAULT_CAPACITY: usize = 1200;

/// Record writer - appends wire primitives to an owned buffer.
#[derive(Debug, Clone, Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl WireWriter {
    /// Creates a new writer with a packet-sized buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a new writer with the given initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Resets the writer for reuse, keeping its allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Drops everything written after the first `len` bytes.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer, returning the written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes an unsigned 64-bit varint (LEB128, low group first).
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_varint_u64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Writes an unsigned 32-bit varint.
    #[inline]
    pub fn write_varint_u32(&mut self, value: u32) {
        self.write_varint_u64(u64::from(value));
    }

    /// Writes a signed 32-bit integer, zig-zag mapped then varint encoded.
    #[inline]
    pub fn write_zigzag_i32(&mut self, value: i32) {
        self.write_varint_u32(zigzag_encode_32(value));
    }

    /// Writes a raw little-endian IEEE-754 float.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a float quantized at `precision_bits`, zig-zag varint encoded.
    #[inline]
    pub fn write_quantized_f32(&mut self, value: f32, precision_bits: u8) {
        self.write_zigzag_i32(quantize(value, precision_bits));
    }

    /// Writes each component of a vector quantized at `precision_bits`.
    pub fn write_quantized_vec3(&mut self, value: Vec3, precision_bits: u8) {
        self.write_quantized_f32(value.x, precision_bits);
        self.write_quantized_f32(value.y, precision_bits);
        self.write_quantized_f32(value.z, precision_bits);
    }
}

/// Number of bytes a value occupies as a varint.
#[must_use]
pub const fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}
