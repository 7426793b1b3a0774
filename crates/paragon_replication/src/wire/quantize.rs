//! # Fixed-Point Quantization and Zig-Zag Mapping
//!
//! Floats travel as signed integers scaled by `2^precision_bits` and rounded
//! to the nearest step. Signed integers travel zig-zag mapped so that small
//! magnitudes of either sign stay short as varints.
//!
//! ```text
//! value  ──×2^p──▶ round ──▶ i32 ──zigzag──▶ u32 ──LEB128──▶ wire
//! ```
//!
//! Quantization is lossy: a decoded value differs from the original by at
//! most half a step (`0.5 / 2^p`). Non-finite input follows Rust's saturating
//! float-to-int cast: NaN quantizes to 0, infinities clamp to `i32` bounds.

/// Highest precision accepted by the quantizer.
///
/// Beyond this the scaled value of ordinary world coordinates overflows the
/// 32-bit wire integer.
pub const MAX_PRECISION_BITS: u8 = 16;

/// Maps a signed 32-bit integer onto an unsigned one, interleaving signs.
#[inline]
#[must_use]
pub const fn zigzag_encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`].
#[inline]
#[must_use]
pub const fn zigzag_decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Scale factor for a precision.
#[inline]
#[must_use]
pub fn scale(precision_bits: u8) -> f32 {
    debug_assert!(precision_bits <= MAX_PRECISION_BITS);
    // Exact: powers of two up to 2^16 are representable.
    #[allow(clippy::cast_precision_loss)]
    let factor = (1u32 << precision_bits) as f32;
    factor
}

/// Quantizes a float to its fixed-point integer.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn quantize(value: f32, precision_bits: u8) -> i32 {
    (value * scale(precision_bits)).round() as i32
}

/// Converts a fixed-point integer back to a float.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn dequantize(value: i32, precision_bits: u8) -> f32 {
    value as f32 / scale(precision_bits)
}

/// The value a float decodes to after one trip over the wire.
#[inline]
#[must_use]
pub fn requantize(value: f32, precision_bits: u8) -> f32 {
    dequantize(quantize(value, precision_bits), precision_bits)
}

/// Largest error quantization may introduce at a precision (one step).
#[inline]
#[must_use]
pub fn step(precision_bits: u8) -> f32 {
    1.0 / scale(precision_bits)
}
