//! # Wire Primitives
//!
//! Byte-level encoding shared by every record codec.
//!
//! ## Primitive Layout
//!
//! ```text
//! varint      LEB128, 7 bits per byte, low group first, MSB = continuation
//! zigzag i32  (v << 1) ^ (v >> 31), then varint
//! quantized   round(v × 2^precision) as zigzag i32
//! vec3        quantized x, y, z
//! raw f32     4 bytes little-endian IEEE-754
//! ```
//!
//! ## Design Philosophy
//!
//! - Small magnitudes cost one byte, whatever their sign
//! - Precision is chosen per field by the record codec, never negotiated
//! - Reads are fallible, writes are not

mod quantize;
mod reader;
mod writer;

pub use quantize::{
    dequantize, quantize, requantize, scale, step, zigzag_decode_32, zigzag_encode_32,
    MAX_PRECISION_BITS,
};
pub use reader::WireReader;
pub use writer::{varint_len, WireWriter, DEFAULT_CAPACITY};
