//! # Codec Error Types
//!
//! All errors that can occur while transferring replicated state.

use thiserror::Error;

use crate::prototype::PrototypeClass;

/// Errors that can occur in the replication codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Not enough bytes remain for the requested primitive.
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        /// Bytes the primitive needed.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A varint kept its continuation bit set past the longest legal encoding.
    #[error("malformed varint: no terminator within {max_bytes} bytes")]
    MalformedVarint {
        /// Longest legal encoding for the requested width.
        max_bytes: usize,
    },

    /// A decoded element count cannot fit in the rest of the buffer.
    #[error("malformed count: {what} declares {count} entries, {remaining} bytes remain")]
    MalformedCount {
        /// What was being counted.
        what: &'static str,
        /// The declared count.
        count: u64,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// An inherited field points at a previous record that does not exist.
    #[error("inconsistent sequencing: {field} inherits from a missing previous record")]
    InconsistentSequencing {
        /// The field that asked for inheritance.
        field: &'static str,
    },

    /// An enumerated field carried a value outside its domain.
    #[error("invalid {what} value: {value}")]
    InvalidEnumValue {
        /// The enumeration being decoded.
        what: &'static str,
        /// The raw wire value.
        value: i64,
    },

    /// The prototype database has no wire value for this prototype id.
    #[error("unknown {class} prototype id 0x{id:X}")]
    UnknownPrototypeId {
        /// Prototype class the reference is scoped to.
        class: PrototypeClass,
        /// The prototype id.
        id: u64,
    },

    /// The prototype database has no prototype for this wire value.
    #[error("unknown {class} prototype enum value {value}")]
    UnknownPrototypeEnum {
        /// Prototype class the reference is scoped to.
        class: PrototypeClass,
        /// The raw wire value.
        value: u64,
    },

    /// Invalid configuration file or prototype table.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
