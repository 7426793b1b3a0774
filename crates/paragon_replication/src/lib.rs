//! # PARAGON Replication
//!
//! Binary codec for replicated entity state: locomotion updates, power
//! collections and mission records.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   RECORD CODECS                              │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │   locomotion   │  │     power      │  │    mission     │  │
//! │  │ (+ path delta) │  │ (prev record)  │  │ (+ objectives) │  │
//! │  └───────┬────────┘  └───────┬────────┘  └───────┬────────┘  │
//! │          │                   │                   │           │
//! │  ┌───────┴───────────────────┴───────────────────┴────────┐  │
//! │  │   flags · transfer status · prototype refs · bools     │  │
//! │  └───────────────────────────┬────────────────────────────┘  │
//! │                              │                               │
//! │  ┌───────────────────────────┴────────────────────────────┐  │
//! │  │   wire: varint · zigzag · quantized float · raw f32    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//!
//! - Writers are infallible and append to a [`WireWriter`]
//! - Readers borrow a caller-owned buffer through a [`WireReader`]
//! - A record decode attempts every field and reports the first failure
//! - Codecs hold no state between calls and can run on any thread

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bools;
pub mod config;
pub mod error;
pub mod flags;
pub mod locomotion;
pub mod mission;
pub mod power;
pub mod prototype;
pub mod transfer;
pub mod wire;

pub use bools::{BoolDecoder, BoolEncoder};
pub use config::{CodecConfig, LocomotionConfig};
pub use error::{CodecError, CodecResult};
pub use flags::{LocomotionFlags, LocomotionMessageFlags, PowerSlotFlags};
pub use locomotion::{LocomotionCodec, LocomotionState, LocomotorMethod, NaviSide, PathNode};
pub use mission::{
    decode_missions, encode_missions, InteractionTag, Mission, MissionObjective,
    MissionObjectiveState, MissionState,
};
pub use power::{decode_power_slots, encode_power_slots, PowerIndexProperties, PowerSlotRecord};
pub use prototype::{PrototypeClass, PrototypeEntry, PrototypeLookup, PrototypeTable};
pub use transfer::{FieldSource, TransferStatus};
pub use wire::{WireReader, WireWriter};

pub use paragon_shared::{EntityId, PrototypeId, Vec3};
