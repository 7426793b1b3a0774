//! # Mission Replication
//!
//! Missions have no flag word: every field is always sent, in this order.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────┐
//! │ state            │ zigzag varint32                          │
//! │ expiry           │ varint64                                 │
//! │ prototype        │ mission prototype enum value             │
//! │ random           │ zigzag varint32                          │
//! │ objectives       │ count varint64, then each objective      │
//! │ participants     │ count varint64, then each id varint64    │
//! │ suspended        │ queued on the batch bool tail            │
//! └──────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! The suspended flag is not in the record body. [`encode_missions`] and
//! [`decode_missions`] handle the tail for a whole batch; callers coding a
//! single mission inside their own batch use [`Mission::encode`] with a
//! shared [`BoolEncoder`] and [`Mission::resolve_bools`] after the tail.

mod objective;

use std::fmt::{self, Write as _};

use paragon_shared::{EntityId, PrototypeId};

use crate::bools::{BoolDecoder, BoolEncoder};
use crate::error::{CodecError, CodecResult};
use crate::prototype::{
    display_name, read_prototype_ref, write_prototype_ref, PrototypeClass, PrototypeLookup,
};
use crate::transfer::TransferStatus;
use crate::wire::{WireReader, WireWriter};

pub use objective::{
    InteractionTag, MissionObjective, MissionObjectiveState, MIN_OBJECTIVE_BYTES, MIN_TAG_BYTES,
};

/// Smallest encoded mission body: six one-byte fields.
pub const MIN_MISSION_BYTES: usize = 6;

/// Lifecycle state of a mission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MissionState {
    /// Not set up.
    #[default]
    Invalid = 0,
    /// Prerequisites not met.
    Inactive = 1,
    /// Can be accepted.
    Available = 2,
    /// In progress.
    Active = 3,
    /// Done.
    Completed = 4,
    /// Failed.
    Failed = 5,
}

impl MissionState {
    /// Converts a wire value.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidEnumValue`] for values outside the state range.
    pub fn from_i32(value: i32) -> CodecResult<Self> {
        match value {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::Inactive),
            2 => Ok(Self::Available),
            3 => Ok(Self::Active),
            4 => Ok(Self::Completed),
            5 => Ok(Self::Failed),
            _ => Err(CodecError::InvalidEnumValue {
                what: "mission state",
                value: i64::from(value),
            }),
        }
    }
}

impl fmt::Display for MissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Replicated state of one mission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mission {
    /// Lifecycle state.
    pub state: MissionState,
    /// Game time the current state expires, 0 for never.
    pub time_expire_current_state: u64,
    /// Mission prototype.
    pub prototype_id: PrototypeId,
    /// Seed for the mission's random choices.
    pub random: i32,
    /// Objectives in index order.
    pub objectives: Vec<MissionObjective>,
    /// Players taking part.
    pub participants: Vec<EntityId>,
    /// Paused by mission logic.
    pub suspended: bool,
}

impl Mission {
    /// A freshly started mission with one active objective.
    #[must_use]
    pub fn started(prototype_id: PrototypeId, random: i32) -> Self {
        Self {
            state: MissionState::Active,
            prototype_id,
            random,
            objectives: vec![MissionObjective::active(0)],
            ..Self::default()
        }
    }

    /// Writes the mission body and queues `suspended` on `bools`.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownPrototypeId`] if the mission prototype is not in
    /// the lookup. The writer and `bools` are left as they were.
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(
        &self,
        writer: &mut WireWriter,
        prototypes: &dyn PrototypeLookup,
        bools: &mut BoolEncoder,
    ) -> CodecResult<()> {
        let start = writer.len();
        writer.write_zigzag_i32(self.state as i32);
        writer.write_varint_u64(self.time_expire_current_state);
        if let Err(error) =
            write_prototype_ref(writer, prototypes, PrototypeClass::Mission, self.prototype_id)
        {
            writer.truncate(start);
            return Err(error);
        }
        writer.write_zigzag_i32(self.random);

        writer.write_varint_u64(self.objectives.len() as u64);
        for objective in &self.objectives {
            objective.encode(writer);
        }

        writer.write_varint_u64(self.participants.len() as u64);
        for participant in &self.participants {
            writer.write_varint_u64(participant.get());
        }

        bools.queue(self.suspended);
        Ok(())
    }

    /// Reads a mission body. `suspended` stays `false` until
    /// [`Mission::resolve_bools`] runs.
    ///
    /// # Errors
    ///
    /// The first field failure; every field is attempted.
    pub fn decode(reader: &mut WireReader<'_>, prototypes: &dyn PrototypeLookup) -> CodecResult<Self> {
        let mut status = TransferStatus::new();
        let mission = Self::decode_with_status(reader, prototypes, &mut status);
        status.finish().map(|()| mission)
    }

    fn decode_with_status(
        reader: &mut WireReader<'_>,
        prototypes: &dyn PrototypeLookup,
        status: &mut TransferStatus,
    ) -> Self {
        let state = status.take(reader.read_zigzag_i32().and_then(MissionState::from_i32));
        let time_expire_current_state = status.take(reader.read_varint_u64());
        let prototype_id =
            status.take(read_prototype_ref(reader, prototypes, PrototypeClass::Mission));
        let random = status.take(reader.read_zigzag_i32());

        let mut objectives = Vec::new();
        let declared = status.take(reader.read_varint_u64());
        match reader.check_count("objectives", declared, MIN_OBJECTIVE_BYTES) {
            Ok(count) => {
                objectives.reserve(count);
                for _ in 0..count {
                    objectives.push(MissionObjective::decode_with_status(reader, status));
                }
            }
            Err(error) => status.record(error),
        }

        let mut participants = Vec::new();
        let declared = status.take(reader.read_varint_u64());
        match reader.check_count("participants", declared, 1) {
            Ok(count) => {
                participants.reserve(count);
                for _ in 0..count {
                    participants.push(EntityId(status.take(reader.read_varint_u64())));
                }
            }
            Err(error) => status.record(error),
        }

        Self {
            state,
            time_expire_current_state,
            prototype_id,
            random,
            objectives,
            participants,
            suspended: false,
        }
    }

    /// Takes this mission's bools from a batch tail, in encode order.
    ///
    /// # Errors
    ///
    /// [`CodecError::MalformedCount`] if the tail ran out.
    pub fn resolve_bools(&mut self, bools: &mut BoolDecoder) -> CodecResult<()> {
        self.suspended = bools.next_bool()?;
        Ok(())
    }

    /// Multi-line dump with the mission's display name.
    #[must_use]
    pub fn dump(&self, prototypes: &dyn PrototypeLookup) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "State: {}", self.state);
        let _ = writeln!(out, "TimeExpireCurrentState: 0x{:X}", self.time_expire_current_state);
        let _ = writeln!(out, "PrototypeId: {}", display_name(prototypes, self.prototype_id));
        let _ = writeln!(out, "Random: 0x{:X}", self.random);
        for (i, objective) in self.objectives.iter().enumerate() {
            let _ = writeln!(out, "Objective{i}: {objective}");
        }
        for (i, participant) in self.participants.iter().enumerate() {
            let _ = writeln!(out, "Participant{i}: {participant}");
        }
        let _ = writeln!(out, "Suspended: {}", self.suspended);
        out
    }
}

/// Writes a mission batch: count, every body, then the bool tail.
///
/// # Errors
///
/// The first mission encode failure. The writer is rolled back to where it
/// started.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_missions(
    writer: &mut WireWriter,
    missions: &[Mission],
    prototypes: &dyn PrototypeLookup,
) -> CodecResult<()> {
    let start = writer.len();
    let mut bools = BoolEncoder::new();
    writer.write_varint_u64(missions.len() as u64);
    for mission in missions {
        if let Err(error) = mission.encode(writer, prototypes, &mut bools) {
            writer.truncate(start);
            return Err(error);
        }
    }
    bools.flush(writer);
    Ok(())
}

/// Reads a mission batch written by [`encode_missions`].
///
/// # Errors
///
/// [`CodecError::MalformedCount`] for a mission count the buffer cannot hold,
/// otherwise the first failure across all bodies and the tail.
pub fn decode_missions(
    reader: &mut WireReader<'_>,
    prototypes: &dyn PrototypeLookup,
) -> CodecResult<Vec<Mission>> {
    let declared = reader.read_varint_u64()?;
    let count = reader.check_count("missions", declared, MIN_MISSION_BYTES)?;

    let mut status = TransferStatus::new();
    let mut missions = Vec::with_capacity(count);
    for _ in 0..count {
        missions.push(Mission::decode_with_status(reader, prototypes, &mut status));
    }

    match BoolDecoder::read_tail(reader) {
        Ok(mut bools) => {
            for mission in &mut missions {
                status.check(mission.resolve_bools(&mut bools));
            }
        }
        Err(error) => status.record(error),
    }

    tracing::trace!(
        "Decoded {} missions, {} failed transfers",
        missions.len(),
        status.failures()
    );
    status.finish().map(|()| missions)
}
