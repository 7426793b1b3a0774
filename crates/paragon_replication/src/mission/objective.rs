//! Mission objective sub-record.
//!
//! ```text
//! index u8 │ state zigzag │ expiry varint64 │ tags │ 4 × count varint32
//!
//! tags: count varint64, then per tag entity, region, timestamp (varint64)
//! ```

use std::fmt;

use paragon_shared::EntityId;

use crate::error::{CodecError, CodecResult};
use crate::transfer::TransferStatus;
use crate::wire::{WireReader, WireWriter};

/// Smallest encoded objective: every field one byte, no tags.
pub const MIN_OBJECTIVE_BYTES: usize = 8;

/// Smallest encoded interaction tag.
pub const MIN_TAG_BYTES: usize = 3;

/// Progress state of one objective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MissionObjectiveState {
    /// Not set up.
    #[default]
    Invalid = 0,
    /// Can be started.
    Available = 1,
    /// In progress.
    Active = 2,
    /// Done.
    Completed = 3,
    /// Failed.
    Failed = 4,
    /// Bypassed by mission logic.
    Skipped = 5,
}

impl MissionObjectiveState {
    /// Converts a wire value.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidEnumValue`] for values outside the state range.
    pub fn from_i32(value: i32) -> CodecResult<Self> {
        match value {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::Available),
            2 => Ok(Self::Active),
            3 => Ok(Self::Completed),
            4 => Ok(Self::Failed),
            5 => Ok(Self::Skipped),
            _ => Err(CodecError::InvalidEnumValue {
                what: "objective state",
                value: i64::from(value),
            }),
        }
    }
}

/// An entity that interacted with an objective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InteractionTag {
    /// Interacting entity.
    pub entity_id: EntityId,
    /// Region the interaction happened in.
    pub region_id: u64,
    /// Game time of the interaction.
    pub timestamp: u64,
}

/// One objective of a mission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MissionObjective {
    /// Position within the mission's objective list.
    pub objective_index: u8,
    /// Progress state.
    pub state: MissionObjectiveState,
    /// Game time the current state expires, 0 for never.
    pub time_expire_current_state: u64,
    /// Entities that interacted with the objective.
    pub interaction_tags: Vec<InteractionTag>,
    /// Completion progress.
    pub current_count: u32,
    /// Progress needed to complete.
    pub required_count: u32,
    /// Failure progress.
    pub fail_current_count: u32,
    /// Failure progress that fails the objective.
    pub fail_required_count: u32,
}

impl MissionObjective {
    /// An active objective with no progress.
    #[must_use]
    pub const fn active(objective_index: u8) -> Self {
        Self {
            objective_index,
            state: MissionObjectiveState::Active,
            time_expire_current_state: 0,
            interaction_tags: Vec::new(),
            current_count: 0,
            required_count: 0,
            fail_current_count: 0,
            fail_required_count: 0,
        }
    }

    /// Writes the objective.
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(&self, writer: &mut WireWriter) {
        writer.write_u8(self.objective_index);
        writer.write_zigzag_i32(self.state as i32);
        writer.write_varint_u64(self.time_expire_current_state);

        writer.write_varint_u64(self.interaction_tags.len() as u64);
        for tag in &self.interaction_tags {
            writer.write_varint_u64(tag.entity_id.get());
            writer.write_varint_u64(tag.region_id);
            writer.write_varint_u64(tag.timestamp);
        }

        writer.write_varint_u32(self.current_count);
        writer.write_varint_u32(self.required_count);
        writer.write_varint_u32(self.fail_current_count);
        writer.write_varint_u32(self.fail_required_count);
    }

    /// Reads one objective.
    ///
    /// # Errors
    ///
    /// The first field failure; every field is attempted.
    pub fn decode(reader: &mut WireReader<'_>) -> CodecResult<Self> {
        let mut status = TransferStatus::new();
        let objective = Self::decode_with_status(reader, &mut status);
        status.finish().map(|()| objective)
    }

    pub(crate) fn decode_with_status(reader: &mut WireReader<'_>, status: &mut TransferStatus) -> Self {
        let objective_index = status.take(reader.read_u8());
        let state = status.take(
            reader
                .read_zigzag_i32()
                .and_then(MissionObjectiveState::from_i32),
        );
        let time_expire_current_state = status.take(reader.read_varint_u64());

        let mut interaction_tags = Vec::new();
        let declared = status.take(reader.read_varint_u64());
        match reader.check_count("interaction tags", declared, MIN_TAG_BYTES) {
            Ok(count) => {
                interaction_tags.reserve(count);
                for _ in 0..count {
                    interaction_tags.push(InteractionTag {
                        entity_id: EntityId(status.take(reader.read_varint_u64())),
                        region_id: status.take(reader.read_varint_u64()),
                        timestamp: status.take(reader.read_varint_u64()),
                    });
                }
            }
            Err(error) => status.record(error),
        }

        Self {
            objective_index,
            state,
            time_expire_current_state,
            interaction_tags,
            current_count: status.take(reader.read_varint_u32()),
            required_count: status.take(reader.read_varint_u32()),
            fail_current_count: status.take(reader.read_varint_u32()),
            fail_required_count: status.take(reader.read_varint_u32()),
        }
    }
}

impl fmt::Display for MissionObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index={} state={:?} expire=0x{:X} count={}/{} fail={}/{}",
            self.objective_index,
            self.state,
            self.time_expire_current_state,
            self.current_count,
            self.required_count,
            self.fail_current_count,
            self.fail_required_count
        )?;
        for tag in &self.interaction_tags {
            write!(f, " tag[{} region={} t={}]", tag.entity_id, tag.region_id, tag.timestamp)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MissionObjective {
        MissionObjective {
            objective_index: 2,
            state: MissionObjectiveState::Completed,
            time_expire_current_state: 0x1_0000,
            interaction_tags: vec![InteractionTag {
                entity_id: EntityId(512),
                region_id: 7,
                timestamp: 99,
            }],
            current_count: 5,
            required_count: 5,
            fail_current_count: 0,
            fail_required_count: 1,
        }
    }

    #[test]
    fn test_objective_round_trip() {
        let objective = sample();
        let mut writer = WireWriter::new();
        objective.encode(&mut writer);

        let mut reader = WireReader::new(writer.as_slice());
        assert_eq!(MissionObjective::decode(&mut reader), Ok(objective));
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_minimal_objective_bytes() {
        let mut writer = WireWriter::new();
        MissionObjective::active(0).encode(&mut writer);
        assert_eq!(writer.as_slice(), &[0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(writer.len(), MIN_OBJECTIVE_BYTES);
    }

    #[test]
    fn test_invalid_state_still_consumes_record() {
        let mut writer = WireWriter::new();
        MissionObjective::active(1).encode(&mut writer);
        let mut bytes = writer.into_bytes();
        bytes[1] = 0x14; // zigzag 10

        let mut reader = WireReader::new(&bytes);
        assert_eq!(
            MissionObjective::decode(&mut reader),
            Err(CodecError::InvalidEnumValue { what: "objective state", value: 10 })
        );
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_tag_count_past_buffer() {
        let bytes = [0x00, 0x02, 0x00, 0x64, 0x00];
        let mut reader = WireReader::new(&bytes);
        assert!(matches!(
            MissionObjective::decode(&mut reader),
            Err(CodecError::MalformedCount { what: "interaction tags", count: 100, .. })
        ));
    }
}
