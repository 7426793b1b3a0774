//! # Power Slot Replication
//!
//! The power collection of an entity is sent as a sequence of slot records.
//! Most slots share their levels with the slot before them, so each record
//! carries a [`PowerSlotFlags`] word that elides any field equal to a
//! well-known value or to the previous record's value.
//!
//! ## Record Layout
//!
//! ```text
//! power ref   prototype enum value      always
//! flags       varint32                  always
//! rank        varint32                  unless POWER_RANK_IS_ZERO
//! char level  varint32                  unless IS_ONE / FROM_PREVIOUS
//! combat lvl  varint32                  unless IS_ONE / FROM_PREVIOUS / SAME_AS_CHARACTER
//! item level  varint32                  unless ITEM_LEVEL_IS_ONE
//! variation   f32 little-endian         unless ITEM_VARIATION_IS_ONE
//! ref count   varint32                  unless POWER_REF_COUNT_IS_ONE
//! ```
//!
//! Records must be decoded in order: record `i` may read its levels from
//! record `i - 1`.

use std::fmt::{self, Write as _};

use paragon_shared::PrototypeId;

use crate::error::{CodecError, CodecResult};
use crate::flags::PowerSlotFlags;
use crate::prototype::{
    display_name, read_prototype_ref, write_prototype_ref, PrototypeClass, PrototypeLookup,
};
use crate::transfer::TransferStatus;
use crate::wire::{WireReader, WireWriter};

/// Smallest encoded record: a one-byte reference and a one-byte flag word.
pub const MIN_RECORD_BYTES: usize = 2;

/// Index properties of a power slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerIndexProperties {
    /// Power rank.
    pub power_rank: i32,
    /// Level of the owning character.
    pub character_level: i32,
    /// Combat level the power scales with.
    pub combat_level: i32,
    /// Level of the item granting the power.
    pub item_level: i32,
    /// Stat variation of the item granting the power.
    pub item_variation: f32,
}

impl Default for PowerIndexProperties {
    fn default() -> Self {
        Self {
            power_rank: 0,
            character_level: 1,
            combat_level: 1,
            item_level: 1,
            item_variation: 1.0,
        }
    }
}

impl fmt::Display for PowerIndexProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank={} characterLevel={} combatLevel={} itemLevel={} itemVariation={}",
            self.power_rank,
            self.character_level,
            self.combat_level,
            self.item_level,
            self.item_variation
        )
    }
}

/// Where a level comes from when decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LevelSource {
    One,
    PreviousRecord,
    SameAsCharacterLevel,
    Wire,
}

/// First matching bit wins; no match reads from the wire.
const CHARACTER_LEVEL_RULES: [(PowerSlotFlags, LevelSource); 2] = [
    (PowerSlotFlags::CHARACTER_LEVEL_IS_ONE, LevelSource::One),
    (
        PowerSlotFlags::CHARACTER_LEVEL_IS_FROM_PREVIOUS_RECORD,
        LevelSource::PreviousRecord,
    ),
];

const COMBAT_LEVEL_RULES: [(PowerSlotFlags, LevelSource); 3] = [
    (PowerSlotFlags::COMBAT_LEVEL_IS_ONE, LevelSource::One),
    (
        PowerSlotFlags::COMBAT_LEVEL_IS_FROM_PREVIOUS_RECORD,
        LevelSource::PreviousRecord,
    ),
    (
        PowerSlotFlags::COMBAT_LEVEL_IS_SAME_AS_CHARACTER_LEVEL,
        LevelSource::SameAsCharacterLevel,
    ),
];

fn level_source(flags: PowerSlotFlags, rules: &[(PowerSlotFlags, LevelSource)]) -> LevelSource {
    rules
        .iter()
        .find(|(bit, _)| flags.contains(*bit))
        .map_or(LevelSource::Wire, |&(_, source)| source)
}

/// One slot of a power collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerSlotRecord {
    /// The power.
    pub power_prototype_id: PrototypeId,
    /// Which fields are elided.
    pub flags: PowerSlotFlags,
    /// Index properties.
    pub index_props: PowerIndexProperties,
    /// How many sources granted the power.
    pub power_ref_count: u32,
}

impl Default for PowerSlotRecord {
    fn default() -> Self {
        Self {
            power_prototype_id: PrototypeId::INVALID,
            flags: PowerSlotFlags::empty(),
            index_props: PowerIndexProperties::default(),
            power_ref_count: 1,
        }
    }
}

impl PowerSlotRecord {
    /// Creates a record with explicit flags.
    #[must_use]
    pub const fn new(
        power_prototype_id: PrototypeId,
        flags: PowerSlotFlags,
        index_props: PowerIndexProperties,
        power_ref_count: u32,
    ) -> Self {
        Self {
            power_prototype_id,
            flags,
            index_props,
            power_ref_count,
        }
    }

    /// Chooses the smallest flag word that reproduces this record after
    /// `previous`.
    ///
    /// Shortcut values win over inheritance, and inheritance wins over
    /// "combat same as character", matching the decode order.
    #[must_use]
    pub fn derive_flags(&self, previous: Option<&Self>) -> PowerSlotFlags {
        let props = &self.index_props;
        let previous = previous.map(|record| &record.index_props);
        let mut flags = PowerSlotFlags::empty();

        if self.power_ref_count == 1 {
            flags |= PowerSlotFlags::POWER_REF_COUNT_IS_ONE;
        }
        if props.power_rank == 0 {
            flags |= PowerSlotFlags::POWER_RANK_IS_ZERO;
        }

        if props.character_level == 1 {
            flags |= PowerSlotFlags::CHARACTER_LEVEL_IS_ONE;
        } else if previous.is_some_and(|p| p.character_level == props.character_level) {
            flags |= PowerSlotFlags::CHARACTER_LEVEL_IS_FROM_PREVIOUS_RECORD;
        }

        if props.combat_level == 1 {
            flags |= PowerSlotFlags::COMBAT_LEVEL_IS_ONE;
        } else if previous.is_some_and(|p| p.combat_level == props.combat_level) {
            flags |= PowerSlotFlags::COMBAT_LEVEL_IS_FROM_PREVIOUS_RECORD;
        } else if props.combat_level == props.character_level {
            flags |= PowerSlotFlags::COMBAT_LEVEL_IS_SAME_AS_CHARACTER_LEVEL;
        }

        if props.item_level == 1 {
            flags |= PowerSlotFlags::ITEM_LEVEL_IS_ONE;
        }
        if props.item_variation.to_bits() == 1.0f32.to_bits() {
            flags |= PowerSlotFlags::ITEM_VARIATION_IS_ONE;
        }
        flags
    }

    /// Returns a copy with flags from [`PowerSlotRecord::derive_flags`].
    #[must_use]
    pub fn with_derived_flags(mut self, previous: Option<&Self>) -> Self {
        self.flags = self.derive_flags(previous);
        self
    }

    /// Writes the record. Fields are written exactly as `flags` selects.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownPrototypeId`] if the power is not in the lookup.
    /// Nothing is written in that case.
    #[allow(clippy::cast_sign_loss)]
    pub fn encode(&self, writer: &mut WireWriter, prototypes: &dyn PrototypeLookup) -> CodecResult<()> {
        let flags = self.flags;
        let props = &self.index_props;

        write_prototype_ref(writer, prototypes, PrototypeClass::Power, self.power_prototype_id)?;
        writer.write_varint_u32(flags.bits());

        if flags.writes_power_rank() {
            writer.write_varint_u32(props.power_rank as u32);
        }
        if flags.writes_character_level() {
            writer.write_varint_u32(props.character_level as u32);
        }
        if flags.writes_combat_level() {
            writer.write_varint_u32(props.combat_level as u32);
        }
        if flags.writes_item_level() {
            writer.write_varint_u32(props.item_level as u32);
        }
        if flags.writes_item_variation() {
            writer.write_f32(props.item_variation);
        }
        if flags.writes_ref_count() {
            writer.write_varint_u32(self.power_ref_count);
        }
        Ok(())
    }

    /// Reads one record following `previous` (`None` for the first record of
    /// a sequence).
    ///
    /// # Errors
    ///
    /// The first field failure, or [`CodecError::InconsistentSequencing`] if a
    /// first record inherits a level. Every field is attempted either way.
    pub fn decode(
        reader: &mut WireReader<'_>,
        previous: Option<&Self>,
        prototypes: &dyn PrototypeLookup,
    ) -> CodecResult<Self> {
        let mut status = TransferStatus::new();
        let record = Self::decode_with_status(reader, previous, prototypes, &mut status);
        status.finish().map(|()| record)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn decode_with_status(
        reader: &mut WireReader<'_>,
        previous: Option<&Self>,
        prototypes: &dyn PrototypeLookup,
        status: &mut TransferStatus,
    ) -> Self {
        let power_prototype_id =
            status.take(read_prototype_ref(reader, prototypes, PrototypeClass::Power));
        let flags = PowerSlotFlags::from_bits_retain(status.take(reader.read_varint_u32()));
        let previous = previous.map(|record| &record.index_props);

        let mut read_i32 = |status: &mut TransferStatus| status.take(reader.read_varint_u32()) as i32;

        let power_rank = if flags.writes_power_rank() { read_i32(status) } else { 0 };

        let character_level = match level_source(flags, &CHARACTER_LEVEL_RULES) {
            LevelSource::One => 1,
            LevelSource::PreviousRecord => {
                inherited(previous.map(|p| p.character_level), "character level", status)
            }
            LevelSource::SameAsCharacterLevel | LevelSource::Wire => read_i32(status),
        };

        let combat_level = match level_source(flags, &COMBAT_LEVEL_RULES) {
            LevelSource::One => 1,
            LevelSource::PreviousRecord => {
                inherited(previous.map(|p| p.combat_level), "combat level", status)
            }
            LevelSource::SameAsCharacterLevel => character_level,
            LevelSource::Wire => read_i32(status),
        };

        let item_level = if flags.writes_item_level() { read_i32(status) } else { 1 };
        let item_variation = if flags.writes_item_variation() {
            status.take(reader.read_f32())
        } else {
            1.0
        };
        let power_ref_count = if flags.writes_ref_count() {
            status.take(reader.read_varint_u32())
        } else {
            1
        };

        Self {
            power_prototype_id,
            flags,
            index_props: PowerIndexProperties {
                power_rank,
                character_level,
                combat_level,
                item_level,
                item_variation,
            },
            power_ref_count,
        }
    }

    /// Multi-line dump with the power's display name.
    #[must_use]
    pub fn dump(&self, prototypes: &dyn PrototypeLookup) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "PowerPrototypeId: {}",
            display_name(prototypes, self.power_prototype_id)
        );
        let _ = writeln!(out, "Flags: {:?}", self.flags);
        let _ = writeln!(out, "IndexProps: {}", self.index_props);
        let _ = writeln!(out, "PowerRefCount: {}", self.power_ref_count);
        out
    }
}

fn inherited(value: Option<i32>, field: &'static str, status: &mut TransferStatus) -> i32 {
    value.unwrap_or_else(|| {
        tracing::warn!("Power slot {} inherits from a missing previous record", field);
        status.record(CodecError::InconsistentSequencing { field });
        0
    })
}

/// Writes a power collection: record count, then each record in order.
///
/// # Errors
///
/// [`CodecError::InconsistentSequencing`] if the first record inherits, or
/// the first record encode failure. The writer is rolled back to where it
/// started on error.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_power_slots(
    writer: &mut WireWriter,
    records: &[PowerSlotRecord],
    prototypes: &dyn PrototypeLookup,
) -> CodecResult<()> {
    if let Some(first) = records.first() {
        if first.flags.contains(PowerSlotFlags::CHARACTER_LEVEL_IS_FROM_PREVIOUS_RECORD) {
            return Err(CodecError::InconsistentSequencing { field: "character level" });
        }
        if first.flags.contains(PowerSlotFlags::COMBAT_LEVEL_IS_FROM_PREVIOUS_RECORD) {
            return Err(CodecError::InconsistentSequencing { field: "combat level" });
        }
    }

    let start = writer.len();
    writer.write_varint_u32(records.len() as u32);
    for record in records {
        if let Err(error) = record.encode(writer, prototypes) {
            writer.truncate(start);
            return Err(error);
        }
    }
    Ok(())
}

/// Reads a power collection written by [`encode_power_slots`].
///
/// # Errors
///
/// [`CodecError::MalformedCount`] for a count the buffer cannot hold,
/// otherwise the first failure across all records. Every declared record is
/// still read.
pub fn decode_power_slots(
    reader: &mut WireReader<'_>,
    prototypes: &dyn PrototypeLookup,
) -> CodecResult<Vec<PowerSlotRecord>> {
    let declared = reader.read_varint_u32()?;
    let count = reader.check_count("power slots", u64::from(declared), MIN_RECORD_BYTES)?;

    let mut status = TransferStatus::new();
    let mut records: Vec<PowerSlotRecord> = Vec::with_capacity(count);
    for _ in 0..count {
        let record =
            PowerSlotRecord::decode_with_status(reader, records.last(), prototypes, &mut status);
        records.push(record);
    }

    tracing::trace!(
        "Decoded {} power slots, {} failed transfers",
        records.len(),
        status.failures()
    );
    status.finish().map(|()| records)
}
