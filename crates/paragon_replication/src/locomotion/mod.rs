//! # Locomotion Replication
//!
//! Movement state of an entity, sent whenever it starts, changes or finishes
//! moving.
//!
//! ## Record Layout
//!
//! Every field is optional; the message flag word (sent by the caller, or
//! inline through [`LocomotionCodec::encode_update`]) selects which follow.
//!
//! ```text
//! ┌─────────────────────────┬───────────────────────────────┐
//! │ HAS_LOCOMOTION_FLAGS    │ locomotion flags    varint64  │
//! │ HAS_METHOD              │ method              varint32  │
//! │ HAS_MOVE_SPEED          │ base move speed     quantized │
//! │ HAS_HEIGHT              │ height              varint32  │
//! │ HAS_FOLLOW_ENTITY_ID    │ follow entity id    varint64  │
//! │ HAS_FOLLOW_ENTITY_RANGE │ range start, end    quantized │
//! │ UPDATE_PATH_NODES       │ goal index, nodes   see path  │
//! └─────────────────────────┴───────────────────────────────┘
//! ```
//!
//! ## Absolute vs Relative
//!
//! Without `RELATIVE_TO_PREVIOUS_STATE` an absent field decodes to its
//! default (method `GROUND`, speed 0, no path). With it, an absent field is
//! not written at all and the receiver's last known value stands.

mod path;

use std::fmt;

use paragon_shared::EntityId;

use crate::config::LocomotionConfig;
use crate::error::CodecResult;
use crate::flags::{LocomotionFlags, LocomotionMessageFlags};
use crate::transfer::{FieldSource, TransferStatus};
use crate::wire::{quantize, WireReader, WireWriter};

pub use path::{
    read_path, read_path_node, write_path, write_path_node, NaviSide, PathNode, MIN_NODE_BYTES,
};

/// Locomotor method id. Unknown ids are carried through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocomotorMethod(pub u32);

impl LocomotorMethod {
    /// Walks on the navigation mesh.
    pub const GROUND: Self = Self(0);
    /// Ballistic, briefly off the mesh.
    pub const AIRBORNE: Self = Self(1);
    /// Flies over low obstacles.
    pub const FLYING: Self = Self(2);
    /// Projectile on a fixed course.
    pub const MISSILE: Self = Self(3);
    /// Projectile homing on a target.
    pub const MISSILE_SEEKING: Self = Self(4);
    /// Flies over everything.
    pub const HIGH_FLYING: Self = Self(5);

    /// Raw wire id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Display name, if the id is a known method.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Ground"),
            1 => Some("Airborne"),
            2 => Some("Flying"),
            3 => Some("Missile"),
            4 => Some("MissileSeeking"),
            5 => Some("HighFlying"),
            _ => None,
        }
    }
}

impl fmt::Display for LocomotorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Method({})", self.0),
        }
    }
}

/// Movement state of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocomotionState {
    /// Movement sub-flags.
    pub locomotion_flags: LocomotionFlags,
    /// Locomotor method.
    pub method: LocomotorMethod,
    /// Base move speed in world units per second.
    pub base_move_speed: f32,
    /// Height above the navigation mesh.
    pub height: i32,
    /// Entity being followed, or [`EntityId::INVALID`].
    pub follow_entity_id: EntityId,
    /// Closest distance kept from the followed entity.
    pub follow_entity_range_start: f32,
    /// Farthest distance allowed from the followed entity.
    pub follow_entity_range_end: f32,
    /// Index of the node the entity is heading to.
    pub path_goal_node_index: i32,
    /// Path nodes, owned by this state.
    pub path_nodes: Vec<PathNode>,
}

impl LocomotionState {
    /// Creates an idle state moving at `base_move_speed` when it moves.
    #[must_use]
    pub fn with_move_speed(base_move_speed: f32) -> Self {
        Self {
            base_move_speed,
            ..Self::default()
        }
    }

    /// Copies every field of `other` into `self`.
    ///
    /// The path is copied element by element into this state's own buffer;
    /// the two states never share nodes.
    pub fn assign_from(&mut self, other: &Self) {
        self.locomotion_flags = other.locomotion_flags;
        self.method = other.method;
        self.base_move_speed = other.base_move_speed;
        self.height = other.height;
        self.follow_entity_id = other.follow_entity_id;
        self.follow_entity_range_start = other.follow_entity_range_start;
        self.follow_entity_range_end = other.follow_entity_range_end;
        self.path_goal_node_index = other.path_goal_node_index;
        self.path_nodes.clear();
        self.path_nodes.extend_from_slice(&other.path_nodes);
    }

    /// Computes the message flags needed to bring a receiver to this state.
    ///
    /// Without a `previous` state every non-default field is marked present.
    /// With one, the flags are relative and only fields that differ on the
    /// wire are marked. Path data is considered only if `with_path_nodes`.
    #[must_use]
    pub fn field_flags(
        &self,
        previous: Option<&Self>,
        with_path_nodes: bool,
        config: &LocomotionConfig,
    ) -> LocomotionMessageFlags {
        let baseline = previous.cloned().unwrap_or_default();
        let differs_f32 =
            |a: f32, b: f32, precision: u8| quantize(a, precision) != quantize(b, precision);

        let mut flags = LocomotionMessageFlags::empty();
        if previous.is_some() {
            flags |= LocomotionMessageFlags::RELATIVE_TO_PREVIOUS_STATE;
        }
        if self.locomotion_flags != baseline.locomotion_flags {
            flags |= LocomotionMessageFlags::HAS_LOCOMOTION_FLAGS;
        }
        if self.method != baseline.method {
            flags |= LocomotionMessageFlags::HAS_METHOD;
        }
        if differs_f32(self.base_move_speed, baseline.base_move_speed, config.move_speed_precision) {
            flags |= LocomotionMessageFlags::HAS_MOVE_SPEED;
        }
        if self.height != baseline.height {
            flags |= LocomotionMessageFlags::HAS_HEIGHT;
        }
        if self.follow_entity_id != baseline.follow_entity_id {
            flags |= LocomotionMessageFlags::HAS_FOLLOW_ENTITY_ID;
        }
        let precision = config.follow_range_precision;
        if differs_f32(self.follow_entity_range_start, baseline.follow_entity_range_start, precision)
            || differs_f32(self.follow_entity_range_end, baseline.follow_entity_range_end, precision)
        {
            flags |= LocomotionMessageFlags::HAS_FOLLOW_ENTITY_RANGE;
        }
        if with_path_nodes
            && (self.path_goal_node_index != baseline.path_goal_node_index
                || self.path_nodes != baseline.path_nodes)
        {
            flags |= LocomotionMessageFlags::UPDATE_PATH_NODES;
        }
        flags
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LocomotionFlags: {:?}", self.locomotion_flags)?;
        writeln!(f, "Method: {}", self.method)?;
        writeln!(f, "BaseMoveSpeed: {}", self.base_move_speed)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "FollowEntityId: {}", self.follow_entity_id)?;
        writeln!(f, "FollowEntityRangeStart: {}", self.follow_entity_range_start)?;
        writeln!(f, "FollowEntityRangeEnd: {}", self.follow_entity_range_end)?;
        writeln!(f, "PathGoalNodeIndex: {}", self.path_goal_node_index)?;
        for (i, node) in self.path_nodes.iter().enumerate() {
            writeln!(f, "PathNodes[{i}]: {node}")?;
        }
        Ok(())
    }
}

/// Locomotion record codec.
///
/// Holds only precision settings; one codec can serve any number of
/// concurrent calls, each with its own cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocomotionCodec {
    config: LocomotionConfig,
}

impl LocomotionCodec {
    /// Creates a codec with the given settings.
    ///
    /// # Errors
    ///
    /// [`crate::CodecError::InvalidConfig`] if a precision exceeds what the
    /// quantizer supports.
    pub fn new(config: LocomotionConfig) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The codec's settings.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Writes the fields of `state` selected by `flags`.
    #[allow(clippy::cast_sign_loss)]
    pub fn encode(&self, writer: &mut WireWriter, state: &LocomotionState, flags: LocomotionMessageFlags) {
        let config = &self.config;

        if flags.has_locomotion_flags() {
            writer.write_varint_u64(state.locomotion_flags.bits());
        }
        if flags.has_method() {
            writer.write_varint_u32(state.method.id());
        }
        if flags.has_move_speed() {
            writer.write_quantized_f32(state.base_move_speed, config.move_speed_precision);
        }
        if flags.has_height() {
            writer.write_varint_u32(state.height as u32);
        }
        if flags.has_follow_entity_id() {
            writer.write_varint_u64(state.follow_entity_id.get());
        }
        if flags.has_follow_entity_range() {
            writer.write_quantized_f32(state.follow_entity_range_start, config.follow_range_precision);
            writer.write_quantized_f32(state.follow_entity_range_end, config.follow_range_precision);
        }
        if flags.updates_path_nodes() {
            write_path(
                writer,
                state.path_goal_node_index,
                &state.path_nodes,
                config.path_vertex_precision,
            );
        }
    }

    /// Reads the fields selected by `flags` into `state`.
    ///
    /// In absolute mode every field of `state` is overwritten, with defaults
    /// for absent ones. In relative mode absent fields are left as they are.
    ///
    /// # Errors
    ///
    /// The first field failure. Every selected field is still attempted, and
    /// `state` may hold partial results: callers must not apply it.
    pub fn decode(
        &self,
        reader: &mut WireReader<'_>,
        state: &mut LocomotionState,
        flags: LocomotionMessageFlags,
    ) -> CodecResult<()> {
        let mut status = TransferStatus::new();
        self.decode_fields(reader, state, flags, &mut status);
        let result = status.finish();
        if let Err(error) = &result {
            tracing::debug!("Locomotion decode failed: {}", error);
        }
        result
    }

    #[allow(clippy::cast_possible_wrap)]
    fn decode_fields(
        &self,
        reader: &mut WireReader<'_>,
        state: &mut LocomotionState,
        flags: LocomotionMessageFlags,
        status: &mut TransferStatus,
    ) {
        let config = &self.config;
        let relative = flags.is_relative();

        FieldSource::select(flags.has_locomotion_flags(), relative).apply(
            &mut state.locomotion_flags,
            LocomotionFlags::empty(),
            || LocomotionFlags::from_bits_retain(status.take(reader.read_varint_u64())),
        );
        FieldSource::select(flags.has_method(), relative).apply(
            &mut state.method,
            LocomotorMethod::GROUND,
            || LocomotorMethod(status.take(reader.read_varint_u32())),
        );
        FieldSource::select(flags.has_move_speed(), relative).apply(
            &mut state.base_move_speed,
            0.0,
            || status.take(reader.read_quantized_f32(config.move_speed_precision)),
        );
        FieldSource::select(flags.has_height(), relative).apply(&mut state.height, 0, || {
            status.take(reader.read_varint_u32()) as i32
        });
        FieldSource::select(flags.has_follow_entity_id(), relative).apply(
            &mut state.follow_entity_id,
            EntityId::INVALID,
            || EntityId(status.take(reader.read_varint_u64())),
        );

        match FieldSource::select(flags.has_follow_entity_range(), relative) {
            FieldSource::Wire => {
                let precision = config.follow_range_precision;
                state.follow_entity_range_start = status.take(reader.read_quantized_f32(precision));
                state.follow_entity_range_end = status.take(reader.read_quantized_f32(precision));
            }
            FieldSource::Default => {
                state.follow_entity_range_start = 0.0;
                state.follow_entity_range_end = 0.0;
            }
            FieldSource::Unchanged => {}
        }

        match FieldSource::select(flags.updates_path_nodes(), relative) {
            FieldSource::Wire => {
                state.path_goal_node_index = read_path(
                    reader,
                    config.path_vertex_precision,
                    config.max_path_nodes,
                    &mut state.path_nodes,
                    status,
                );
            }
            FieldSource::Default => {
                state.path_goal_node_index = 0;
                state.path_nodes.clear();
            }
            FieldSource::Unchanged => {}
        }
    }

    /// Writes a self-describing update: the flag word, then the state unless
    /// `NO_LOCOMOTION_STATE` is set.
    pub fn encode_update(
        &self,
        writer: &mut WireWriter,
        state: &LocomotionState,
        flags: LocomotionMessageFlags,
    ) {
        writer.write_varint_u32(flags.bits());
        if !flags.has_no_state() {
            self.encode(writer, state, flags);
        }
    }

    /// Reads a self-describing update into `state`, returning its flags.
    ///
    /// Unknown flag bits are kept in the returned value and otherwise ignored.
    ///
    /// # Errors
    ///
    /// As [`LocomotionCodec::decode`].
    pub fn decode_update(
        &self,
        reader: &mut WireReader<'_>,
        state: &mut LocomotionState,
    ) -> CodecResult<LocomotionMessageFlags> {
        let flags = LocomotionMessageFlags::from_bits_retain(reader.read_varint_u32()?);
        if !flags.has_no_state() {
            self.decode(reader, state, flags)?;
        }
        Ok(flags)
    }
}
