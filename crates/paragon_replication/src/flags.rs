//! # Flag Words
//!
//! Every optional field a record can carry is gated by one bit of a flag
//! word. The bit layouts below are fixed by shipped clients; changing one
//! requires a protocol version bump.
//!
//! Bits a codec does not recognize are kept in the value (`from_bits_retain`)
//! and otherwise ignored, so a newer peer can add bits without breaking an
//! older reader.

use bitflags::bitflags;

bitflags! {
    /// Structural flags of a locomotion update: which fields are on the wire
    /// and how absent fields are interpreted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LocomotionMessageFlags: u32 {
        /// The enclosing message carries a full orientation instead of yaw only.
        const HAS_FULL_ORIENTATION = 1 << 0;
        /// No locomotion state follows at all.
        const NO_LOCOMOTION_STATE = 1 << 1;
        /// Absent fields keep the receiver's previous value instead of resetting.
        const RELATIVE_TO_PREVIOUS_STATE = 1 << 2;
        /// Movement sub-flags are present.
        const HAS_LOCOMOTION_FLAGS = 1 << 3;
        /// Locomotor method is present.
        const HAS_METHOD = 1 << 4;
        /// Goal index and path nodes are present.
        const UPDATE_PATH_NODES = 1 << 5;
        /// The entity reached the end of its path.
        const LOCOMOTION_FINISHED = 1 << 6;
        /// Base move speed is present.
        const HAS_MOVE_SPEED = 1 << 7;
        /// Height is present.
        const HAS_HEIGHT = 1 << 8;
        /// Follow entity id is present.
        const HAS_FOLLOW_ENTITY_ID = 1 << 9;
        /// Follow range start and end are present.
        const HAS_FOLLOW_ENTITY_RANGE = 1 << 10;
        /// The enclosing message carries the entity prototype.
        const HAS_ENTITY_PROTOTYPE_ID = 1 << 11;
    }
}

impl LocomotionMessageFlags {
    /// Absent fields mean "unchanged" rather than "default".
    #[inline]
    #[must_use]
    pub const fn is_relative(self) -> bool {
        self.contains(Self::RELATIVE_TO_PREVIOUS_STATE)
    }

    /// No state follows the flag word.
    #[inline]
    #[must_use]
    pub const fn has_no_state(self) -> bool {
        self.contains(Self::NO_LOCOMOTION_STATE)
    }

    /// Movement sub-flags are on the wire.
    #[inline]
    #[must_use]
    pub const fn has_locomotion_flags(self) -> bool {
        self.contains(Self::HAS_LOCOMOTION_FLAGS)
    }

    /// Method is on the wire.
    #[inline]
    #[must_use]
    pub const fn has_method(self) -> bool {
        self.contains(Self::HAS_METHOD)
    }

    /// Move speed is on the wire.
    #[inline]
    #[must_use]
    pub const fn has_move_speed(self) -> bool {
        self.contains(Self::HAS_MOVE_SPEED)
    }

    /// Height is on the wire.
    #[inline]
    #[must_use]
    pub const fn has_height(self) -> bool {
        self.contains(Self::HAS_HEIGHT)
    }

    /// Follow entity id is on the wire.
    #[inline]
    #[must_use]
    pub const fn has_follow_entity_id(self) -> bool {
        self.contains(Self::HAS_FOLLOW_ENTITY_ID)
    }

    /// Follow range is on the wire.
    #[inline]
    #[must_use]
    pub const fn has_follow_entity_range(self) -> bool {
        self.contains(Self::HAS_FOLLOW_ENTITY_RANGE)
    }

    /// Path data is on the wire.
    #[inline]
    #[must_use]
    pub const fn updates_path_nodes(self) -> bool {
        self.contains(Self::UPDATE_PATH_NODES)
    }
}

bitflags! {
    /// Movement sub-flags carried inside a locomotion state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LocomotionFlags: u64 {
        /// Entity is following a path.
        const IS_LOCOMOTING = 1 << 0;
        /// Walking rather than running.
        const IS_WALKING = 1 << 1;
        /// Turning in place toward a target.
        const IS_LOOKING = 1 << 2;
        /// Ignore the current speed rate modifier.
        const SKIP_CURRENT_SPEED_RATE = 1 << 3;
        /// Do not collide with other entities while moving.
        const LOCOMOTION_NO_ENTITY_COLLIDE = 1 << 4;
        /// Movement is driven by a power.
        const IS_MOVEMENT_POWER = 1 << 5;
        /// Do not orient along the path.
        const DISABLE_ORIENTATION = 1 << 6;
        /// Movement mode is driven by an external controller.
        const IS_DRIVING_MOVEMENT_MODE = 1 << 7;
        /// Move straight ahead.
        const MOVE_FORWARD = 1 << 8;
        /// Move to a fixed point.
        const MOVE_TO = 1 << 9;
        /// Client and server move in lockstep.
        const IS_SYNC_MOVING = 1 << 10;
        /// Pass through world geometry.
        const IGNORES_WORLD_COLLISION = 1 << 11;
    }
}

impl Default for LocomotionMessageFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for LocomotionFlags {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Value shortcuts of a power slot record. A set bit elides its field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PowerSlotFlags: u32 {
        /// Reference count is 1.
        const POWER_REF_COUNT_IS_ONE = 1 << 0;
        /// Power rank is 0.
        const POWER_RANK_IS_ZERO = 1 << 1;
        /// Character level is 1.
        const CHARACTER_LEVEL_IS_ONE = 1 << 2;
        /// Character level equals the previous record's.
        const CHARACTER_LEVEL_IS_FROM_PREVIOUS_RECORD = 1 << 3;
        /// Combat level is 1.
        const COMBAT_LEVEL_IS_ONE = 1 << 4;
        /// Combat level equals the previous record's.
        const COMBAT_LEVEL_IS_FROM_PREVIOUS_RECORD = 1 << 5;
        /// Combat level equals this record's character level.
        const COMBAT_LEVEL_IS_SAME_AS_CHARACTER_LEVEL = 1 << 6;
        /// Item level is 1.
        const ITEM_LEVEL_IS_ONE = 1 << 7;
        /// Item variation is 1.0.
        const ITEM_VARIATION_IS_ONE = 1 << 8;
    }
}

impl PowerSlotFlags {
    /// Every bit that elides the character level.
    pub const CHARACTER_LEVEL_ELIDED: Self =
        Self::CHARACTER_LEVEL_IS_ONE.union(Self::CHARACTER_LEVEL_IS_FROM_PREVIOUS_RECORD);

    /// Every bit that elides the combat level.
    pub const COMBAT_LEVEL_ELIDED: Self = Self::COMBAT_LEVEL_IS_ONE
        .union(Self::COMBAT_LEVEL_IS_FROM_PREVIOUS_RECORD)
        .union(Self::COMBAT_LEVEL_IS_SAME_AS_CHARACTER_LEVEL);

    /// Bits that read from the previous record.
    pub const INHERITS_FROM_PREVIOUS: Self = Self::CHARACTER_LEVEL_IS_FROM_PREVIOUS_RECORD
        .union(Self::COMBAT_LEVEL_IS_FROM_PREVIOUS_RECORD);

    /// Power rank is on the wire.
    #[inline]
    #[must_use]
    pub const fn writes_power_rank(self) -> bool {
        !self.contains(Self::POWER_RANK_IS_ZERO)
    }

    /// Character level is on the wire.
    #[inline]
    #[must_use]
    pub const fn writes_character_level(self) -> bool {
        !self.intersects(Self::CHARACTER_LEVEL_ELIDED)
    }

    /// Combat level is on the wire.
    #[inline]
    #[must_use]
    pub const fn writes_combat_level(self) -> bool {
        !self.intersects(Self::COMBAT_LEVEL_ELIDED)
    }

    /// Item level is on the wire.
    #[inline]
    #[must_use]
    pub const fn writes_item_level(self) -> bool {
        !self.contains(Self::ITEM_LEVEL_IS_ONE)
    }

    /// Item variation is on the wire.
    #[inline]
    #[must_use]
    pub const fn writes_item_variation(self) -> bool {
        !self.contains(Self::ITEM_VARIATION_IS_ONE)
    }

    /// Reference count is on the wire.
    #[inline]
    #[must_use]
    pub const fn writes_ref_count(self) -> bool {
        !self.contains(Self::POWER_REF_COUNT_IS_ONE)
    }

    /// True if any field reads from the previous record.
    #[inline]
    #[must_use]
    pub const fn inherits_from_previous(self) -> bool {
        self.intersects(Self::INHERITS_FROM_PREVIOUS)
    }
}

impl Default for PowerSlotFlags {
    fn default() -> Self {
        Self::empty()
    }
}
