//! Opaque handles carried by replicated records.
//!
//! Neither handle is interpreted by the codec. An entity id is whatever the
//! entity manager hands out; a prototype id is a key into the game database.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime entity handle. `0` means "no entity".
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The "no entity" handle.
    pub const INVALID: Self = Self(0);

    /// Returns the raw handle value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true unless this is [`EntityId::INVALID`].
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game database prototype handle. `0` means "no prototype".
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrototypeId(pub u64);

impl PrototypeId {
    /// The "no prototype" handle.
    pub const INVALID: Self = Self(0);

    /// Returns the raw handle value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true unless this is [`PrototypeId::INVALID`].
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for PrototypeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}
