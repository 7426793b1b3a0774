//! # Prototype References
//!
//! Records refer to game data (powers, missions) by prototype id. On the wire
//! a reference is not the 64-bit id itself but the id's *enum value* within
//! its prototype class: the 1-based position of the id among all ids of that
//! class in ascending order. `0` encodes "no prototype".
//!
//! The game database behind the [`PrototypeLookup`] trait is loaded once and
//! read-only afterwards, so lookups are plain `&self` calls and a single table
//! can serve every codec thread.
//!
//! ## Table File
//!
//! ```toml
//! [[prototype]]
//! id = 26407866
//! name = "Powers/Angela/TravelPower.prototype"
//! class = "power"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use paragon_shared::PrototypeId;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::wire::{WireReader, WireWriter};

/// Class a prototype reference is scoped to. Enum values are per class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrototypeClass {
    /// Power prototypes (power slot records).
    Power,
    /// Mission prototypes (mission records).
    Mission,
    /// Entity prototypes.
    Entity,
}

impl fmt::Display for PrototypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Power => "power",
            Self::Mission => "mission",
            Self::Entity => "entity",
        };
        f.write_str(name)
    }
}

/// Read-only view of the game database used by record codecs.
pub trait PrototypeLookup {
    /// Display name of a prototype.
    fn name_of(&self, id: PrototypeId) -> Option<&str>;

    /// Prototype id for a display name.
    fn id_of(&self, name: &str) -> Option<PrototypeId>;

    /// Wire enum value of `id` within `class`. Never 0 for a valid id.
    fn enum_value(&self, class: PrototypeClass, id: PrototypeId) -> Option<u64>;

    /// Prototype id for a wire enum value within `class`.
    fn from_enum_value(&self, class: PrototypeClass, value: u64) -> Option<PrototypeId>;
}

/// Writes a prototype reference.
///
/// # Errors
///
/// [`CodecError::UnknownPrototypeId`] if the id is not in `class`. Nothing is
/// written in that case.
pub fn write_prototype_ref(
    writer: &mut WireWriter,
    prototypes: &dyn PrototypeLookup,
    class: PrototypeClass,
    id: PrototypeId,
) -> CodecResult<()> {
    if !id.is_valid() {
        writer.write_varint_u64(0);
        return Ok(());
    }
    let value = prototypes
        .enum_value(class, id)
        .ok_or(CodecError::UnknownPrototypeId { class, id: id.get() })?;
    writer.write_varint_u64(value);
    Ok(())
}

/// Reads a prototype reference.
///
/// # Errors
///
/// Any primitive read failure, or [`CodecError::UnknownPrototypeEnum`] if the
/// value names no prototype of `class`.
pub fn read_prototype_ref(
    reader: &mut WireReader<'_>,
    prototypes: &dyn PrototypeLookup,
    class: PrototypeClass,
) -> CodecResult<PrototypeId> {
    let value = reader.read_varint_u64()?;
    if value == 0 {
        return Ok(PrototypeId::INVALID);
    }
    prototypes
        .from_enum_value(class, value)
        .ok_or(CodecError::UnknownPrototypeEnum { class, value })
}

/// Display name for dumps, falling back to the raw id.
pub(crate) fn display_name(prototypes: &dyn PrototypeLookup, id: PrototypeId) -> String {
    prototypes
        .name_of(id)
        .map_or_else(|| id.to_string(), str::to_owned)
}

/// One prototype declaration in a table file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrototypeEntry {
    /// Prototype id.
    pub id: PrototypeId,
    /// Display name (usually the data file path).
    pub name: String,
    /// Class the prototype belongs to.
    pub class: PrototypeClass,
}

#[derive(Deserialize)]
struct PrototypeTableFile {
    #[serde(default)]
    prototype: Vec<PrototypeEntry>,
}

/// In-memory prototype database.
#[derive(Debug, Default, Clone)]
pub struct PrototypeTable {
    names: HashMap<PrototypeId, String>,
    ids_by_name: HashMap<String, PrototypeId>,
    /// Ascending ids per class. Enum value = index + 1.
    enums: HashMap<PrototypeClass, Vec<PrototypeId>>,
}

impl PrototypeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from entries.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] for the invalid id 0 or for an id or name
    /// declared twice.
    pub fn from_entries(entries: impl IntoIterator<Item = PrototypeEntry>) -> CodecResult<Self> {
        let mut table = Self::new();
        for entry in entries {
            if !entry.id.is_valid() {
                return Err(CodecError::InvalidConfig(format!(
                    "prototype '{}' uses the reserved id 0",
                    entry.name
                )));
            }
            if table.names.contains_key(&entry.id) {
                return Err(CodecError::InvalidConfig(format!(
                    "duplicate prototype id {}",
                    entry.id
                )));
            }
            if table.ids_by_name.contains_key(&entry.name) {
                return Err(CodecError::InvalidConfig(format!(
                    "duplicate prototype name '{}'",
                    entry.name
                )));
            }
            table.ids_by_name.insert(entry.name.clone(), entry.id);
            table.names.insert(entry.id, entry.name);
            table.enums.entry(entry.class).or_default().push(entry.id);
        }
        for ids in table.enums.values_mut() {
            ids.sort_unstable();
        }
        Ok(table)
    }

    /// Parses a table from TOML text.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] on syntax errors or invalid entries.
    pub fn from_toml_str(text: &str) -> CodecResult<Self> {
        let file: PrototypeTableFile =
            toml::from_str(text).map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        Self::from_entries(file.prototype)
    }

    /// Loads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CodecError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        let table = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded {} prototypes from {}", table.len(), path.display());
        Ok(table)
    }

    /// Number of prototypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if the table has no prototypes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PrototypeLookup for PrototypeTable {
    fn name_of(&self, id: PrototypeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    fn id_of(&self, name: &str) -> Option<PrototypeId> {
        self.ids_by_name.get(name).copied()
    }

    fn enum_value(&self, class: PrototypeClass, id: PrototypeId) -> Option<u64> {
        let ids = self.enums.get(&class)?;
        let index = ids.binary_search(&id).ok()?;
        u64::try_from(index + 1).ok()
    }

    fn from_enum_value(&self, class: PrototypeClass, value: u64) -> Option<PrototypeId> {
        let index = usize::try_from(value.checked_sub(1)?).ok()?;
        self.enums.get(&class)?.get(index).copied()
    }
}
