//! # Codec Configuration
//!
//! Precision and limit settings, loaded once at startup.
//!
//! The defaults are the values shipped clients decode with. Overriding a
//! precision only makes sense for tooling (replay capture, tests) that owns
//! both ends of the wire.
//!
//! ```toml
//! [locomotion]
//! move_speed_precision = 0
//! follow_range_precision = 0
//! path_vertex_precision = 3
//! max_path_nodes = 1024
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::wire::MAX_PRECISION_BITS;

/// Locomotion codec settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    /// Fractional bits of the base move speed.
    pub move_speed_precision: u8,
    /// Fractional bits of the follow range bounds.
    pub follow_range_precision: u8,
    /// Fractional bits of path vertex offsets.
    pub path_vertex_precision: u8,
    /// Largest node count a decoder accepts.
    pub max_path_nodes: u32,
}

impl LocomotionConfig {
    /// Wire-dictated settings.
    pub const WIRE: Self = Self {
        move_speed_precision: 0,
        follow_range_precision: 0,
        path_vertex_precision: 3,
        max_path_nodes: 1024,
    };

    /// Checks every precision fits the quantizer.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] naming the first bad setting.
    pub fn validate(&self) -> CodecResult<()> {
        for (name, precision) in [
            ("move_speed_precision", self.move_speed_precision),
            ("follow_range_precision", self.follow_range_precision),
            ("path_vertex_precision", self.path_vertex_precision),
        ] {
            if precision > MAX_PRECISION_BITS {
                return Err(CodecError::InvalidConfig(format!(
                    "locomotion.{name} = {precision} exceeds {MAX_PRECISION_BITS} bits"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self::WIRE
    }
}

/// Top-level codec configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Locomotion codec settings.
    pub locomotion: LocomotionConfig,
}

impl CodecConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] on syntax errors, unknown keys, or
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> CodecResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CodecError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CodecError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&text)?;
        if config != Self::default() {
            tracing::info!("Codec config {} overrides wire defaults", path.display());
        }
        Ok(config)
    }

    /// Checks every setting is usable.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidConfig`] naming the first bad setting.
    pub fn validate(&self) -> CodecResult<()> {
        self.locomotion.validate()
    }
}
