//! # World Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) yields the stock Lapland world:
//!
//! ```toml
//! seed = 12345
//! render_distance = 4
//!
//! [terrain]
//! base_height = 20
//! height_scale = 15.0
//! tree_density = 0.15
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::CHUNK_HEIGHT;
use crate::error::{WorldError, WorldResult};
use crate::noise::WorldSeed;
use crate::terrain::TerrainParams;

/// Largest accepted render distance, in chunks.
pub const MAX_RENDER_DISTANCE: u32 = 32;

/// Startup configuration for a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: u64,
    /// Chebyshev radius of the loaded square, in chunks.
    pub render_distance: u32,
    /// Terrain shaping.
    pub terrain: TerrainParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::DEFAULT,
            render_distance: 4,
            terrain: TerrainParams::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Parse`] for malformed TOML and
    /// [`WorldError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Seed as a [`WorldSeed`].
    #[inline]
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        WorldSeed::new(self.seed)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.render_distance > MAX_RENDER_DISTANCE {
            return Err(invalid(format!(
                "render_distance {} exceeds {MAX_RENDER_DISTANCE}",
                self.render_distance
            )));
        }

        let terrain = &self.terrain;
        if !(1..=CHUNK_HEIGHT - 10).contains(&terrain.base_height) {
            return Err(invalid(format!(
                "terrain.base_height {} outside [1, {}]",
                terrain.base_height,
                CHUNK_HEIGHT - 10
            )));
        }
        if !(terrain.height_scale >= 0.0 && terrain.height_scale.is_finite()) {
            return Err(invalid(format!("terrain.height_scale {} must be >= 0", terrain.height_scale)));
        }
        for (name, value) in [
            ("terrain.terrain_frequency", terrain.terrain_frequency),
            ("terrain.detail_frequency", terrain.detail_frequency),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(format!("{name} {value} must be > 0")));
            }
        }
        if !(0.0..=1.0).contains(&terrain.tree_density) {
            return Err(invalid(format!("terrain.tree_density {} outside [0, 1]", terrain.tree_density)));
        }
        for (name, value) in [
            ("terrain.lake_threshold", terrain.lake_threshold),
            ("terrain.rock_threshold", terrain.rock_threshold),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> WorldError {
    WorldError::InvalidConfig(message)
}
