//! Autotile settings
//!
//! Settings are fixed for the duration of one rebuild pass. They persist as
//! TOML so an editor can keep them next to its project files.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::neighbors::YAxis;
use crate::table::{BitmaskTable, TilesetLayout};

/// What happens to a tile that is neither a wall, a floor nor a center variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTilePolicy {
    /// Erase the tile
    #[default]
    Clear,
    /// Leave the tile as it is
    Preserve,
}

/// Configuration for autotiling a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutotileSettings {
    /// Cells outside the grid count as solid neighbors
    pub treat_border_as_solid: bool,
    /// Special tiles count as solid neighbors, and get their own mask computed
    pub treat_special_as_solid: bool,
    /// Cosmetic center variants are left in place instead of being re-rolled
    pub treat_center_variants_as_special: bool,
    /// Floor variants are left in place instead of being re-rolled
    pub treat_floor_variants_as_special: bool,
    /// Seed for variant picks. Written to TOML as its `i64` bit pattern.
    #[serde(with = "seed_bits")]
    pub random_seed: u64,
    /// Layer indices a full rebuild visits, in ascending order
    pub enabled_layers: BTreeSet<usize>,
    pub unknown_tiles: UnknownTilePolicy,
    pub y_axis: YAxis,
    /// Replaces the canonical tileset when set
    pub tileset: Option<TilesetLayout>,
}

impl Default for AutotileSettings {
    fn default() -> Self {
        Self {
            treat_border_as_solid: false,
            treat_special_as_solid: false,
            treat_center_variants_as_special: false,
            treat_floor_variants_as_special: false,
            random_seed: 0,
            enabled_layers: BTreeSet::from([0]),
            unknown_tiles: UnknownTilePolicy::default(),
            y_axis: YAxis::default(),
            tileset: None,
        }
    }
}

impl AutotileSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the enabled layer set
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = usize>) -> Self {
        self.enabled_layers = layers.into_iter().collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Build the lookup table these settings select
    pub fn build_table(&self) -> Result<BitmaskTable, crate::TableError> {
        match &self.tileset {
            Some(layout) => BitmaskTable::from_layout(layout),
            None => Ok(BitmaskTable::canonical()),
        }
    }

    /// Parse settings from TOML, rejecting an invalid custom tileset
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.build_table()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

/// TOML integers are signed 64-bit; seeds above `i64::MAX` wrap to negatives
mod seed_bits {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seed: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(*seed as i64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        i64::deserialize(deserializer).map(|bits| bits as u64)
    }
}
