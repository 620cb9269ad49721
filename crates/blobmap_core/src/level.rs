//! In-memory layered tile grid

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridError, Layer, TileGrid, TileId};

/// Errors that can occur when loading or saving a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("Failed to read or write level: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse level JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rectangular map made of same-sized tile layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
    /// Bumped by every `finalize`, so hosts can tell when to re-render
    #[serde(skip)]
    revision: u64,
}

impl Level {
    pub fn new(name: String, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
            layers: Vec::new(),
            revision: 0,
        }
    }

    /// Append a layer and return its index
    pub fn add_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Read a tile by layer first; out-of-range positions read as empty
    pub fn tile_at(&self, layer: usize, x: u32, y: u32) -> Option<TileId> {
        let idx = self.index(x, y)?;
        self.layers.get(layer)?.tiles.get(idx).copied().flatten()
    }

    /// Write a tile by layer first; out-of-range positions are ignored
    pub fn set_tile_at(&mut self, layer: usize, x: u32, y: u32, tile: Option<TileId>) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if let Some(cell) = self
            .layers
            .get_mut(layer)
            .and_then(|l| l.tiles.get_mut(idx))
        {
            *cell = tile;
        }
    }

    /// Number of completed finalize calls since creation or load
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Parse a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), LevelError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl TileGrid for Level {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn get_tile(&self, x: u32, y: u32, layer: usize) -> Option<TileId> {
        debug_assert!(
            x < self.width && y < self.height && layer < self.layers.len(),
            "read outside grid: ({x}, {y}) on layer {layer}"
        );
        self.tile_at(layer, x, y)
    }

    fn set_tile(&mut self, x: u32, y: u32, layer: usize, tile: Option<TileId>) {
        debug_assert!(
            x < self.width && y < self.height && layer < self.layers.len(),
            "write outside grid: ({x}, {y}) on layer {layer}"
        );
        self.set_tile_at(layer, x, y, tile);
    }

    fn finalize(&mut self) {
        self.revision += 1;
    }

    fn validate(&self) -> Result<(), GridError> {
        let expected = self.width as usize * self.height as usize;
        for (layer, data) in self.layers.iter().enumerate() {
            if data.tiles.len() != expected {
                return Err(GridError::LayerSizeMismatch {
                    layer,
                    expected,
                    actual: data.tiles.len(),
                });
            }
        }
        Ok(())
    }
}
