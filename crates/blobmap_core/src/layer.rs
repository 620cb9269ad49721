//! Tile layer storage

use serde::{Deserialize, Serialize};

use crate::TileId;

/// A single tile layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    /// Row-major tile data - None means empty, Some(id) is a tile identity
    pub tiles: Vec<Option<TileId>>,
}

impl Layer {
    /// Create an empty tile layer
    pub fn new(name: String, width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            name,
            visible: true,
            tiles: vec![None; size],
        }
    }

    /// Create a layer filled with one tile
    pub fn filled(name: String, width: u32, height: u32, tile: TileId) -> Self {
        let mut layer = Self::new(name, width, height);
        layer.tiles.fill(Some(tile));
        layer
    }

    /// Count of non-empty cells
    pub fn occupied(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }
}
