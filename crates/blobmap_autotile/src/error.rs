//! Error types for table construction, settings I/O and rebuild passes

use blobmap_core::{GridError, TileId};
use thiserror::Error;

/// Errors raised while building or validating a [`BitmaskTable`](crate::BitmaskTable)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Bitmask {0} is listed more than once")]
    DuplicateKey(u16),
    #[error("Bitmask {0} is outside the table range 0..=264")]
    KeyOutOfRange(u16),
    #[error("Bitmask {key} maps to the reserved lookup-miss tile")]
    ReservedTile { key: u16 },
    #[error("Bitmasks {first} and {second} share a shape but map to tiles {first_tile} and {second_tile}")]
    InconsistentClass {
        first: u16,
        second: u16,
        first_tile: TileId,
        second_tile: TileId,
    },
    #[error("Tile {tile} is used by two different shapes ({first} and {second})")]
    SharedTile { tile: TileId, first: u8, second: u8 },
    #[error("Variant tile {tile} at bitmask {key} collides with another table entry")]
    VariantCollision { key: u16, tile: TileId },
    #[error("Shape mask {0} has corners without both neighboring edges")]
    NonCanonicalShape(u8),
    #[error("{kind} variants: at most {max} allowed, got {actual}")]
    TooManyVariants {
        kind: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Errors that can occur when loading or saving [`AutotileSettings`](crate::AutotileSettings)
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid tileset: {0}")]
    Tileset(#[from] TableError),
}

/// Precondition failures that abort a rebuild before any cell is written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebuildError {
    #[error("Grid rejected the rebuild: {0}")]
    Grid(#[from] GridError),
    #[error("Tile tables could not be built: {0}")]
    Table(#[from] TableError),
    #[error("Layer {layer} does not exist (grid has {count} layers)")]
    LayerOutOfRange { layer: usize, count: usize },
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
