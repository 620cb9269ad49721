//! Blob-tileset autotiling engine
//!
//! This crate decides, for every cell of a layered grid, which tile of a
//! 47-shape blob tileset it should show given which of its eight neighbors
//! are solid.
//!
//! # Features
//! - 8-neighbor bitmasks with corner reduction to the 47 blob shapes
//! - Canonical bitmask table plus custom tileset layouts
//! - Seeded random center and floor variants
//! - Full, region and single-cell (brush) passes over any [`TileGrid`]
//! - TOML settings
//!
//! # Example
//!
//! ```rust,ignore
//! use blobmap_autotile::{AutotileSettings, GridRebuilder};
//! use blobmap_core::{Layer, Level};
//!
//! let mut level = Level::new("Cave".to_string(), 16, 16);
//! let walls = level.add_layer(Layer::filled("Walls".to_string(), 16, 16, 20));
//!
//! let settings = AutotileSettings::default()
//!     .with_layers([walls])
//!     .with_seed(7);
//! let mut rebuilder = GridRebuilder::new(settings);
//!
//! // Resolve every wall, then carve a hole and fix up its neighbors
//! let report = rebuilder.rebuild(&mut level)?;
//! rebuilder.erase(&mut level, walls, 8, 8)?;
//! ```
//!
//! [`TileGrid`]: blobmap_core::TileGrid

pub mod bitmask;
pub mod classify;
pub mod config;
pub mod error;
pub mod neighbors;
pub mod rebuild;
pub mod resolve;
pub mod table;
pub mod variant;

// Re-export main types at crate root
pub use bitmask::{BitmaskComputer, NeighborSampler};
pub use classify::{TileClassifier, TileTables};
pub use config::{AutotileSettings, UnknownTilePolicy};
pub use error::{RebuildError, SettingsError, TableError};
pub use neighbors::{canonical_mask, raw_bitmask, YAxis};
pub use rebuild::{CellPos, GridRebuilder, RebuildReport, RebuildState, Region};
pub use resolve::{resolve_tile, Resolution, ResolveRule};
pub use table::{
    BitmaskTable, ShapeTile, TilesetLayout, CENTER_TILE, LOOKUP_MISS_TILE, SINGLE_BLOCK_TILE,
};
pub use variant::{seeded_rng, VariantSelector, VariantSet};

// Re-export blobmap_core
pub use blobmap_core;
