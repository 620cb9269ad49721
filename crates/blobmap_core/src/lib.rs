//! Core data structures for blobmap
//!
//! This crate provides the types shared between the autotile engine and the
//! grids it operates on:
//! - `TileGrid` - The adapter contract a host tilemap implements
//! - `TileId` - Integer tile identity stored in a cell
//! - `Level` - A reference in-memory grid made of tile layers
//! - `Layer` - A single row-major tile layer

mod grid;
mod layer;
mod level;

pub use grid::{GridError, TileGrid, TileId};
pub use layer::Layer;
pub use level::{Level, LevelError};
