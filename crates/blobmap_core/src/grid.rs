//! Adapter contract between the autotile engine and a host grid

use thiserror::Error;

/// Integer identity of a tile's visual content.
///
/// Cells hold `Option<TileId>`; `None` is the empty cell.
pub type TileId = u32;

/// Reasons a grid cannot take part in a rebuild pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Grid unavailable: {0}")]
    Unavailable(String),
    #[error("Layer {layer} holds {actual} cells, expected {expected}")]
    LayerSizeMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },
}

/// A layered 2D tile grid the autotiler reads from and writes to.
///
/// Coordinates passed to `get_tile` / `set_tile` are always inside
/// `dimensions()` and `layer < layer_count()`. Writes may be buffered by the
/// implementation; `finalize` is called once after the last write of a pass.
pub trait TileGrid {
    /// Width and height in cells, shared by all layers
    fn dimensions(&self) -> (u32, u32);

    /// Number of tile layers
    fn layer_count(&self) -> usize;

    /// Read a cell. `None` means the cell is empty.
    fn get_tile(&self, x: u32, y: u32, layer: usize) -> Option<TileId>;

    /// Write a cell. `None` clears it.
    fn set_tile(&mut self, x: u32, y: u32, layer: usize, tile: Option<TileId>);

    /// Rebuild any derived state (render meshes, colliders) after a pass
    fn finalize(&mut self) {}

    /// Check the grid is ready to be rebuilt. Called before any cell is touched.
    fn validate(&self) -> Result<(), GridError> {
        Ok(())
    }

    /// Whether a signed coordinate falls inside the grid
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        let (width, height) = self.dimensions();
        x >= 0 && y >= 0 && x < width as i64 && y < height as i64
    }
}
