//! Neighbor sampling and per-cell bitmask computation

use blobmap_core::{TileGrid, TileId};

use crate::classify::TileClassifier;
use crate::neighbors::raw_bitmask;

/// Reads whether a neighboring cell counts as solid.
#[derive(Clone, Copy)]
pub struct NeighborSampler<'a> {
    classifier: TileClassifier<'a>,
}

impl<'a> NeighborSampler<'a> {
    pub fn new(classifier: TileClassifier<'a>) -> Self {
        Self { classifier }
    }

    /// Solidity of the cell at `(x, y)` on `layer`, which may lie outside the grid.
    ///
    /// Special tiles follow `treat_special_as_solid` before the floor rule
    /// applies, so a floor is solid only when it is special and specials are solid.
    pub fn is_solid<G: TileGrid + ?Sized>(&self, grid: &G, x: i64, y: i64, layer: usize) -> bool {
        let settings = self.classifier.settings();

        if !grid.in_bounds(x, y) {
            return settings.treat_border_as_solid;
        }
        match grid.get_tile(x as u32, y as u32, layer) {
            None => false,
            Some(tile) if self.classifier.is_special(tile) => settings.treat_special_as_solid,
            Some(tile) => !self.classifier.is_floor(tile),
        }
    }

    /// [`is_solid`](Self::is_solid) as a 0/1 weight
    pub fn solidity_of<G: TileGrid + ?Sized>(&self, grid: &G, x: i64, y: i64, layer: usize) -> u8 {
        u8::from(self.is_solid(grid, x, y, layer))
    }
}

/// Computes the neighbor mask that selects a cell's wall shape
#[derive(Clone, Copy)]
pub struct BitmaskComputer<'a> {
    sampler: NeighborSampler<'a>,
    classifier: TileClassifier<'a>,
}

impl<'a> BitmaskComputer<'a> {
    pub fn new(classifier: TileClassifier<'a>) -> Self {
        Self {
            sampler: NeighborSampler::new(classifier),
            classifier,
        }
    }

    pub fn sampler(&self) -> &NeighborSampler<'a> {
        &self.sampler
    }

    /// Mask of the cell at `(x, y)` holding `tile`.
    ///
    /// Empty cells, floors, and special tiles that are not solid get 0 without
    /// any neighbor being read.
    pub fn compute<G: TileGrid + ?Sized>(
        &self,
        grid: &G,
        x: u32,
        y: u32,
        layer: usize,
        tile: Option<TileId>,
    ) -> u8 {
        let Some(tile) = tile else {
            return 0;
        };
        let settings = self.classifier.settings();

        if self.classifier.is_special(tile) {
            if !settings.treat_special_as_solid {
                return 0;
            }
        } else if self.classifier.is_floor(tile) {
            return 0;
        }

        raw_bitmask(x as i64, y as i64, settings.y_axis, |nx, ny| {
            self.sampler.is_solid(grid, nx, ny, layer)
        })
    }

    /// Mask of the cell at `(x, y)`, reading its tile from the grid
    pub fn compute_at<G: TileGrid + ?Sized>(&self, grid: &G, x: u32, y: u32, layer: usize) -> u8 {
        self.compute(grid, x, y, layer, grid.get_tile(x, y, layer))
    }
}
