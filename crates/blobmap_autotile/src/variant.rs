//! Seeded random choice among interchangeable tiles

use blobmap_core::TileId;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// An ordered set of interchangeable tiles.
///
/// Order is significant: picks index into it, so the same seed yields the
/// same tiles only while the order is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    tiles: Vec<TileId>,
}

impl VariantSet {
    /// Collect tiles in iteration order, dropping repeats
    pub fn new(tiles: impl IntoIterator<Item = TileId>) -> Self {
        let mut set = Self::default();
        for tile in tiles {
            if !set.tiles.contains(&tile) {
                set.tiles.push(tile);
            }
        }
        set
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn as_slice(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether no tile is in both sets
    pub fn is_disjoint(&self, other: &VariantSet) -> bool {
        self.tiles.iter().all(|tile| !other.contains(*tile))
    }
}

/// Uniform picks from [`VariantSet`]s, driven by a caller-owned generator.
///
/// One selector lives for one rebuild pass; every pick advances the same
/// stream, so results depend on the order cells are visited.
pub struct VariantSelector<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
}

impl<'r, R: Rng + ?Sized> VariantSelector<'r, R> {
    pub fn new(rng: &'r mut R) -> Self {
        Self { rng }
    }

    /// Pick one tile uniformly, or `None` if the set is empty
    pub fn pick(&mut self, set: &VariantSet) -> Option<TileId> {
        if set.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..set.len());
        set.as_slice().get(index).copied()
    }
}

/// The generator a pass uses when the caller does not supply one
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
