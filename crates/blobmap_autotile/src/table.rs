//! Bitmask → tile lookup table
//!
//! Keys `0..=255` are neighbor masks. Keys `256..=264` never come out of
//! neighbor sampling; they are reserved slots naming the randomized center
//! and floor variants of a tileset.
//!
//! The canonical tileset lays its 47 blob shapes out as:
//!
//! | ids   | shapes                                |
//! |-------|---------------------------------------|
//! | 0-15  | three edges, with their inner corners |
//! | 16-19 | end caps (N, E, S, W)                 |
//! | 20    | single isolated block                 |
//! | 21-22 | straight runs (N-S, E-W)              |
//! | 23-30 | bends, with their inner corner        |
//! | 31-46 | all four edges; 46 is the full center |
//! | 47-49 | cosmetic center variants              |
//! | 50-55 | floor variants                        |

use std::collections::{BTreeMap, HashMap, HashSet};

use blobmap_core::TileId;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::neighbors::{canonical_mask, neighbors::*};

/// Key of the fully surrounded shape
pub const CENTER_KEY: u16 = 255;
/// Reserved keys naming cosmetic center variants
pub const CENTER_VARIANT_KEYS: [u16; 3] = [256, 257, 258];
/// Reserved keys naming floor variants
pub const FLOOR_VARIANT_KEYS: [u16; 6] = [259, 260, 261, 262, 263, 264];
/// Largest key a table may hold
pub const MAX_KEY: u16 = 264;

/// Tile written when a wall's bitmask has no table entry.
///
/// No table may map a key to this value, so it never collides with a real tile.
/// On a later pass it reads as an unknown tile: [`UnknownTilePolicy::Clear`]
/// erases it and [`UnknownTilePolicy::Preserve`] keeps it.
///
/// [`UnknownTilePolicy::Clear`]: crate::UnknownTilePolicy::Clear
/// [`UnknownTilePolicy::Preserve`]: crate::UnknownTilePolicy::Preserve
pub const LOOKUP_MISS_TILE: TileId = TileId::MAX;

/// Canonical tile for a block with no solid neighbors
pub const SINGLE_BLOCK_TILE: TileId = 20;
/// Canonical tile for a fully surrounded block
pub const CENTER_TILE: TileId = 46;

/// The 47 blob shapes of the canonical tileset, as corner-reduced masks
pub const BLOB_SHAPES: [(u8, TileId); 47] = [
    (N | E | S, 0),
    (N | NE | E | S, 1),
    (N | E | SE | S, 2),
    (N | NE | E | SE | S, 3),
    (N | E | W, 4),
    (N | NE | E | W, 5),
    (N | S | W, 6),
    (E | S | W, 7),
    (E | SE | S | W, 8),
    (N | S | SW | W, 9),
    (E | S | SW | W, 10),
    (E | SE | S | SW | W, 11),
    (N | E | W | NW, 12),
    (N | NE | E | W | NW, 13),
    (N | S | W | NW, 14),
    (N | S | SW | W | NW, 15),
    (N, 16),
    (E, 17),
    (S, 18),
    (W, 19),
    (0, 20),
    (N | S, 21),
    (E | W, 22),
    (N | E, 23),
    (N | NE | E, 24),
    (E | S, 25),
    (E | SE | S, 26),
    (N | W, 27),
    (S | W, 28),
    (S | SW | W, 29),
    (N | W | NW, 30),
    (N | E | S | W, 31),
    (N | NE | E | S | W, 32),
    (N | E | SE | S | W, 33),
    (N | NE | E | SE | S | W, 34),
    (N | E | S | SW | W, 35),
    (N | NE | E | S | SW | W, 36),
    (N | E | SE | S | SW | W, 37),
    (N | NE | E | SE | S | SW | W, 38),
    (N | E | S | W | NW, 39),
    (N | NE | E | S | W | NW, 40),
    (N | E | SE | S | W | NW, 41),
    (N | NE | E | SE | S | W | NW, 42),
    (N | E | S | SW | W | NW, 43),
    (N | NE | E | S | SW | W | NW, 44),
    (N | E | SE | S | SW | W | NW, 45),
    (ALL, 46),
];

/// Cosmetic center variants of the canonical tileset
pub const CENTER_VARIANT_TILES: [TileId; 3] = [47, 48, 49];
/// Floor variants of the canonical tileset
pub const FLOOR_VARIANT_TILES: [TileId; 6] = [50, 51, 52, 53, 54, 55];

/// One blob shape of a tileset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeTile {
    /// Corner-reduced neighbor mask
    pub mask: u8,
    pub tile: TileId,
}

/// Describes a blob tileset by its shapes and variant tiles.
///
/// Hosts whose atlas differs from the canonical one describe it here and
/// build a table with [`BitmaskTable::from_layout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetLayout {
    pub shapes: Vec<ShapeTile>,
    /// Up to three cosmetic center variants
    #[serde(default)]
    pub center_variants: Vec<TileId>,
    /// Up to six floor variants
    #[serde(default)]
    pub floor_variants: Vec<TileId>,
}

impl Default for TilesetLayout {
    fn default() -> Self {
        Self {
            shapes: BLOB_SHAPES
                .iter()
                .map(|&(mask, tile)| ShapeTile { mask, tile })
                .collect(),
            center_variants: CENTER_VARIANT_TILES.to_vec(),
            floor_variants: FLOOR_VARIANT_TILES.to_vec(),
        }
    }
}

/// Immutable mapping from bitmask to tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmaskTable {
    entries: BTreeMap<u16, TileId>,
    tiles: HashSet<TileId>,
}

impl BitmaskTable {
    /// The canonical 47-shape table covering all 256 neighbor masks
    pub fn canonical() -> Self {
        let shapes: BTreeMap<u8, TileId> = BLOB_SHAPES.iter().copied().collect();
        Self::from_map(expand(&shapes, &CENTER_VARIANT_TILES, &FLOOR_VARIANT_TILES))
    }

    /// Build a table from explicit `(bitmask, tile)` pairs.
    ///
    /// Masks missing from `entries` stay unmapped and produce lookup misses.
    pub fn from_entries<I>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (u16, TileId)>,
    {
        let mut map = BTreeMap::new();
        for (key, tile) in entries {
            if key > MAX_KEY {
                return Err(TableError::KeyOutOfRange(key));
            }
            if map.insert(key, tile).is_some() {
                return Err(TableError::DuplicateKey(key));
            }
        }

        let table = Self::from_map(map);
        table.validate()?;
        Ok(table)
    }

    /// Build a table from a shape layout, mapping every raw mask whose shape
    /// class is listed.
    pub fn from_layout(layout: &TilesetLayout) -> Result<Self, TableError> {
        check_variant_count("Center", layout.center_variants.len(), CENTER_VARIANT_KEYS.len())?;
        check_variant_count("Floor", layout.floor_variants.len(), FLOOR_VARIANT_KEYS.len())?;

        let mut shapes = BTreeMap::new();
        for shape in &layout.shapes {
            if canonical_mask(shape.mask) != shape.mask {
                return Err(TableError::NonCanonicalShape(shape.mask));
            }
            if shapes.insert(shape.mask, shape.tile).is_some() {
                return Err(TableError::DuplicateKey(shape.mask as u16));
            }
        }

        let table = Self::from_map(expand(
            &shapes,
            &layout.center_variants,
            &layout.floor_variants,
        ));
        table.validate()?;
        Ok(table)
    }

    fn from_map(entries: BTreeMap<u16, TileId>) -> Self {
        let tiles = entries.values().copied().collect();
        Self { entries, tiles }
    }

    /// Check the table's structural invariants.
    ///
    /// Masks of the same shape class must share one tile, different classes
    /// must use different tiles, and variant tiles must not reuse any other
    /// entry's tile.
    pub fn validate(&self) -> Result<(), TableError> {
        let mut class_tiles: HashMap<u8, (u16, TileId)> = HashMap::new();
        let mut tile_classes: HashMap<TileId, u8> = HashMap::new();

        for (&key, &tile) in &self.entries {
            if tile == LOOKUP_MISS_TILE {
                return Err(TableError::ReservedTile { key });
            }
            if key > CENTER_KEY {
                continue;
            }

            let class = canonical_mask(key as u8);
            match class_tiles.get(&class) {
                Some(&(first, first_tile)) if first_tile != tile => {
                    return Err(TableError::InconsistentClass {
                        first,
                        second: key,
                        first_tile,
                        second_tile: tile,
                    });
                }
                Some(_) => {}
                None => {
                    if let Some(&other) = tile_classes.get(&tile) {
                        return Err(TableError::SharedTile {
                            tile,
                            first: other,
                            second: class,
                        });
                    }
                    class_tiles.insert(class, (key, tile));
                    tile_classes.insert(tile, class);
                }
            }
        }

        let mut variants = HashSet::new();
        for (&key, &tile) in self.entries.range(CENTER_KEY + 1..) {
            if tile_classes.contains_key(&tile) || !variants.insert(tile) {
                return Err(TableError::VariantCollision { key, tile });
            }
        }

        Ok(())
    }

    /// Tile for a bitmask, if the table maps it
    pub fn lookup(&self, key: u16) -> Option<TileId> {
        self.entries.get(&key).copied()
    }

    /// Whether `tile` appears as a value anywhere in the table
    pub fn contains_tile(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    /// The fully surrounded tile (value for bitmask 255)
    pub fn center_tile(&self) -> Option<TileId> {
        self.lookup(CENTER_KEY)
    }

    /// Cosmetic center variants, in key order
    pub fn center_variants(&self) -> impl Iterator<Item = TileId> + '_ {
        CENTER_VARIANT_KEYS.iter().filter_map(|&key| self.lookup(key))
    }

    /// Floor variants, in key order
    pub fn floor_variants(&self) -> impl Iterator<Item = TileId> + '_ {
        FLOOR_VARIANT_KEYS.iter().filter_map(|&key| self.lookup(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All `(bitmask, tile)` entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (u16, TileId)> + '_ {
        self.entries.iter().map(|(&key, &tile)| (key, tile))
    }
}

impl Default for BitmaskTable {
    fn default() -> Self {
        Self::canonical()
    }
}

fn check_variant_count(kind: &'static str, actual: usize, max: usize) -> Result<(), TableError> {
    if actual > max {
        return Err(TableError::TooManyVariants { kind, max, actual });
    }
    Ok(())
}

/// Expand shape classes to every raw mask, then append variants at their reserved keys
fn expand(
    shapes: &BTreeMap<u8, TileId>,
    center_variants: &[TileId],
    floor_variants: &[TileId],
) -> BTreeMap<u16, TileId> {
    let walls = (0..=255u8).filter_map(|raw| {
        shapes
            .get(&canonical_mask(raw))
            .map(|&tile| (raw as u16, tile))
    });
    let centers = CENTER_VARIANT_KEYS
        .iter()
        .copied()
        .zip(center_variants.iter().copied());
    let floors = FLOOR_VARIANT_KEYS
        .iter()
        .copied()
        .zip(floor_variants.iter().copied());

    walls.chain(centers).chain(floors).collect()
}
