//! Semantic roles of tile identities

use blobmap_core::TileId;

use crate::config::AutotileSettings;
use crate::table::BitmaskTable;
use crate::variant::VariantSet;

/// A lookup table together with the variant sets derived from it.
///
/// Built once and shared read-only by every pass until invalidated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileTables {
    pub table: BitmaskTable,
    /// Canonical center followed by its cosmetic variants
    pub center_variants: VariantSet,
    pub floor_variants: VariantSet,
}

impl TileTables {
    pub fn new(table: BitmaskTable) -> Self {
        let center_variants =
            VariantSet::new(table.center_tile().into_iter().chain(table.center_variants()));
        let floor_variants = VariantSet::new(table.floor_variants());
        Self {
            table,
            center_variants,
            floor_variants,
        }
    }

    pub fn canonical() -> Self {
        Self::new(BitmaskTable::canonical())
    }

    /// The fully surrounded tile
    pub fn center_tile(&self) -> Option<TileId> {
        self.table.center_tile()
    }
}

/// Classifies tiles against a set of tables under one pass's settings
#[derive(Clone, Copy)]
pub struct TileClassifier<'a> {
    tables: &'a TileTables,
    settings: &'a AutotileSettings,
}

impl<'a> TileClassifier<'a> {
    pub fn new(tables: &'a TileTables, settings: &'a AutotileSettings) -> Self {
        Self { tables, settings }
    }

    pub fn tables(&self) -> &'a TileTables {
        self.tables
    }

    pub fn settings(&self) -> &'a AutotileSettings {
        self.settings
    }

    pub fn is_floor(&self, tile: TileId) -> bool {
        self.tables.floor_variants.contains(tile)
    }

    /// Member of the center set, canonical center included
    pub fn is_center_variant(&self, tile: TileId) -> bool {
        self.tables.center_variants.contains(tile)
    }

    /// Whether the lookup table produces this tile for some key
    pub fn is_table_tile(&self, tile: TileId) -> bool {
        self.tables.table.contains_tile(tile)
    }

    /// Whether the tile is exempt from reclassification.
    ///
    /// The canonical center is never special through the center-variant
    /// setting; only its cosmetic variants are.
    pub fn is_special(&self, tile: TileId) -> bool {
        let floor = self.is_floor(tile);
        let center = self.is_center_variant(tile);

        (floor && self.settings.treat_floor_variants_as_special)
            || (center
                && self.settings.treat_center_variants_as_special
                && Some(tile) != self.tables.center_tile())
            || (!floor && !center && !self.is_table_tile(tile))
    }
}
