//! Per-cell tile resolution policy
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. floor, floors not special → random floor variant
//! 2. floor, floors special → unchanged
//! 3. mask 255, center variants not special → random center variant
//! 4. center variant, center variants special → unchanged
//! 5. table tile → table lookup of the mask
//! 6. anything else → [`UnknownTilePolicy`]
//!
//! Empty cells stay empty.

use blobmap_core::TileId;
use rand::Rng;

use crate::classify::TileClassifier;
use crate::config::UnknownTilePolicy;
use crate::neighbors::neighbors;
use crate::table::LOOKUP_MISS_TILE;
use crate::variant::VariantSelector;

/// Which rule produced a cell's new tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveRule {
    Empty,
    FloorVariant,
    FloorKept,
    CenterVariant,
    CenterKept,
    Wall,
    /// The mask had no table entry; [`LOOKUP_MISS_TILE`] was produced
    LookupMiss,
    UnknownCleared,
    UnknownKept,
}

/// The tile a cell should hold after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub tile: Option<TileId>,
    pub rule: ResolveRule,
}

impl Resolution {
    fn new(tile: Option<TileId>, rule: ResolveRule) -> Self {
        Self { tile, rule }
    }
}

/// Resolve the new tile for a cell currently holding `current` with neighbor mask `bitmask`
pub fn resolve_tile<R: Rng + ?Sized>(
    current: Option<TileId>,
    bitmask: u8,
    classifier: &TileClassifier<'_>,
    selector: &mut VariantSelector<'_, R>,
) -> Resolution {
    let Some(tile) = current else {
        return Resolution::new(None, ResolveRule::Empty);
    };
    let settings = classifier.settings();
    let tables = classifier.tables();

    if classifier.is_floor(tile) {
        if settings.treat_floor_variants_as_special {
            return Resolution::new(Some(tile), ResolveRule::FloorKept);
        }
        if let Some(variant) = selector.pick(&tables.floor_variants) {
            return Resolution::new(Some(variant), ResolveRule::FloorVariant);
        }
    }

    if bitmask == neighbors::ALL && !settings.treat_center_variants_as_special {
        if let Some(variant) = selector.pick(&tables.center_variants) {
            return Resolution::new(Some(variant), ResolveRule::CenterVariant);
        }
    }

    if classifier.is_center_variant(tile) && settings.treat_center_variants_as_special {
        return Resolution::new(Some(tile), ResolveRule::CenterKept);
    }

    if classifier.is_table_tile(tile) {
        return match tables.table.lookup(u16::from(bitmask)) {
            Some(wall) => Resolution::new(Some(wall), ResolveRule::Wall),
            None => Resolution::new(Some(LOOKUP_MISS_TILE), ResolveRule::LookupMiss),
        };
    }

    match settings.unknown_tiles {
        UnknownTilePolicy::Clear => Resolution::new(None, ResolveRule::UnknownCleared),
        UnknownTilePolicy::Preserve => Resolution::new(Some(tile), ResolveRule::UnknownKept),
    }
}
