//! Neighbor directions and 8-bit neighbor masks
//!
//! Bits run clockwise from north. A set bit means the neighbor in that
//! direction counts as solid.

use serde::{Deserialize, Serialize};

/// Neighbor direction flags for bitmask calculation
pub mod neighbors {
    pub const N: u8 = 0b0000_0001;  // North
    pub const NE: u8 = 0b0000_0010; // Northeast (corner)
    pub const E: u8 = 0b0000_0100;  // East
    pub const SE: u8 = 0b0000_1000; // Southeast (corner)
    pub const S: u8 = 0b0001_0000;  // South
    pub const SW: u8 = 0b0010_0000; // Southwest (corner)
    pub const W: u8 = 0b0100_0000;  // West
    pub const NW: u8 = 0b1000_0000; // Northwest (corner)

    /// Every neighbor solid
    pub const ALL: u8 = 0xFF;
}

/// Which way "north" points in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    /// Row 0 is the top row; north is `y - 1`
    #[default]
    Down,
    /// Row 0 is the bottom row; north is `y + 1`
    Up,
}

/// Direction weights with their `(dx, dy)` offsets for [`YAxis::Down`], clockwise from north
const DIRECTIONS: [(u8, i64, i64); 8] = [
    (neighbors::N, 0, -1),
    (neighbors::NE, 1, -1),
    (neighbors::E, 1, 0),
    (neighbors::SE, 1, 1),
    (neighbors::S, 0, 1),
    (neighbors::SW, -1, 1),
    (neighbors::W, -1, 0),
    (neighbors::NW, -1, -1),
];

/// Iterate `(weight, dx, dy)` for all 8 neighbors under the given orientation
pub fn directions(y_axis: YAxis) -> impl Iterator<Item = (u8, i64, i64)> {
    DIRECTIONS.into_iter().map(move |(weight, dx, dy)| match y_axis {
        YAxis::Down => (weight, dx, dy),
        YAxis::Up => (weight, dx, -dy),
    })
}

/// Sum the weights of every solid neighbor of `(x, y)`.
///
/// No corner reduction is applied; see [`canonical_mask`].
pub fn raw_bitmask<F>(x: i64, y: i64, y_axis: YAxis, mut is_solid: F) -> u8
where
    F: FnMut(i64, i64) -> bool,
{
    let mut bitmask = 0u8;
    for (weight, dx, dy) in directions(y_axis) {
        if is_solid(x + dx, y + dy) {
            bitmask |= weight;
        }
    }
    bitmask
}

/// Reduce a mask to its blob shape class by clearing corners that do not
/// matter visually.
///
/// A corner only changes the drawn shape when both edges beside it are solid.
/// The 256 raw masks collapse into 47 classes.
pub fn canonical_mask(bitmask: u8) -> u8 {
    use neighbors::*;

    let mut result = bitmask;

    // NW corner requires N and W
    if (bitmask & (N | W)) != (N | W) {
        result &= !NW;
    }
    // NE corner requires N and E
    if (bitmask & (N | E)) != (N | E) {
        result &= !NE;
    }
    // SE corner requires S and E
    if (bitmask & (S | E)) != (S | E) {
        result &= !SE;
    }
    // SW corner requires S and W
    if (bitmask & (S | W)) != (S | W) {
        result &= !SW;
    }

    result
}
