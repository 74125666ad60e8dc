//! Chunk/tile coordinate conversions and the stacked-floor coordinate.
//!
//! The logical tile grid of a floor is divided into square chunks of
//! [`CHUNK_EDGE`] × [`CHUNK_EDGE`] tiles. Conversions use floor-division
//! semantics so that negative tile coordinates decompose correctly: tile
//! -1 lives in chunk -1 at local 15, not in chunk 0.

use std::fmt;

use crate::geom::Point;

/// Edge length of a chunk, in tiles. Must be a power of two.
pub const CHUNK_EDGE: i32 = 16;

/// Number of tiles in one chunk.
pub const CHUNK_AREA: usize = (CHUNK_EDGE * CHUNK_EDGE) as usize;

const CHUNK_SHIFT: i32 = CHUNK_EDGE.trailing_zeros() as i32;
const CHUNK_MASK: i32 = CHUNK_EDGE - 1;

/// A vertical floor index: 0 is ground level, positive floors are above,
/// negative floors are underground.
pub type FloorIndex = i32;

/// The chunk containing a tile. Arithmetic right shift implements
/// floor-division because [`CHUNK_EDGE`] is a power of two.
#[inline]
pub const fn tile_to_chunk(t: Point) -> Point {
    Point::new(t.x >> CHUNK_SHIFT, t.y >> CHUNK_SHIFT)
}

/// The tile's local address within its chunk, each component in
/// `[0, CHUNK_EDGE)` regardless of sign.
#[inline]
pub const fn tile_to_local(t: Point) -> Point {
    Point::new(t.x & CHUNK_MASK, t.y & CHUNK_MASK)
}

/// Recompose a tile address from a chunk address and a local address.
#[inline]
pub const fn chunk_local_to_tile(chunk: Point, local: Point) -> Point {
    Point::new(
        (chunk.x << CHUNK_SHIFT) | local.x,
        (chunk.y << CHUNK_SHIFT) | local.y,
    )
}

/// Flat index of a local address into a chunk's tile array, row-major.
#[inline]
pub const fn local_index(local: Point) -> usize {
    (local.y * CHUNK_EDGE + local.x) as usize
}

// ---------------------------------------------------------------------------
// LevelCoord
// ---------------------------------------------------------------------------

/// A tile address together with its floor: one cell of the stacked world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelCoord {
    pub pos: Point,
    pub z: FloorIndex,
}

impl LevelCoord {
    /// Create a new stacked-world coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32, z: FloorIndex) -> Self {
        Self {
            pos: Point::new(x, y),
            z,
        }
    }

    /// Build from a tile address and a floor index.
    #[inline]
    pub const fn from_parts(pos: Point, z: FloorIndex) -> Self {
        Self { pos, z }
    }
}

impl PartialOrd for LevelCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LevelCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z.cmp(&other.z).then(self.pos.cmp(&other.pos))
    }
}

impl fmt::Display for LevelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, z{})", self.pos.x, self.pos.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_decomposition_positive() {
        let t = Point::new(35, 4);
        assert_eq!(tile_to_chunk(t), Point::new(2, 0));
        assert_eq!(tile_to_local(t), Point::new(3, 4));
    }

    #[test]
    fn chunk_decomposition_negative_uses_floor_division() {
        let t = Point::new(-1, -17);
        assert_eq!(tile_to_chunk(t), Point::new(-1, -2));
        assert_eq!(tile_to_local(t), Point::new(15, 15));
    }

    #[test]
    fn chunk_local_round_trip() {
        for y in -40..40 {
            for x in -40..40 {
                let t = Point::new(x, y);
                let c = tile_to_chunk(t);
                let l = tile_to_local(t);
                assert!(l.x >= 0 && l.x < CHUNK_EDGE);
                assert!(l.y >= 0 && l.y < CHUNK_EDGE);
                assert_eq!(chunk_local_to_tile(c, l), t);
            }
        }
    }

    #[test]
    fn local_index_is_row_major() {
        assert_eq!(local_index(Point::new(0, 0)), 0);
        assert_eq!(local_index(Point::new(15, 0)), 15);
        assert_eq!(local_index(Point::new(0, 1)), 16);
        assert_eq!(local_index(Point::new(15, 15)), CHUNK_AREA - 1);
    }

    #[test]
    fn level_coord_ordering_is_floor_then_row_major() {
        let a = LevelCoord::new(9, 9, 0);
        let b = LevelCoord::new(0, 0, 1);
        assert!(a < b);
        assert!(LevelCoord::new(3, 2, 1) < LevelCoord::new(0, 3, 1));
    }
}
