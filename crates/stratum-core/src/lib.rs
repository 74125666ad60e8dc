//! **stratum-core** — coordinate types for stacked tile worlds.
//!
//! Provides the geometry and addressing primitives shared across the
//! *stratum* crates: 2D tile addresses ([`Point`]), level bounds
//! ([`Range`]), chunk decomposition ([`tile_to_chunk`] and friends), and
//! the floor-tagged [`LevelCoord`].

pub mod coords;
pub mod geom;

pub use coords::{
    CHUNK_AREA, CHUNK_EDGE, FloorIndex, LevelCoord, chunk_local_to_tile, local_index,
    tile_to_chunk, tile_to_local,
};
pub use geom::{Point, Range, chebyshev, manhattan};
