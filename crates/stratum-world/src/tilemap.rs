//! The chunked, layered tile store for one floor.

use std::collections::HashMap;

use stratum_core::{Point, Range, tile_to_chunk, tile_to_local};

use crate::chunk::Chunk;
use crate::layer::{Layer, LayerSlot, TileRecord};

/// Per-floor tile storage: a fixed logical bounds range backed by 16×16
/// chunks.
///
/// Reads are total — an out-of-bounds or absent-chunk address yields the
/// all-empty [`TileRecord`], never an error, so an absent chunk behaves as
/// fully open terrain.
pub struct TileMap {
    bounds: Range,
    chunks: HashMap<Point, Chunk>,
}

impl TileMap {
    /// Create a tile store covering `bounds`, with every covering chunk
    /// allocated up front.
    pub fn new(bounds: Range) -> Self {
        let mut chunks = HashMap::new();
        if !bounds.is_empty() {
            let lo = tile_to_chunk(bounds.min);
            let hi = tile_to_chunk(bounds.max.shift(-1, -1));
            for cy in lo.y..=hi.y {
                for cx in lo.x..=hi.x {
                    chunks.insert(Point::new(cx, cy), Chunk::new());
                }
            }
        }
        Self { bounds, chunks }
    }

    /// The logical bounds of this floor.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Whether `p` is a valid tile address on this floor.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// The full layer stack at `p`. Total: out-of-bounds and absent
    /// chunks read as all-empty.
    pub fn get_tile(&self, p: Point) -> TileRecord {
        if !self.bounds.contains(p) {
            return TileRecord::EMPTY;
        }
        match self.chunks.get(&tile_to_chunk(p)) {
            Some(chunk) => chunk.tile(tile_to_local(p)),
            None => TileRecord::EMPTY,
        }
    }

    /// One layer of the stack at `p`.
    #[inline]
    pub fn layer(&self, p: Point, slot: LayerSlot) -> Layer {
        self.get_tile(p).layer(slot)
    }

    /// The damage byte of one layer at `p`.
    #[inline]
    pub fn damage(&self, p: Point, slot: LayerSlot) -> u8 {
        self.layer(p, slot).damage
    }

    /// Replace one layer at `p`, marking the owning chunk dirty.
    /// Out-of-bounds writes are ignored; a missing chunk is allocated.
    pub fn set_layer(&mut self, p: Point, slot: LayerSlot, layer: Layer) {
        if !self.bounds.contains(p) {
            return;
        }
        self.chunks
            .entry(tile_to_chunk(p))
            .or_default()
            .set_layer(tile_to_local(p), slot, layer);
    }

    /// Whether the tile at `p` blocks movement (wall layer only).
    #[inline]
    pub fn is_blocking(&self, p: Point) -> bool {
        self.get_tile(p).is_blocking()
    }

    /// Whether the tile at `p` blocks sight (wall layer only).
    #[inline]
    pub fn blocks_sight(&self, p: Point) -> bool {
        self.get_tile(p).blocks_sight()
    }

    /// Drain the dirty flags, returning the chunk addresses written since
    /// the previous drain. Consumed by the external renderer.
    pub fn take_dirty_chunks(&mut self) -> Vec<Point> {
        let mut dirty: Vec<Point> = self
            .chunks
            .iter_mut()
            .filter_map(|(&addr, chunk)| chunk.take_dirty().then_some(addr))
            .collect();
        dirty.sort();
        dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Layer {
        Layer::new(1).with_flags(Layer::FLAG_BLOCKS_MOVE | Layer::FLAG_BLOCKS_SIGHT)
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let map = TileMap::new(Range::new(0, 0, 32, 32));
        assert_eq!(map.get_tile(Point::new(-1, 0)), TileRecord::EMPTY);
        assert_eq!(map.get_tile(Point::new(32, 5)), TileRecord::EMPTY);
        assert!(!map.is_blocking(Point::new(100, 100)));
    }

    #[test]
    fn set_then_get_across_chunk_boundary() {
        let mut map = TileMap::new(Range::new(0, 0, 48, 48));
        let a = Point::new(15, 15);
        let b = Point::new(16, 16);
        map.set_layer(a, LayerSlot::Wall, wall());
        map.set_layer(b, LayerSlot::Floor, Layer::new(3).with_variant(2));

        assert!(map.is_blocking(a));
        assert!(map.blocks_sight(a));
        assert!(!map.is_blocking(b));
        assert_eq!(map.layer(b, LayerSlot::Floor).variant(), 2);
    }

    #[test]
    fn negative_bounds_store_correctly() {
        let mut map = TileMap::new(Range::new(-16, -16, 16, 16));
        let p = Point::new(-1, -9);
        map.set_layer(p, LayerSlot::Wall, wall());
        assert!(map.is_blocking(p));
        assert!(!map.is_blocking(Point::new(-2, -9)));
    }

    #[test]
    fn decor_layers_never_block() {
        let mut map = TileMap::new(Range::new(0, 0, 8, 8));
        let p = Point::new(2, 2);
        map.set_layer(p, LayerSlot::FloorDecor, wall());
        map.set_layer(p, LayerSlot::WallDecor, wall());
        assert!(!map.is_blocking(p));
        assert!(!map.blocks_sight(p));
    }

    #[test]
    fn damage_byte_is_per_layer() {
        let mut map = TileMap::new(Range::new(0, 0, 8, 8));
        let p = Point::new(1, 1);
        map.set_layer(p, LayerSlot::Wall, wall().with_damage(42));
        assert_eq!(map.damage(p, LayerSlot::Wall), 42);
        assert_eq!(map.damage(p, LayerSlot::Ground), 0);
    }

    #[test]
    fn dirty_chunks_drain_once() {
        let mut map = TileMap::new(Range::new(0, 0, 48, 16));
        map.set_layer(Point::new(0, 0), LayerSlot::Ground, Layer::new(1));
        map.set_layer(Point::new(40, 0), LayerSlot::Ground, Layer::new(1));

        let dirty = map.take_dirty_chunks();
        assert_eq!(dirty, vec![Point::new(0, 0), Point::new(2, 0)]);
        assert!(map.take_dirty_chunks().is_empty());
    }

    #[test]
    fn chunks_cover_bounds_at_creation() {
        let map = TileMap::new(Range::new(0, 0, 17, 17));
        assert_eq!(map.chunks.len(), 4);
        let map = TileMap::new(Range::new(-8, -8, 8, 8));
        assert_eq!(map.chunks.len(), 4);
    }
}
