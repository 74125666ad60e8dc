//! Fixed-size tile chunks.

use stratum_core::{CHUNK_AREA, CHUNK_EDGE, Point, local_index};

use crate::layer::{Layer, LayerSlot, TileRecord};

/// A 16×16 block of tile records.
///
/// Writes mark the chunk dirty; the renderer (an external collaborator)
/// drains the flag through
/// [`TileMap::take_dirty_chunks`](crate::tilemap::TileMap::take_dirty_chunks).
///
/// Local addresses must lie in `[0, CHUNK_EDGE)` on both axes; violating
/// that is a programmer error, checked in debug builds only.
pub struct Chunk {
    tiles: Box<[TileRecord; CHUNK_AREA]>,
    dirty: bool,
}

impl Chunk {
    /// Create an all-empty chunk.
    pub fn new() -> Self {
        Self {
            tiles: Box::new([TileRecord::EMPTY; CHUNK_AREA]),
            dirty: false,
        }
    }

    #[inline]
    fn check_local(local: Point) {
        debug_assert!(
            local.x >= 0 && local.x < CHUNK_EDGE && local.y >= 0 && local.y < CHUNK_EDGE,
            "local address {local} outside chunk"
        );
    }

    /// The tile record at a local address.
    #[inline]
    pub fn tile(&self, local: Point) -> TileRecord {
        Self::check_local(local);
        self.tiles[local_index(local)]
    }

    /// Replace one layer of the tile at a local address and mark the
    /// chunk dirty.
    #[inline]
    pub fn set_layer(&mut self, local: Point, slot: LayerSlot, layer: Layer) {
        Self::check_local(local);
        self.tiles[local_index(local)].set_layer(slot, layer);
        self.dirty = true;
    }

    /// Whether the chunk has been written since the last drain.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the dirty flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_empty_and_clean() {
        let c = Chunk::new();
        assert!(!c.is_dirty());
        assert_eq!(c.tile(Point::new(0, 0)), TileRecord::EMPTY);
        assert_eq!(c.tile(Point::new(15, 15)), TileRecord::EMPTY);
    }

    #[test]
    fn writes_dirty_the_chunk() {
        let mut c = Chunk::new();
        c.set_layer(Point::new(3, 4), LayerSlot::Ground, Layer::new(1));
        assert!(c.is_dirty());
        assert_eq!(c.tile(Point::new(3, 4)).layer(LayerSlot::Ground), Layer::new(1));

        assert!(c.take_dirty());
        assert!(!c.is_dirty());
        assert!(!c.take_dirty());
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn out_of_range_local_address_asserts_in_debug() {
        let c = Chunk::new();
        let _ = c.tile(Point::new(16, 0));
    }
}
