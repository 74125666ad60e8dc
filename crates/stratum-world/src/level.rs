//! One floor of the stacked world.

use stratum_core::{Point, Range};
use stratum_paths::NavGrid;

use crate::entity::EntityIndex;
use crate::tilemap::TileMap;

/// What kind of floor a level is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelKind {
    /// The ground floor (z = 0).
    Ground,
    /// An aboveground floor.
    Upper,
    /// A basement or cave floor.
    Underground,
}

/// One floor: its layered tile store plus its own entity spatial index.
pub struct Level {
    kind: LevelKind,
    tiles: TileMap,
    entities: EntityIndex,
}

impl Level {
    /// Create a level covering `bounds`.
    pub fn new(kind: LevelKind, bounds: Range) -> Self {
        Self {
            kind,
            tiles: TileMap::new(bounds),
            entities: EntityIndex::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> LevelKind {
        self.kind
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.tiles.bounds()
    }

    #[inline]
    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    #[inline]
    pub fn tiles_mut(&mut self) -> &mut TileMap {
        &mut self.tiles
    }

    #[inline]
    pub fn entities(&self) -> &EntityIndex {
        &self.entities
    }

    #[inline]
    pub fn entities_mut(&mut self) -> &mut EntityIndex {
        &mut self.entities
    }
}

/// The walkability and sight resolver: static terrain combined with dynamic
/// entities. Evaluated fresh on every pathfinding node expansion.
impl NavGrid for Level {
    fn in_bounds(&self, p: Point) -> bool {
        self.tiles.contains(p)
    }

    fn is_walkable(&self, p: Point) -> bool {
        self.tiles.contains(p)
            && !self.tiles.is_blocking(p)
            && !self.entities.has_blocking_entity_at(p)
    }

    fn blocks_sight(&self, p: Point) -> bool {
        self.tiles.blocks_sight(p) || self.entities.has_sight_blocking_entity_at(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityFlags;
    use crate::layer::{Layer, LayerSlot};

    fn level() -> Level {
        Level::new(LevelKind::Ground, Range::new(0, 0, 10, 10))
    }

    #[test]
    fn open_tile_is_walkable() {
        let lvl = level();
        assert!(lvl.is_walkable(Point::new(4, 4)));
        assert!(!lvl.is_walkable(Point::new(10, 0)));
        assert!(!lvl.is_walkable(Point::new(-1, 0)));
    }

    #[test]
    fn wall_layer_blocks_walkability() {
        let mut lvl = level();
        let p = Point::new(2, 2);
        lvl.tiles_mut().set_layer(
            p,
            LayerSlot::Wall,
            Layer::new(1).with_flags(Layer::FLAG_BLOCKS_MOVE),
        );
        assert!(!lvl.is_walkable(p));
    }

    #[test]
    fn sight_blocking_entity_occludes_without_blocking_movement() {
        let mut lvl = level();
        let p = Point::new(3, 3);
        let id = lvl.entities_mut().add(p, EntityFlags::BLOCKS_SIGHT);

        assert!(lvl.blocks_sight(p));
        assert!(lvl.is_walkable(p));

        lvl.entities_mut().remove(id);
        assert!(!lvl.blocks_sight(p));
    }

    #[test]
    fn blocking_entity_blocks_walkability() {
        let mut lvl = level();
        let p = Point::new(6, 6);
        let id = lvl.entities_mut().add(p, EntityFlags::BLOCKS_MOVEMENT);
        assert!(!lvl.is_walkable(p));

        // The predicate reflects entity movement immediately.
        lvl.entities_mut().move_to(id, Point::new(7, 7));
        assert!(lvl.is_walkable(p));
        assert!(!lvl.is_walkable(Point::new(7, 7)));
    }
}
