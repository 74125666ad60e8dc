use stratum_core::Point;

/// The walkability seam between the world model and the search algorithms.
///
/// Implementations combine static terrain blocking with dynamic entity
/// blocking. The pathfinder consults these predicates on **every** node
/// expansion and never caches them across calls, so entity movement between
/// requests is always observed.
pub trait NavGrid {
    /// Whether `p` is a valid tile address on this floor.
    fn in_bounds(&self, p: Point) -> bool;

    /// Whether an agent can stand on `p`: in bounds, no blocking wall
    /// layer, no blocking entity.
    fn is_walkable(&self, p: Point) -> bool;

    /// Whether `p` stops sight rays. Derived from the wall layer's sight
    /// flag only; decor never occludes.
    fn blocks_sight(&self, p: Point) -> bool;
}

impl<G: NavGrid> NavGrid for &G {
    fn in_bounds(&self, p: Point) -> bool {
        (**self).in_bounds(p)
    }

    fn is_walkable(&self, p: Point) -> bool {
        (**self).is_walkable(p)
    }

    fn blocks_sight(&self, p: Point) -> bool {
        (**self).blocks_sight(p)
    }
}
