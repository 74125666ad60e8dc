//! Line-of-sight raycasting.
//!
//! A pure raycast, not a search: the grid cells on the segment between two
//! tiles are stepped with Bresenham's algorithm and the ray fails at the
//! first sight-blocking cell. Shares the [`NavGrid`] seam with the
//! pathfinder but consults the sight predicate, since walls that stop
//! movement and walls that stop sight are distinct flags.

use stratum_core::Point;

use crate::traits::NavGrid;

/// Whether `a` can see `b`.
///
/// Endpoints are exempt: an agent standing inside an occluding tile can
/// still see out of it, and a visible wall face does not hide itself.
/// Returns `false` when either endpoint is out of bounds.
pub fn has_line_of_sight<G: NavGrid>(grid: &G, a: Point, b: Point) -> bool {
    if !grid.in_bounds(a) || !grid.in_bounds(b) {
        return false;
    }

    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut cur = a;

    loop {
        if cur != a && cur != b && grid.blocks_sight(cur) {
            return false;
        }
        if cur == b {
            return true;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cur.x += sx;
        }
        if e2 <= dx {
            err += dx;
            cur.y += sy;
        }
    }
}
