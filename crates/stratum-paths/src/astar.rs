use std::collections::BinaryHeap;

use stratum_core::{Point, Range};

use crate::error::PathError;
use crate::path::{Movement, Path};
use crate::traits::NavGrid;

// ---------------------------------------------------------------------------
// Internal node storage
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Node {
    g: f64,
    parent: usize,
    generation: u32,
    open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Open-set entry, ordered so the `BinaryHeap` (a max-heap) pops the entry
/// with the smallest f first, ties broken by smaller h (closer to the
/// goal), then by earlier insertion for deterministic results.
#[derive(Clone, Copy)]
struct OpenEntry {
    f: f64,
    h: f64,
    seq: u32,
    idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for OpenEntry {}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

/// Single-floor A* pathfinder.
///
/// One instance is bound to a floor's bounds and reused for every query
/// against that floor: the node array is stamped with a generation counter
/// and lazily invalidated, so repeated queries allocate nothing after
/// warm-up. No search state survives a [`find_path`](Self::find_path) call
/// beyond that capacity.
pub struct Pathfinder {
    bounds: Range,
    width: usize,
    nodes: Vec<Node>,
    generation: u32,
    nbuf: Vec<Point>,
}

impl Pathfinder {
    /// Create a pathfinder for the given floor bounds.
    pub fn new(bounds: Range) -> Self {
        Self {
            bounds,
            width: bounds.width().max(0) as usize,
            nodes: vec![Node::default(); bounds.len()],
            generation: 0,
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The bounds this pathfinder searches within.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Rebind to new bounds. If the new area fits within the existing node
    /// array the capacity is kept and stale entries are invalidated by a
    /// generation bump; otherwise the array is reallocated.
    pub fn set_bounds(&mut self, bounds: Range) {
        let new_len = bounds.len();
        let capacity = self.nodes.len();
        self.bounds = bounds;
        self.width = bounds.width().max(0) as usize;

        if new_len <= capacity {
            self.generation = self.generation.wrapping_add(1);
            return;
        }
        self.nodes.clear();
        self.nodes.resize(new_len, Node::default());
        self.generation = 0;
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let x = (p.x - self.bounds.min.x) as usize;
        let y = (p.y - self.bounds.min.y) as usize;
        Some(y * self.width + x)
    }

    #[inline]
    fn point(&self, idx: usize) -> Point {
        let x = (idx % self.width) as i32 + self.bounds.min.x;
        let y = (idx / self.width) as i32 + self.bounds.min.y;
        Point::new(x, y)
    }

    /// Compute the cheapest walkable path from `from` to `to`.
    ///
    /// The start tile is exempt from the walkability check (an agent
    /// already standing in a blocked tile must still be able to leave it);
    /// a blocked goal fails immediately with [`PathError::GoalBlocked`]
    /// before any node is expanded. Results are deterministic: equal-cost
    /// alternatives are resolved by heuristic value, then insertion order.
    pub fn find_path<G: NavGrid>(
        &mut self,
        grid: &G,
        from: Point,
        to: Point,
        movement: Movement,
    ) -> Result<Path, PathError> {
        if !grid.in_bounds(from) || !grid.in_bounds(to) {
            return Err(PathError::OutOfBounds);
        }
        let (Some(start_idx), Some(goal_idx)) = (self.idx(from), self.idx(to)) else {
            return Err(PathError::OutOfBounds);
        };
        if start_idx == goal_idx {
            return Ok(Path::trivial(from));
        }
        if !grid.is_walkable(to) {
            return Err(PathError::GoalBlocked);
        }

        // Bump generation to lazily invalidate all nodes.
        self.generation = self.generation.wrapping_add(1);
        let cur_gen = self.generation;

        {
            let node = &mut self.nodes[start_idx];
            node.g = 0.0;
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut seq: u32 = 0;
        let h0 = movement.heuristic(from, to);
        open.push(OpenEntry {
            f: h0,
            h: h0,
            seq,
            idx: start_idx,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };
            let ci = current.idx;

            // Skip stale entries.
            if self.nodes[ci].generation != cur_gen || !self.nodes[ci].open {
                continue;
            }
            if ci == goal_idx {
                break 'search true;
            }

            self.nodes[ci].open = false;
            let current_g = self.nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            push_neighbors(grid, current_point, movement, &mut nbuf);

            for &np in nbuf.iter() {
                if !grid.is_walkable(np) {
                    continue;
                }
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + movement.step_cost(current_point, np);

                let n = &mut self.nodes[ni];
                if n.generation == cur_gen && tentative_g >= n.g {
                    continue;
                }
                n.generation = cur_gen;
                n.g = tentative_g;
                n.parent = ci;
                n.open = true;

                let h = movement.heuristic(np, to);
                seq += 1;
                open.push(OpenEntry {
                    f: tentative_g + h,
                    h,
                    seq,
                    idx: ni,
                });
            }
        };

        self.nbuf = nbuf;

        if !found {
            return Err(PathError::Unreachable);
        }

        // Reconstruct the tile sequence from the parent chain.
        let mut tiles = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            tiles.push(self.point(ci));
            ci = self.nodes[ci].parent;
        }
        tiles.reverse();
        Ok(Path {
            tiles,
            cost: self.nodes[goal_idx].g,
        })
    }
}

/// Append candidate neighbors of `p` into `buf`. Under 8-way movement a
/// diagonal is offered only when both adjacent orthogonal tiles are
/// walkable, so paths never cut corners through a wall.
fn push_neighbors<G: NavGrid>(grid: &G, p: Point, movement: Movement, buf: &mut Vec<Point>) {
    buf.extend_from_slice(&p.neighbors_4());
    if movement == Movement::EightWay {
        const DIAGONALS: [(i32, i32); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];
        for (dx, dy) in DIAGONALS {
            if grid.is_walkable(Point::new(p.x + dx, p.y))
                && grid.is_walkable(Point::new(p.x, p.y + dy))
            {
                buf.push(Point::new(p.x + dx, p.y + dy));
            }
        }
    }
}
