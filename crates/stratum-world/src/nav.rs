//! The navigation facade and the cross-level pathfinder.
//!
//! Same-floor requests go straight to that floor's single-level A*. A
//! cross-floor request builds a small **meta-graph** — the start, the goal,
//! and every transition endpoint within a floor slack band — prices its
//! same-floor edges with single-level searches, searches it best-first, and
//! stitches the winning hops into per-floor path segments.
//!
//! Every call is a fresh, side-effect-free computation over the map as it
//! currently stands; the per-floor [`Pathfinder`] instances retained here
//! are capacity caches only and hold no search state between calls.

use std::collections::{BinaryHeap, HashMap};

use log::debug;

use stratum_core::{FloorIndex, LevelCoord, Point, manhattan};
use stratum_paths::{Movement, NavGrid, Path, PathError, Pathfinder};

use crate::map::{Transition, TransitionKind, WorldMap};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for a [`Navigator`], passed at construction.
#[derive(Debug, Clone)]
pub struct NavConfig {
    /// 4- or 8-connected movement within a floor.
    pub movement: Movement,
    /// How many floors beyond the start/goal span the meta-graph may use
    /// when collecting transitions.
    pub floor_slack: i32,
    /// Per-kind overrides of authored transition costs.
    pub transition_costs: HashMap<TransitionKind, f64>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            movement: Movement::default(),
            floor_slack: 1,
            transition_costs: HashMap::new(),
        }
    }
}

impl NavConfig {
    /// Effective traversal cost of a transition: the per-kind override if
    /// configured, the authored cost otherwise.
    fn transition_cost(&self, t: &Transition) -> f64 {
        self.transition_costs.get(&t.kind).copied().unwrap_or(t.cost)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One per-floor piece of a multi-level route. The segment ends in a
/// transition use when `transition` is set; the final segment never does.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSegment {
    pub floor: FloorIndex,
    pub path: Path,
    pub transition: Option<Transition>,
}

/// A stitched cross-level route.
///
/// `total_cost` includes both the walking cost of every segment and the
/// fixed cost of every transition used.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiLevelPath {
    pub segments: Vec<PathSegment>,
    pub total_cost: f64,
    pub transition_count: usize,
}

// ---------------------------------------------------------------------------
// Meta-graph search internals
// ---------------------------------------------------------------------------

/// How the meta-search moved between two meta-nodes.
#[derive(Clone, Copy)]
enum Hop {
    /// Same-floor walk, priced by a single-level search.
    Walk,
    /// Use of an authored transition.
    Transit(Transition),
}

/// Open-set entry for the meta-graph search, ordered so the max-heap pops
/// the smallest f first, ties broken by smaller h then by coordinate order
/// for determinism.
#[derive(Clone, Copy)]
struct MetaEntry {
    f: f64,
    h: f64,
    coord: LevelCoord,
    idx: usize,
}

impl Ord for MetaEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for MetaEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MetaEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for MetaEntry {}

type WalkCache = HashMap<(FloorIndex, Point, Point), Option<Path>>;

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// The caller-facing navigation surface over a [`WorldMap`].
///
/// Owns one single-level [`Pathfinder`] per floor, created on first use
/// and reused for every subsequent query against that floor.
pub struct Navigator {
    config: NavConfig,
    pathfinders: HashMap<FloorIndex, Pathfinder>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl Navigator {
    /// Create a navigator with the given tunables.
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            pathfinders: HashMap::new(),
        }
    }

    /// The active configuration.
    #[inline]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Adjust the configuration between requests.
    #[inline]
    pub fn config_mut(&mut self) -> &mut NavConfig {
        &mut self.config
    }

    /// Whether an agent can stand on `p` on floor `z`.
    pub fn is_walkable(&self, map: &WorldMap, z: FloorIndex, p: Point) -> bool {
        map.level(z).is_some_and(|level| level.is_walkable(p))
    }

    /// Whether `a` can see `b` on floor `z`.
    pub fn has_line_of_sight(&self, map: &WorldMap, z: FloorIndex, a: Point, b: Point) -> bool {
        map.level(z)
            .is_some_and(|level| stratum_paths::has_line_of_sight(level, a, b))
    }

    /// Shortest walkable path between two tiles on one floor.
    pub fn find_path(
        &mut self,
        map: &WorldMap,
        z: FloorIndex,
        from: Point,
        to: Point,
    ) -> Result<Path, PathError> {
        let movement = self.config.movement;
        let level = map.level(z).ok_or(PathError::UnknownLevel(z))?;
        let pf = self
            .pathfinders
            .entry(z)
            .or_insert_with(|| Pathfinder::new(level.bounds()));
        if pf.bounds() != level.bounds() {
            pf.set_bounds(level.bounds());
        }
        pf.find_path(level, from, to, movement)
    }

    /// Shortest route between two stacked-world coordinates, crossing
    /// floors through authored transitions where needed.
    pub fn find_multilevel_path(
        &mut self,
        map: &WorldMap,
        start: LevelCoord,
        goal: LevelCoord,
    ) -> Result<MultiLevelPath, PathError> {
        let start_level = map.level(start.z).ok_or(PathError::UnknownLevel(start.z))?;
        let goal_level = map.level(goal.z).ok_or(PathError::UnknownLevel(goal.z))?;
        if !start_level.in_bounds(start.pos) || !goal_level.in_bounds(goal.pos) {
            return Err(PathError::OutOfBounds);
        }

        // Same floor: the single-level search is authoritative, including
        // its start-tile exemption when start == goal.
        if start.z == goal.z {
            let path = self.find_path(map, start.z, start.pos, goal.pos)?;
            let total_cost = path.cost;
            return Ok(MultiLevelPath {
                segments: vec![PathSegment {
                    floor: start.z,
                    path,
                    transition: None,
                }],
                total_cost,
                transition_count: 0,
            });
        }

        if !goal_level.is_walkable(goal.pos) {
            return Err(PathError::GoalBlocked);
        }

        // Transitions usable by this request: both endpoints inside the
        // slack band and on registered floors.
        let lo = start.z.min(goal.z) - self.config.floor_slack;
        let hi = start.z.max(goal.z) + self.config.floor_slack;
        let candidates: Vec<Transition> = map
            .transitions()
            .iter()
            .filter(|t| t.from.z >= lo && t.from.z <= hi && t.to.z >= lo && t.to.z <= hi)
            .filter(|t| map.level(t.from.z).is_some() && map.level(t.to.z).is_some())
            .copied()
            .collect();

        debug!(
            "cross-level search {start} -> {goal}: {} candidate transitions in floors [{lo}, {hi}]",
            candidates.len()
        );

        if candidates.is_empty() || !candidates.iter().any(|t| t.from.z == start.z) {
            return Err(PathError::NoConnectingTransition);
        }

        // Meta-graph nodes: start, goal, every candidate endpoint.
        let mut nodes: Vec<LevelCoord> = Vec::new();
        let mut node_of: HashMap<LevelCoord, usize> = HashMap::new();
        let start_idx = intern(&mut nodes, &mut node_of, start);
        let goal_idx = intern(&mut nodes, &mut node_of, goal);
        for t in &candidates {
            intern(&mut nodes, &mut node_of, t.from);
            intern(&mut nodes, &mut node_of, t.to);
        }

        // Admissible vertical proxy: the cheapest floor change on offer.
        let unit = candidates
            .iter()
            .map(|t| self.config.transition_cost(t))
            .fold(map.default_transition_cost(), f64::min)
            .max(0.0);
        let h_of = |c: LevelCoord| {
            manhattan(c.pos, goal.pos) as f64 + ((c.z - goal.z).abs() as f64) * unit
        };

        let n = nodes.len();
        let mut g = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<(usize, Hop)>> = vec![None; n];
        let mut closed = vec![false; n];
        let mut open: BinaryHeap<MetaEntry> = BinaryHeap::new();
        let mut walk_cache: WalkCache = HashMap::new();

        g[start_idx] = 0.0;
        let h0 = h_of(start);
        open.push(MetaEntry {
            f: h0,
            h: h0,
            coord: start,
            idx: start_idx,
        });

        let mut found = false;
        while let Some(cur) = open.pop() {
            let ci = cur.idx;
            if closed[ci] {
                continue;
            }
            closed[ci] = true;
            if ci == goal_idx {
                found = true;
                break;
            }
            let c = nodes[ci];

            // Transition edges departing from exactly this coordinate.
            for t in candidates.iter().filter(|t| t.from == c) {
                let Some(&ti) = node_of.get(&t.to) else {
                    continue;
                };
                let tentative = g[ci] + self.config.transition_cost(t);
                if tentative < g[ti] {
                    g[ti] = tentative;
                    parent[ti] = Some((ci, Hop::Transit(*t)));
                    let ht = h_of(nodes[ti]);
                    open.push(MetaEntry {
                        f: tentative + ht,
                        h: ht,
                        coord: nodes[ti],
                        idx: ti,
                    });
                }
            }

            // Same-floor walking edges to every other meta-node on this
            // floor, priced by the single-level pathfinder.
            for j in 0..n {
                if j == ci || closed[j] || nodes[j].z != c.z {
                    continue;
                }
                let Some(cost) = self.walk_cost(map, &mut walk_cache, c.z, c.pos, nodes[j].pos)
                else {
                    continue;
                };
                let tentative = g[ci] + cost;
                if tentative < g[j] {
                    g[j] = tentative;
                    parent[j] = Some((ci, Hop::Walk));
                    let hj = h_of(nodes[j]);
                    open.push(MetaEntry {
                        f: tentative + hj,
                        h: hj,
                        coord: nodes[j],
                        idx: j,
                    });
                }
            }
        }

        if !found {
            return Err(PathError::Unreachable);
        }

        // Walk the meta-path start→goal and stitch per-floor segments.
        let mut hops: Vec<(usize, Hop, usize)> = Vec::new();
        let mut ci = goal_idx;
        while let Some((pi, hop)) = parent[ci] {
            hops.push((pi, hop, ci));
            ci = pi;
        }
        hops.reverse();

        let mut segments: Vec<PathSegment> = Vec::new();
        let mut total_cost = 0.0;
        let mut transition_count = 0usize;
        let mut seg_floor = start.z;
        let mut seg_path = Path::trivial(start.pos);

        for (fi, hop, ti) in hops {
            let from_c = nodes[fi];
            let to_c = nodes[ti];
            match hop {
                Hop::Walk => {
                    let walked = match walk_cache
                        .get(&(seg_floor, from_c.pos, to_c.pos))
                        .and_then(|p| p.clone())
                    {
                        Some(p) => p,
                        None => self.find_path(map, seg_floor, from_c.pos, to_c.pos)?,
                    };
                    total_cost += walked.cost;
                    seg_path.cost += walked.cost;
                    seg_path.tiles.extend_from_slice(&walked.tiles[1..]);
                }
                Hop::Transit(t) => {
                    total_cost += self.config.transition_cost(&t);
                    transition_count += 1;
                    segments.push(PathSegment {
                        floor: seg_floor,
                        path: std::mem::take(&mut seg_path),
                        transition: Some(t),
                    });
                    seg_floor = to_c.z;
                    seg_path = Path::trivial(to_c.pos);
                }
            }
        }
        segments.push(PathSegment {
            floor: seg_floor,
            path: seg_path,
            transition: None,
        });

        debug!(
            "cross-level route {start} -> {goal}: cost {total_cost:.2}, {transition_count} transition(s), {} segment(s)",
            segments.len()
        );

        Ok(MultiLevelPath {
            segments,
            total_cost,
            transition_count,
        })
    }

    /// Cost of walking between two tiles on one floor, memoized for the
    /// duration of a single cross-level request. Any failure (blocked
    /// transition tile, unreachable) simply contributes no meta-edge.
    fn walk_cost(
        &mut self,
        map: &WorldMap,
        cache: &mut WalkCache,
        z: FloorIndex,
        from: Point,
        to: Point,
    ) -> Option<f64> {
        let key = (z, from, to);
        if !cache.contains_key(&key) {
            let path = self.find_path(map, z, from, to).ok();
            cache.insert(key, path);
        }
        cache[&key].as_ref().map(|p| p.cost)
    }
}

fn intern(
    nodes: &mut Vec<LevelCoord>,
    node_of: &mut HashMap<LevelCoord, usize>,
    c: LevelCoord,
) -> usize {
    if let Some(&i) = node_of.get(&c) {
        return i;
    }
    nodes.push(c);
    node_of.insert(c, nodes.len() - 1);
    nodes.len() - 1
}
