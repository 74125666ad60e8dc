//! Path results and the movement model.

use stratum_core::{Point, chebyshev, manhattan};

/// Cost of one diagonal step under 8-way movement.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// How an agent may step between adjacent tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Movement {
    /// Orthogonal steps only, cost 1 each.
    #[default]
    FourWay,
    /// Orthogonal steps cost 1, diagonal steps cost √2. Diagonals may not
    /// cut corners past a blocked orthogonal neighbour.
    EightWay,
}

impl Movement {
    /// Admissible, consistent heuristic for this movement model:
    /// Manhattan distance for 4-way, octile distance for 8-way.
    #[inline]
    pub fn heuristic(self, a: Point, b: Point) -> f64 {
        match self {
            Movement::FourWay => manhattan(a, b) as f64,
            Movement::EightWay => {
                let m = manhattan(a, b) as f64;
                let c = chebyshev(a, b) as f64;
                // m - c diagonal steps shortcut one orthogonal pair each.
                c + (DIAGONAL_COST - 1.0) * (m - c)
            }
        }
    }

    /// Cost of one step between two adjacent tiles.
    #[inline]
    pub fn step_cost(self, from: Point, to: Point) -> f64 {
        if from.x != to.x && from.y != to.y {
            DIAGONAL_COST
        } else {
            1.0
        }
    }
}

/// A walkable route within one floor: the sequence of visited tiles (start
/// inclusive) and the accumulated movement cost.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub tiles: Vec<Point>,
    pub cost: f64,
}

impl Path {
    /// A zero-cost path standing on a single tile.
    pub fn trivial(p: Point) -> Self {
        Self {
            tiles: vec![p],
            cost: 0.0,
        }
    }

    /// Number of steps taken (tiles visited minus one).
    pub fn steps(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let p = Path {
            tiles: vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)],
            cost: 2.0,
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn movement_round_trip() {
        let json = serde_json::to_string(&Movement::EightWay).unwrap();
        let back: Movement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Movement::EightWay);
    }
}
