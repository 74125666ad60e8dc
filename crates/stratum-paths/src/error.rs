//! The navigation error taxonomy.
//!
//! "No path" is a routine outcome for a pathfinding caller, so every
//! failure is a typed value returned through `Result`, never a panic.

use stratum_core::FloorIndex;
use thiserror::Error;

/// Why a path request could not be satisfied.
///
/// All variants are terminal: the engine never retries internally, since a
/// deterministic grid search would produce the same result again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    /// Start or goal lies outside the addressed level's bounds.
    #[error("start or goal is out of bounds")]
    OutOfBounds,
    /// The destination tile itself is not walkable.
    #[error("goal tile is blocked")]
    GoalBlocked,
    /// The search exhausted without reaching the goal.
    #[error("goal is unreachable")]
    Unreachable,
    /// No level is registered at the requested floor index.
    #[error("no level registered at floor {0}")]
    UnknownLevel(FloorIndex),
    /// Cross-level request with no transition chain linking the two floors
    /// within the configured slack band.
    #[error("no connecting transition between floors")]
    NoConnectingTransition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_floor() {
        let e = PathError::UnknownLevel(-2);
        assert_eq!(e.to_string(), "no level registered at floor -2");
    }
}
