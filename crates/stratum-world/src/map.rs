//! The multi-level map: floor registry plus the transition graph.

use std::collections::BTreeMap;

use stratum_core::{FloorIndex, LevelCoord, Range};

use crate::level::{Level, LevelKind};

/// Default traversal cost of one floor change.
pub const DEFAULT_TRANSITION_COST: f64 = 5.0;

/// What kind of connection a transition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    Stairs,
    Ladder,
    Elevator,
}

/// An authored, directed connection between two stacked-world coordinates.
///
/// Transitions are map data, not derived: a stairway typically contributes
/// two transitions (up and down) at the same physical tile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub from: LevelCoord,
    pub to: LevelCoord,
    pub kind: TransitionKind,
    pub cost: f64,
    /// Whether using this transition requires an explicit interaction
    /// (opening a hatch, calling an elevator) rather than plain walking.
    pub requires_interaction: bool,
}

/// A collection of levels keyed by floor index, plus the global transition
/// list.
///
/// Explicitly constructed and passed by reference to whatever needs it; no
/// process-wide singleton.
#[derive(Default)]
pub struct WorldMap {
    levels: BTreeMap<FloorIndex, Level>,
    transitions: Vec<Transition>,
    default_transition_cost: f64,
}

impl WorldMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            transitions: Vec::new(),
            default_transition_cost: DEFAULT_TRANSITION_COST,
        }
    }

    /// Register a level at floor `z`, replacing any previous one. Returns
    /// a mutable reference for authoring.
    pub fn create_level(&mut self, z: FloorIndex, kind: LevelKind, bounds: Range) -> &mut Level {
        use std::collections::btree_map::Entry;
        let level = Level::new(kind, bounds);
        match self.levels.entry(z) {
            Entry::Occupied(mut slot) => {
                slot.insert(level);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(level),
        }
    }

    /// The level at floor `z`, if registered.
    #[inline]
    pub fn level(&self, z: FloorIndex) -> Option<&Level> {
        self.levels.get(&z)
    }

    /// Mutable access to the level at floor `z`.
    #[inline]
    pub fn level_mut(&mut self, z: FloorIndex) -> Option<&mut Level> {
        self.levels.get_mut(&z)
    }

    /// Registered floor indices, ascending.
    pub fn floors(&self) -> impl Iterator<Item = FloorIndex> + '_ {
        self.levels.keys().copied()
    }

    /// Author a directed transition edge.
    pub fn add_transition(
        &mut self,
        from: LevelCoord,
        to: LevelCoord,
        kind: TransitionKind,
        cost: f64,
        requires_interaction: bool,
    ) {
        self.transitions.push(Transition {
            from,
            to,
            kind,
            cost,
            requires_interaction,
        });
    }

    /// All authored transitions, in authoring order.
    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The transitions departing from exactly `coord`.
    pub fn transitions_from(&self, coord: LevelCoord) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == coord)
    }

    /// The tunable default cost of a floor change.
    #[inline]
    pub fn default_transition_cost(&self) -> f64 {
        self.default_transition_cost
    }

    /// Override the default floor-change cost.
    pub fn set_default_transition_cost(&mut self, cost: f64) {
        self.default_transition_cost = cost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_keyed_by_floor() {
        let mut map = WorldMap::new();
        map.create_level(0, LevelKind::Ground, Range::new(0, 0, 10, 10));
        map.create_level(-1, LevelKind::Underground, Range::new(0, 0, 8, 8));

        assert!(map.level(0).is_some());
        assert!(map.level(-1).is_some());
        assert!(map.level(2).is_none());
        assert_eq!(map.floors().collect::<Vec<_>>(), vec![-1, 0]);
    }

    #[test]
    fn transitions_from_filters_by_exact_coordinate() {
        let mut map = WorldMap::new();
        let up = LevelCoord::new(5, 5, 0);
        let down = LevelCoord::new(5, 5, 1);
        map.add_transition(up, down, TransitionKind::Stairs, 5.0, false);
        map.add_transition(down, up, TransitionKind::Stairs, 5.0, false);

        let from_up: Vec<_> = map.transitions_from(up).collect();
        assert_eq!(from_up.len(), 1);
        assert_eq!(from_up[0].to, down);
        assert_eq!(map.transitions_from(LevelCoord::new(4, 5, 0)).count(), 0);
    }

    #[test]
    fn default_transition_cost_is_tunable() {
        let mut map = WorldMap::new();
        assert_eq!(map.default_transition_cost(), DEFAULT_TRANSITION_COST);
        map.set_default_transition_cost(2.5);
        assert_eq!(map.default_transition_cost(), 2.5);
    }
}
