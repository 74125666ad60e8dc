//! Dynamic entities and the per-floor spatial index.

use std::collections::HashMap;

use stratum_core::Point;

/// Unique identifier of a dynamic entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bitmask of entity behaviour flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityFlags(pub u8);

impl EntityFlags {
    pub const NONE: Self = Self(0);
    /// The entity occupies its tile for movement purposes.
    pub const BLOCKS_MOVEMENT: Self = Self(1 << 0);
    /// The entity occludes sight rays.
    pub const BLOCKS_SIGHT: Self = Self(1 << 1);

    /// Whether this mask contains all the bits from `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for EntityFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A dynamic object placed on one tile of a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub pos: Point,
    pub flags: EntityFlags,
}

impl Entity {
    /// Whether this entity stops other agents walking onto its tile.
    #[inline]
    pub fn blocks_movement(&self) -> bool {
        self.flags.contains(EntityFlags::BLOCKS_MOVEMENT)
    }

    /// Whether this entity occludes sight rays crossing its tile.
    #[inline]
    pub fn blocks_sight(&self) -> bool {
        self.flags.contains(EntityFlags::BLOCKS_SIGHT)
    }
}

/// Position-keyed registry of the dynamic entities on one floor.
///
/// Invariant: every live entity appears in exactly one position bucket,
/// and buckets with zero members are removed rather than left as empty
/// allocations, so per-tile lookups stay O(1) amortized regardless of
/// churn.
#[derive(Default)]
pub struct EntityIndex {
    entities: HashMap<EntityId, Entity>,
    buckets: HashMap<Point, Vec<EntityId>>,
    next_id: u64,
}

impl EntityIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entity at `pos`, returning its allocated id.
    pub fn add(&mut self, pos: Point, flags: EntityFlags) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity { id, pos, flags });
        self.buckets.entry(pos).or_default().push(id);
        id
    }

    /// Look up a live entity.
    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Remove an entity. Returns `false` if the id is not live.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        self.unbucket(entity.pos, id);
        true
    }

    /// Move an entity to a new tile, keeping the buckets consistent:
    /// remove from the old bucket first, then add to the new one.
    /// Returns `false` if the id is not live.
    pub fn move_to(&mut self, id: EntityId, new_pos: Point) -> bool {
        let Some(old_pos) = self.entities.get(&id).map(|e| e.pos) else {
            return false;
        };
        if old_pos == new_pos {
            return true;
        }
        self.unbucket(old_pos, id);
        self.buckets.entry(new_pos).or_default().push(id);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.pos = new_pos;
        }
        true
    }

    fn unbucket(&mut self, pos: Point, id: EntityId) {
        if let Some(bucket) = self.buckets.get_mut(&pos) {
            bucket.retain(|&e| e != id);
            if bucket.is_empty() {
                self.buckets.remove(&pos);
            }
        }
    }

    /// The entities occupying `p`, in insertion order.
    pub fn entities_at(&self, p: Point) -> impl Iterator<Item = &Entity> {
        self.buckets
            .get(&p)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
    }

    /// Whether any entity on `p` blocks movement.
    pub fn has_blocking_entity_at(&self, p: Point) -> bool {
        self.entities_at(p).any(Entity::blocks_movement)
    }

    /// Whether any entity on `p` occludes sight.
    pub fn has_sight_blocking_entity_at(&self, p: Point) -> bool {
        self.entities_at(p).any(Entity::blocks_sight)
    }

    /// Iterate over all live entities, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the index holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[cfg(test)]
    fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_query() {
        let mut idx = EntityIndex::new();
        let p = Point::new(3, 4);
        let a = idx.add(p, EntityFlags::BLOCKS_MOVEMENT);
        let b = idx.add(p, EntityFlags::NONE);
        assert_ne!(a, b);
        assert_eq!(idx.entities_at(p).count(), 2);
        assert!(idx.has_blocking_entity_at(p));
        assert!(!idx.has_blocking_entity_at(Point::new(0, 0)));
    }

    #[test]
    fn non_blocking_entities_do_not_block() {
        let mut idx = EntityIndex::new();
        let p = Point::new(1, 1);
        idx.add(p, EntityFlags::NONE);
        idx.add(p, EntityFlags::BLOCKS_SIGHT);
        assert!(!idx.has_blocking_entity_at(p));
    }

    #[test]
    fn sight_and_movement_flags_are_independent() {
        let mut idx = EntityIndex::new();
        let smoke = Point::new(2, 2);
        let crate_ = Point::new(3, 3);
        idx.add(smoke, EntityFlags::BLOCKS_SIGHT);
        idx.add(crate_, EntityFlags::BLOCKS_MOVEMENT);

        assert!(idx.has_sight_blocking_entity_at(smoke));
        assert!(!idx.has_blocking_entity_at(smoke));
        assert!(idx.has_blocking_entity_at(crate_));
        assert!(!idx.has_sight_blocking_entity_at(crate_));
    }

    #[test]
    fn move_keeps_buckets_consistent() {
        let mut idx = EntityIndex::new();
        let a = Point::new(0, 0);
        let b = Point::new(5, 5);
        let id = idx.add(a, EntityFlags::BLOCKS_MOVEMENT);

        assert!(idx.move_to(id, b));
        assert_eq!(idx.entities_at(a).count(), 0);
        assert_eq!(idx.entities_at(b).count(), 1);
        assert!(!idx.has_blocking_entity_at(a));
        assert!(idx.has_blocking_entity_at(b));
        assert_eq!(idx.get(id).unwrap().pos, b);
    }

    #[test]
    fn empty_buckets_are_pruned() {
        let mut idx = EntityIndex::new();
        let a = Point::new(0, 0);
        let id = idx.add(a, EntityFlags::NONE);
        assert_eq!(idx.bucket_count(), 1);

        idx.move_to(id, Point::new(1, 0));
        assert_eq!(idx.bucket_count(), 1);

        idx.remove(id);
        assert_eq!(idx.bucket_count(), 0);
        assert!(idx.is_empty());
    }

    #[test]
    fn remove_unknown_id_is_false() {
        let mut idx = EntityIndex::new();
        assert!(!idx.remove(EntityId(99)));
        assert!(!idx.move_to(EntityId(99), Point::ZERO));
    }

    #[test]
    fn move_to_same_tile_is_a_no_op() {
        let mut idx = EntityIndex::new();
        let p = Point::new(2, 2);
        let id = idx.add(p, EntityFlags::NONE);
        assert!(idx.move_to(id, p));
        assert_eq!(idx.entities_at(p).count(), 1);
        assert_eq!(idx.bucket_count(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut idx = EntityIndex::new();
        let a = idx.add(Point::ZERO, EntityFlags::NONE);
        idx.remove(a);
        let b = idx.add(Point::ZERO, EntityFlags::NONE);
        assert_ne!(a, b);
    }
}
