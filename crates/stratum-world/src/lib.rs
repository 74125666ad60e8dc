//! World model and cross-level navigation for stacked tile worlds.
//!
//! One [`Level`] is a floor: a chunked, six-layer tile store plus its own
//! dynamic [`EntityIndex`]. A [`WorldMap`] stacks levels by floor index and
//! carries the authored [`Transition`] graph (stairs, ladders, elevators)
//! between them. The [`Navigator`] is the caller surface: same-floor A*,
//! line of sight, walkability queries, and the cross-level meta-graph
//! search that stitches per-floor paths across transitions.

pub mod chunk;
pub mod entity;
pub mod layer;
pub mod level;
pub mod map;
pub mod nav;
pub mod tilemap;

pub use chunk::Chunk;
pub use entity::{Entity, EntityFlags, EntityId, EntityIndex};
pub use layer::{LAYER_COUNT, Layer, LayerSlot, TileRecord};
pub use level::{Level, LevelKind};
pub use map::{DEFAULT_TRANSITION_COST, Transition, TransitionKind, WorldMap};
pub use nav::{MultiLevelPath, NavConfig, Navigator, PathSegment};
pub use tilemap::TileMap;
