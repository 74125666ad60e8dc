//! Pathfinding and line-of-sight for stacked tile worlds.
//!
//! This crate implements the single-floor half of the two-tier navigation
//! engine:
//!
//! - **A\*** shortest-path search over a walkability predicate
//!   ([`Pathfinder::find_path`])
//! - **Line of sight** via Bresenham raycast ([`has_line_of_sight`])
//!
//! The world model plugs in through the [`NavGrid`] trait; the predicates
//! are consulted on every node expansion, never snapshotted, so dynamic
//! obstacles are always seen. [`Pathfinder`] owns reusable node caches so
//! repeated queries against one floor incur no allocations after warm-up.
//!
//! Failures are routine outcomes and come back as typed [`PathError`]
//! values, never panics.

mod astar;
mod error;
mod los;
mod path;
mod traits;

pub use astar::Pathfinder;
pub use error::PathError;
pub use los::has_line_of_sight;
pub use path::{DIAGONAL_COST, Movement, Path};
pub use traits::NavGrid;
