//! World Kernel: authoritative tile grid, material behaviours, entity physics and stepping.
//!
//! # Invariants
//! - Every in-bounds cell holds exactly one tile; removal writes the empty tile.
//! - Material behaviours return effects and never mutate the world themselves.
//! - Each live entity is stepped exactly once per world step, in insertion order.
//! - All randomness is drawn from the world's seeded RNG.

pub mod collision;
pub mod entity;
pub mod grid;
pub mod tile;
pub mod world;

pub use collision::Contacts;
pub use entity::{Entity, EntityKind, StepOutcome};
pub use grid::TileGrid;
pub use tile::{Behavior, DropSpec, Material, Tile};
pub use world::{DespawnReason, EVENT_LOG_CAPACITY, World, WorldEvent};
