//! Shared types for the tileworld simulation: coordinates, boxes, resources,
//! configuration and the seedable RNG handle threaded through the core.
//!
//! # Invariants
//! - Every random draw in the core goes through an explicitly passed [`WorldRng`].
//! - Pixel space has y growing downward; tile `(x, y)` covers
//!   `[x * TILE_WIDTH, (x + 1) * TILE_WIDTH)` horizontally.

pub mod config;
pub mod resource;
pub mod types;

pub use config::{ConfigError, PhysicsConfig, PlayerSettings, SimConfig, TickerConfig, WorldSettings};
pub use resource::{ResourceDescriptor, ResourceId, ResourceStack};
pub use types::{
    Aabb, EntityId, MaterialClass, PlayerIntent, TILE_HEIGHT, TILE_WIDTH, TileRect, tile_center,
    tile_of,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The random source handed to generation and to every material update/removal.
pub type WorldRng = ChaCha8Rng;

/// Build a deterministic RNG from a 64-bit seed.
pub fn seeded_rng(seed: u64) -> WorldRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Integer draws in the shapes the simulation uses.
pub trait RngExt {
    /// Uniform draw in `0..n`. Returns 0 when `n <= 0`.
    fn below(&mut self, n: i32) -> i32;
    /// True with probability `1 / n`.
    fn one_in(&mut self, n: i32) -> bool;
}

impl<R: Rng> RngExt for R {
    fn below(&mut self, n: i32) -> i32 {
        if n <= 0 { 0 } else { self.gen_range(0..n) }
    }

    fn one_in(&mut self, n: i32) -> bool {
        self.below(n) == 0
    }
}
