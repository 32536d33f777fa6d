use std::time::{Duration, Instant};

use glam::Vec2;
use tileworld_common::{TickerConfig, TileRect};
use tileworld_kernel::{TileGrid, World};

/// Counters from one update pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Tiles whose update ran.
    pub visited: usize,
    /// Tiles that were replaced.
    pub changed: usize,
    pub elapsed: Duration,
}

/// Runs material updates on the tiles around a focus point every few steps.
///
/// Only the window around the focus is updated; the rest of the world is
/// frozen until the focus comes near it.
#[derive(Debug, Clone)]
pub struct WorldTicker {
    config: TickerConfig,
    counter: u32,
    passes: u64,
    last: TickStats,
}

impl WorldTicker {
    pub fn new(config: TickerConfig) -> Self {
        Self {
            config,
            counter: 0,
            passes: 0,
            last: TickStats::default(),
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Window of tiles a pass at `focus` would visit, clipped to `grid`.
    pub fn window(&self, focus: Vec2, grid: &TileGrid) -> TileRect {
        TileRect::around(focus, self.config.half_extent).clamp_to(grid.width(), grid.height())
    }

    /// Count one simulation step and run a pass when the cadence is reached.
    pub fn advance(&mut self, world: &mut World, focus: Vec2) -> Option<TickStats> {
        self.counter += 1;
        if self.counter < self.config.cadence.max(1) {
            return None;
        }
        self.counter = 0;
        Some(self.run_pass(world, focus))
    }

    /// Update every tile in the window around `focus`, ascending x then y.
    pub fn run_pass(&mut self, world: &mut World, focus: Vec2) -> TickStats {
        let _span = tracing::info_span!("tick_pass").entered();
        let start = Instant::now();
        let window = self.window(focus, world.grid());

        let mut stats = TickStats::default();
        for (x, y) in window.iter() {
            stats.visited += 1;
            if world.update_tile(x, y) {
                stats.changed += 1;
            }
        }
        stats.elapsed = start.elapsed();

        self.passes += 1;
        self.last = stats;
        tracing::trace!(
            visited = stats.visited,
            changed = stats.changed,
            x = window.x,
            y = window.y,
            "tick pass complete"
        );
        stats
    }

    /// Passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Statistics from the most recent pass.
    pub fn last_stats(&self) -> &TickStats {
        &self.last
    }
}
