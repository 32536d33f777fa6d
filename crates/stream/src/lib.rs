//! Windowed ticking: periodic material updates limited to the area around a focus point.
//!
//! # Invariants
//! - A pass runs on every `cadence`-th step, never more often.
//! - Tiles outside the window are never visited by a pass.
//! - Tiles are visited in ascending x, then ascending y.

mod ticker;
mod timer;

pub use ticker::{TickStats, WorldTicker};
pub use timer::PassTimer;
