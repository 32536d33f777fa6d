//! Developer Tooling: world inspector and text map dumps.
//!
//! # Invariants
//! - Tools never mutate the world.

pub mod ascii;
pub mod inspector;

pub use ascii::render_window;
pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
