//! Terrain generation for the tile world.
//!
//! # Invariants
//! - Generation is a pure function of dimensions and seed.
//! - A background generation never shares its grid: the worker owns it until
//!   completion is published, then hands it over by value.

pub mod handle;
pub mod terrain;

pub use handle::{GenerationHandle, start_generation};
pub use terrain::{GeneratedLevel, generate};

/// Errors from terrain generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid level dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("generation still running")]
    NotReady,
    #[error("generated level was already taken")]
    AlreadyTaken,
    #[error("generation worker panicked")]
    WorkerPanicked,
    #[error("failed to spawn generation worker: {0}")]
    Spawn(#[from] std::io::Error),
}
