use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tileworld_common::seeded_rng;

use crate::GenerationError;
use crate::terrain::{GeneratedLevel, generate};

/// A terrain generation running on its own worker thread.
///
/// The worker owns the grid until it finishes; the caller only ever sees it
/// through [`take`](Self::take) or [`wait`](Self::wait).
#[derive(Debug)]
pub struct GenerationHandle {
    done: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<GeneratedLevel, GenerationError>>>,
}

/// Start generating a `width` x `height` level from `seed` in the background.
pub fn start_generation(width: i32, height: i32, seed: u64) -> Result<GenerationHandle, GenerationError> {
    if width <= 0 || height <= 0 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    let done = Arc::new(AtomicBool::new(false));
    let worker_done = Arc::clone(&done);
    let worker = thread::Builder::new()
        .name("worldgen".into())
        .spawn(move || {
            let _span = tracing::info_span!("worldgen", width, height, seed).entered();
            let mut rng = seeded_rng(seed);
            let level = generate(width, height, &mut rng);
            worker_done.store(true, Ordering::Release);
            level
        })?;
    tracing::info!(width, height, seed, "terrain generation started");
    Ok(GenerationHandle {
        done,
        worker: Some(worker),
    })
}

impl GenerationHandle {
    /// True once the worker has written its last tile.
    pub fn is_complete(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// The finished level, without blocking.
    ///
    /// Fails with [`GenerationError::NotReady`] while the worker is still
    /// running and with [`GenerationError::AlreadyTaken`] on a second call.
    pub fn take(&mut self) -> Result<GeneratedLevel, GenerationError> {
        if self.worker.is_none() {
            return Err(GenerationError::AlreadyTaken);
        }
        if !self.is_complete() {
            return Err(GenerationError::NotReady);
        }
        self.join()
    }

    /// Block until the worker finishes and return its level.
    pub fn wait(mut self) -> Result<GeneratedLevel, GenerationError> {
        self.join()
    }

    fn join(&mut self) -> Result<GeneratedLevel, GenerationError> {
        let worker = self.worker.take().ok_or(GenerationError::AlreadyTaken)?;
        worker.join().map_err(|_| GenerationError::WorkerPanicked)?
    }
}
