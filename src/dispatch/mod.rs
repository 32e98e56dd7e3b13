//! Concurrent, deduplicating file writer.
//!
//! This module provides:
//!
//! - **FileTask**: one `(path, content)` unit of output
//! - **Engine**: a bounded queue feeding a fixed pool of writer threads
//! - **RunReport**: per-run outcome counters
//!
//! # Lifecycle
//!
//! `Created -> Running -> Draining -> Stopped`. Tasks may be submitted from
//! any thread until [`Engine::stop`] closes the queue; `stop` returns only
//! after every task accepted before it was called has been written, failed,
//! or skipped as a duplicate.
//!
//! # Deduplication
//!
//! At most one write happens per normalized path per run. The first task to
//! claim a path wins; every later task for that path is skipped, including
//! tasks that arrive after the winning write has finished.

mod engine;
mod worker;


pub use engine::{Engine, EngineOptions, EngineState, RunReport};

use thiserror::Error;

/// Default number of writer threads.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default number of tasks the queue buffers before submissions are parked
/// on the overflow channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// One file to write, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Relative path as produced by the template or the model.
    pub path: String,
    /// File bytes.
    pub content: Vec<u8>,
}

impl FileTask {
    /// Create a task.
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Misuse of the engine lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `start` was called on an engine that is not in `Created`.
    #[error("engine cannot start from state '{0}'")]
    AlreadyStarted(EngineState),

    /// A writer thread could not be spawned.
    #[error("failed to spawn writer thread: {0}")]
    Spawn(String),
}
