//! Filesystem utilities for scaffold.
//!
//! Atomic whole-file writes, and normalization of task paths so that nothing
//! lands outside the output root.

pub mod atomic;
pub mod paths;

pub use atomic::{WriteError, atomic_write};
pub use paths::{PathError, normalize_task_path};
