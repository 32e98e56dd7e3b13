//! Extraction of file blocks from free-text model replies.
//!
//! The model is asked to emit each file as:
//!
//! ````text
//! ---FILE_PATH: src/main.go
//! ```go
//! package main
//! ```
//! ---END_FILE
//! ````
//!
//! Each block becomes one [`FileTask`]. Matching is non-greedy, so a body ends
//! at the nearest end marker, and any number of blocks may appear in one reply.

use crate::dispatch::FileTask;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Marker that opens a file block; the rest of the line is the path.
pub const BEGIN_MARKER: &str = "---FILE_PATH:";

/// Marker that closes a file block.
pub const END_MARKER: &str = "---END_FILE";

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)---FILE_PATH:([^\n]*)\n(.*?)---END_FILE").expect("block pattern is valid")
});

static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```[A-Za-z0-9_+.#-]*[ \t]*\r?\n").expect("fence open pattern is valid")
});

static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\r?\n|^)```[ \t]*$").expect("fence close pattern is valid")
});

/// Extract every file block from `raw`, in source order.
///
/// Returns an empty vector when no block is present; deciding whether that is
/// fatal is up to the caller. Blocks with an empty path are skipped.
pub fn parse(raw: &str) -> Vec<FileTask> {
    let mut tasks = Vec::new();

    for caps in BLOCK.captures_iter(raw) {
        let (Some(path), Some(body)) = (caps.get(1), caps.get(2)) else {
            warn!(block = %&caps[0], "invalid file block, skipping");
            continue;
        };

        let path = path.as_str().trim();
        if path.is_empty() {
            warn!("file block without a path, skipping");
            continue;
        }

        let content = strip_fences(body.as_str());
        debug!(path, bytes = content.len(), "extracted file block");
        tasks.push(FileTask::new(path, content));
    }

    if tasks.is_empty() {
        debug!("no file blocks found in response");
    }

    tasks
}

/// Remove one leading fence opener line and one trailing fence closer line,
/// then trim. Fences inside the body are left alone.
fn strip_fences(body: &str) -> String {
    let body = body.trim();
    let body = match FENCE_OPEN.find(body) {
        Some(m) => &body[m.end()..],
        None => body,
    };
    let body = match FENCE_CLOSE.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    };
    body.trim().to_string()
}
