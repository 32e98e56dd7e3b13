//! Append-only NDJSON event log.
//!
//! One JSON object per line:
//!
//! ```text
//! {"ts":"2024-05-01T10:00:00Z","kind":"written","message":"file written","path":"go.mod","actor":"dev@host"}
//! ```

use super::{Notifier, ProgressEvent};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Sink that appends every event to a file.
///
/// Write failures are logged and otherwise ignored; a broken log never stops
/// a run.
pub struct EventLog {
    path: PathBuf,
    actor: String,
    file: Mutex<File>,
}

#[derive(Serialize)]
struct LogLine<'a> {
    #[serde(flatten)]
    event: &'a ProgressEvent,
    actor: &'a str,
}

impl EventLog {
    /// Open (or create) the log at `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            actor: actor_string(),
            file: Mutex::new(file),
        })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, event: &ProgressEvent) -> io::Result<()> {
        let line = serde_json::to_string(&LogLine {
            event,
            actor: &self.actor,
        })
        .map_err(io::Error::other)?;

        let mut file = self.file.lock().unwrap_or_else(|poison| poison.into_inner());
        writeln!(file, "{}", line)
    }
}

impl Notifier for EventLog {
    fn notify(&self, event: &ProgressEvent) {
        if let Err(e) = self.append(event) {
            warn!(path = %self.path.display(), error = %e, "failed to append event");
        }
    }
}

/// The `user@host` string recorded with each event.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
