//! Progress reporting for generation runs.
//!
//! The dispatch engine and the generator report lifecycle points through a
//! [`Notifier`]. Sinks must return quickly: they are called from worker
//! threads, so anything slow belongs behind a [`ChannelNotifier`], which drops
//! events instead of blocking when its subscriber falls behind.
//!
//! # Event Format
//!
//! Each event carries:
//! - `ts`: RFC3339 timestamp
//! - `kind`: lifecycle point (`enqueued`, `written`, ...)
//! - `message`: human-readable text
//! - `path`: task path, for task-level events

mod channel;
mod event_log;


pub use channel::ChannelNotifier;
pub use event_log::EventLog;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle points reported during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Generation began.
    RunStarted,
    /// A task was accepted by the queue.
    Enqueued,
    /// A file was written.
    Written,
    /// A task could not be written (bad path or I/O error).
    Failed,
    /// A task was discarded because its path was already written.
    Skipped,
    /// The engine drained and stopped.
    RunCompleted,
    /// Generation aborted with an error.
    RunErrored,
}

impl EventKind {
    /// Whether this kind is a final outcome for a single task.
    pub fn is_terminal_for_task(self) -> bool {
        matches!(self, EventKind::Written | EventKind::Failed | EventKind::Skipped)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::RunStarted => write!(f, "run_started"),
            EventKind::Enqueued => write!(f, "enqueued"),
            EventKind::Written => write!(f, "written"),
            EventKind::Failed => write!(f, "failed"),
            EventKind::Skipped => write!(f, "skipped"),
            EventKind::RunCompleted => write!(f, "run_completed"),
            EventKind::RunErrored => write!(f, "run_errored"),
        }
    }
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// When the event was raised.
    pub ts: DateTime<Utc>,

    /// Lifecycle point.
    pub kind: EventKind,

    /// Human-readable description.
    pub message: String,

    /// Task path for task-level events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ProgressEvent {
    /// Create an event stamped with the current time.
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            kind,
            message: message.into(),
            path: None,
        }
    }

    /// Attach the task path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// A progress sink.
///
/// Implementations are invoked from worker threads and must not block for
/// long.
pub trait Notifier: Send + Sync {
    /// Receive one event.
    fn notify(&self, event: &ProgressEvent);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &ProgressEvent) {}
}

/// Sink that forwards to a closure, for transports that push events to a
/// live connection.
pub struct FnNotifier<F>(F);

impl<F> FnNotifier<F>
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    /// Wrap `callback`.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> Notifier for FnNotifier<F>
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn notify(&self, event: &ProgressEvent) {
        (self.0)(event)
    }
}

/// Sink that forwards every event to several sinks in order.
#[derive(Default, Clone)]
pub struct Fanout {
    sinks: Vec<Arc<dyn Notifier>>,
}

impl Fanout {
    /// Create an empty fanout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with(mut self, sink: Arc<dyn Notifier>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of attached sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sink is attached.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Notifier for Fanout {
    fn notify(&self, event: &ProgressEvent) {
        for sink in &self.sinks {
            sink.notify(event);
        }
    }
}
