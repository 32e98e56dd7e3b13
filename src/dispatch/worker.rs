//! Writer thread loop and the state it shares with the engine.

use super::{FileTask, RunReport};
use crate::fs::{atomic_write, normalize_task_path};
use crate::progress::{EventKind, Notifier, ProgressEvent};
use crossbeam_channel::{Receiver, Sender, select};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// State shared by the engine and every writer thread.
pub(super) struct Shared {
    output_root: PathBuf,
    written: Mutex<HashSet<PathBuf>>,
    notifier: Arc<dyn Notifier>,
    submitted: AtomicUsize,
    dropped: AtomicUsize,
    writes: AtomicUsize,
    failures: AtomicUsize,
    skips: AtomicUsize,
    deferred: AtomicUsize,
}

impl Shared {
    pub(super) fn new(output_root: PathBuf, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            output_root,
            written: Mutex::new(HashSet::new()),
            notifier,
            submitted: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            skips: AtomicUsize::new(0),
            deferred: AtomicUsize::new(0),
        }
    }

    pub(super) fn notify(&self, kind: EventKind, message: impl Into<String>, path: &str) {
        self.notifier
            .notify(&ProgressEvent::new(kind, message).with_path(path));
    }

    pub(super) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a task that never reached a worker.
    pub(super) fn record_failure(&self, path: &str, reason: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.notify(EventKind::Failed, reason, path);
    }

    /// Mark `path` as written. Returns `false` if it already was.
    ///
    /// Check and insert happen under one lock acquisition.
    fn claim(&self, path: &Path) -> bool {
        let mut written = self
            .written
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        written.insert(path.to_path_buf())
    }

    /// Count a task parked on the overflow channel.
    pub(super) fn defer(&self) {
        self.deferred.fetch_add(1, Ordering::SeqCst);
    }

    /// Count a parked task that reached the queue (or was lost).
    pub(super) fn undefer(&self) {
        self.deferred.fetch_sub(1, Ordering::SeqCst);
    }

    /// Tasks parked on the overflow channel and not yet queued.
    pub(super) fn deferred(&self) -> usize {
        self.deferred.load(Ordering::SeqCst)
    }

    pub(super) fn report(&self) -> RunReport {
        RunReport {
            submitted: self.submitted.load(Ordering::Relaxed),
            written: self.writes.load(Ordering::Relaxed),
            failed: self.failures.load(Ordering::Relaxed),
            skipped: self.skips.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    /// Take one task to its terminal outcome.
    pub(super) fn process(&self, worker: usize, task: FileTask) {
        let relative = match normalize_task_path(&task.path) {
            Ok(path) => path,
            Err(e) => {
                warn!(worker, path = %task.path, error = %e, "rejected task path");
                self.record_failure(&task.path, &format!("rejected path: {}", e));
                return;
            }
        };
        let shown = relative.to_string_lossy().to_string();

        if !self.claim(&relative) {
            debug!(worker, path = %shown, "file already written, skipping");
            self.skips.fetch_add(1, Ordering::Relaxed);
            self.notify(EventKind::Skipped, "duplicate path skipped", &shown);
            return;
        }

        let target = self.output_root.join(&relative);
        match atomic_write(&target, &task.content) {
            Ok(()) => {
                info!(worker, path = %shown, bytes = task.content.len(), "wrote file");
                self.writes.fetch_add(1, Ordering::Relaxed);
                self.notify(EventKind::Written, "file written", &shown);
            }
            Err(e) => {
                warn!(worker, path = %shown, error = %e, "error writing file");
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.notify(EventKind::Failed, e.to_string(), &shown);
            }
        }
    }
}

/// Writer loop: take tasks until the queue closes or cancellation is raised.
///
/// Cancellation is signalled by dropping the cancel sender, so `recv(cancel)`
/// fires with a disconnect. Anything still buffered at that point is processed
/// before the thread exits.
pub(super) fn run(
    worker: usize,
    shared: Arc<Shared>,
    tasks: Receiver<FileTask>,
    cancel: Receiver<()>,
) {
    debug!(worker, "worker started");

    loop {
        select! {
            recv(tasks) -> msg => match msg {
                Ok(task) => shared.process(worker, task),
                Err(_) => {
                    debug!(worker, "task queue closed, exiting");
                    return;
                }
            },
            recv(cancel) -> _ => {
                for task in tasks.try_iter() {
                    shared.process(worker, task);
                }
                debug!(worker, "cancelled, exiting");
                return;
            }
        }
    }
}

/// Submitter loop: move overflow tasks into the bounded queue in order.
///
/// Blocks on the queue while it is full. Exits once the overflow channel is
/// closed and empty, dropping its queue sender with it.
pub(super) fn forward(shared: Arc<Shared>, overflow: Receiver<FileTask>, queue: Sender<FileTask>) {
    debug!("submitter started");

    for task in overflow.iter() {
        if let Err(e) = queue.send(task) {
            let task = e.into_inner();
            warn!(path = %task.path, "queue disconnected, task lost");
            shared.record_failure(&task.path, "queue disconnected");
        }
        // Only after the send, so submit() keeps routing behind parked tasks.
        shared.undefer();
    }

    debug!("overflow closed, submitter exiting");
}
