//! Engine lifecycle: start, submit, stop.

use super::worker::{self, Shared};
use super::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, EngineError, FileTask};
use crate::progress::{EventKind, Notifier};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Construction parameters for an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Directory every task path is resolved against.
    pub output_root: PathBuf,
    /// Number of writer threads. Zero is raised to one.
    pub worker_count: usize,
    /// Queue capacity. Zero is raised to one.
    pub queue_capacity: usize,
}

impl EngineOptions {
    /// Options with default worker count and queue capacity.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

/// Lifecycle state of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Created,
    Running,
    Draining,
    Stopped,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EngineState::Created => "created",
            EngineState::Running => "running",
            EngineState::Draining => "draining",
            EngineState::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// Outcome counters for one run.
///
/// After [`Engine::stop`], `written + failed + skipped == submitted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Tasks accepted by `submit`.
    pub submitted: usize,
    /// Files written.
    pub written: usize,
    /// Tasks that failed (rejected path or I/O error).
    pub failed: usize,
    /// Tasks skipped because their path was already written.
    pub skipped: usize,
    /// Tasks submitted after the queue closed.
    pub dropped: usize,
}

impl RunReport {
    /// Tasks that reached a terminal outcome.
    pub fn completed(&self) -> usize {
        self.written + self.failed + self.skipped
    }
}

/// Bounded queue plus a fixed pool of writer threads.
///
/// One engine serves one generation run. Notifiers passed to an engine must
/// not call back into it.
pub struct Engine {
    shared: Arc<Shared>,
    worker_count: usize,
    tasks: Receiver<FileTask>,
    sender: Mutex<Option<Senders>>,
    overflow_rx: Receiver<FileTask>,
    cancel_rx: Receiver<()>,
    cancel: Mutex<Option<Sender<()>>>,
    submitter: Mutex<Option<JoinHandle<()>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    state: Mutex<EngineState>,
    stopping: Mutex<()>,
}

/// Both ends `submit` writes to. Dropping them closes the queue.
struct Senders {
    queue: Sender<FileTask>,
    overflow: Sender<FileTask>,
}

impl Engine {
    /// Allocate the queue. No threads are spawned until [`Engine::start`].
    pub fn new(options: EngineOptions, notifier: Arc<dyn Notifier>) -> Self {
        let (queue, tasks) = bounded(options.queue_capacity.max(1));
        let (overflow, overflow_rx) = unbounded();
        let (cancel, cancel_rx) = bounded(0);

        Self {
            shared: Arc::new(Shared::new(options.output_root, notifier)),
            worker_count: options.worker_count.max(1),
            tasks,
            sender: Mutex::new(Some(Senders { queue, overflow })),
            overflow_rx,
            cancel_rx,
            cancel: Mutex::new(Some(cancel)),
            submitter: Mutex::new(None),
            workers: Mutex::new(Vec::new()),
            state: Mutex::new(EngineState::Created),
            stopping: Mutex::new(()),
        }
    }

    pub fn state(&self) -> EngineState {
        *lock(&self.state)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Counters so far. Final only once [`Engine::stop`] has returned.
    pub fn report(&self) -> RunReport {
        self.shared.report()
    }

    /// Spawn the submitter thread and the writer threads.
    pub fn start(&self) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        if *state != EngineState::Created {
            return Err(EngineError::AlreadyStarted(*state));
        }

        // Running even on a partial spawn so stop() joins what did start.
        *state = EngineState::Running;
        info!(workers = self.worker_count, "starting writer threads");

        let queue = lock(&self.sender)
            .as_ref()
            .map(|senders| senders.queue.clone());
        if let Some(queue) = queue {
            let shared = Arc::clone(&self.shared);
            let overflow = self.overflow_rx.clone();
            let handle = thread::Builder::new()
                .name("submitter".to_string())
                .spawn(move || worker::forward(shared, overflow, queue))
                .map_err(|e| EngineError::Spawn(e.to_string()))?;
            *lock(&self.submitter) = Some(handle);
        }

        let mut workers = lock(&self.workers);
        for id in 0..self.worker_count {
            let shared = Arc::clone(&self.shared);
            let tasks = self.tasks.clone();
            let cancel = self.cancel_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("writer-{}", id))
                .spawn(move || worker::run(id, shared, tasks, cancel))
                .map_err(|e| EngineError::Spawn(e.to_string()))?;
            workers.push(handle);
        }

        Ok(())
    }

    /// Queue a task without blocking the caller.
    ///
    /// When the queue is full the task is parked on an unbounded overflow
    /// channel that the submitter thread feeds into the queue in order. While
    /// anything is parked, new tasks queue up behind it. After
    /// [`Engine::stop`] has begun, tasks are dropped with a warning.
    pub fn submit(&self, task: FileTask) {
        let sender = lock(&self.sender);
        let Some(senders) = sender.as_ref() else {
            warn!(path = %task.path, "queue closed, dropping task");
            self.shared.record_dropped();
            return;
        };

        let path = task.path.clone();
        self.shared.record_submitted();
        self.shared.notify(EventKind::Enqueued, "task queued", &path);

        let task = if self.shared.deferred() > 0 {
            task
        } else {
            match senders.queue.try_send(task) {
                Ok(()) => return,
                Err(TrySendError::Full(task)) => task,
                Err(TrySendError::Disconnected(_)) => {
                    warn!(path = %path, "queue disconnected, task lost");
                    self.shared.record_failure(&path, "queue disconnected");
                    return;
                }
            }
        };

        debug!(path = %path, "queue full, deferring task to submitter");
        self.shared.defer();
        if senders.overflow.send(task).is_err() {
            self.shared.undefer();
            warn!(path = %path, "overflow channel disconnected, task lost");
            self.shared.record_failure(&path, "overflow channel disconnected");
        }
    }

    /// Close the queue, drain it, and join every thread.
    ///
    /// Returns once every task accepted before this call has reached a
    /// terminal outcome. Calling it again returns the same report.
    pub fn stop(&self) -> RunReport {
        let _stopping = lock(&self.stopping);

        match self.state() {
            EngineState::Stopped => return self.shared.report(),
            EngineState::Created => {
                if let Err(e) = self.start() {
                    warn!(error = %e, "could not start writer threads before draining");
                }
            }
            EngineState::Running | EngineState::Draining => {}
        }

        *lock(&self.state) = EngineState::Draining;
        debug!("closing task queue");
        drop(lock(&self.sender).take());

        let submitter = lock(&self.submitter).take();
        let workers = std::mem::take(&mut *lock(&self.workers));

        match submitter {
            Some(handle) => {
                if workers.is_empty() {
                    // Ends once the submitter exits and drops the last sender.
                    warn!("no writer threads running, draining on the calling thread");
                    for task in self.tasks.iter() {
                        self.shared.process(0, task);
                    }
                }
                debug!("waiting for submitter thread");
                if handle.join().is_err() {
                    warn!("submitter thread panicked");
                }
            }
            None => {
                warn!("no submitter thread running, draining on the calling thread");
                for task in self.tasks.try_iter().chain(self.overflow_rx.try_iter()) {
                    self.shared.process(0, task);
                }
            }
        }

        drop(lock(&self.cancel).take());

        for handle in workers {
            if handle.join().is_err() {
                warn!("writer thread panicked");
            }
        }

        *lock(&self.state) = EngineState::Stopped;
        let report = self.shared.report();
        info!(
            written = report.written,
            failed = report.failed,
            skipped = report.skipped,
            dropped = report.dropped,
            "engine stopped"
        );
        report
    }

    /// Tasks waiting on the overflow channel.
    #[cfg(test)]
    pub(super) fn deferred(&self) -> usize {
        self.shared.deferred()
    }

    /// Threads this engine has spawned and not yet joined.
    #[cfg(test)]
    pub(super) fn thread_count(&self) -> usize {
        lock(&self.workers).len() + usize::from(lock(&self.submitter).is_some())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.state() != EngineState::Stopped {
            self.stop();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}
