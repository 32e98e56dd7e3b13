use crate::progress::{EventKind, Notifier, ProgressEvent};
use crate::query::{CodeQuery, QueryError, QueryResponse};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Notifier that keeps every event it sees.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<ProgressEvent> {
        lock(&self.events).clone()
    }

    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        lock(&self.events).iter().map(|e| e.kind).collect()
    }

    pub(crate) fn count(&self, kind: EventKind) -> usize {
        lock(&self.events).iter().filter(|e| e.kind == kind).count()
    }

    /// Paths of events of `kind`, in arrival order.
    pub(crate) fn paths(&self, kind: EventKind) -> Vec<String> {
        lock(&self.events)
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.path.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &ProgressEvent) {
        lock(&self.events).push(event.clone());
    }
}

/// Scripted model that returns a fixed reply and records its prompts.
pub(crate) struct StubQuery {
    reply: Result<String, QueryError>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubQuery {
    pub(crate) fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: QueryError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(system_prompt, user_prompt)` pairs received so far.
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }
}

impl CodeQuery for StubQuery {
    fn query(&self, system_prompt: &str, user_prompt: &str) -> Result<QueryResponse, QueryError> {
        lock(&self.calls).push((system_prompt.to_string(), user_prompt.to_string()));
        self.reply.clone().map(|primary_text| QueryResponse { primary_text })
    }
}
