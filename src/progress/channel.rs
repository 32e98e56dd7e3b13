//! Bounded, lossy channel sink.

use super::{Notifier, ProgressEvent};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Sink that hands events to a consumer thread through a bounded channel.
///
/// `notify` never blocks: when the buffer is full, or the receiver is gone,
/// the event is dropped and counted.
pub struct ChannelNotifier {
    sender: Sender<ProgressEvent>,
    dropped: AtomicU64,
}

impl ChannelNotifier {
    /// Create a sink with room for `capacity` pending events, returning the
    /// receiving end for the subscriber.
    pub fn new(capacity: usize) -> (Self, Receiver<ProgressEvent>) {
        let (sender, receiver) = bounded(capacity.max(1));
        (
            Self {
                sender,
                dropped: AtomicU64::new(0),
            },
            receiver,
        )
    }

    /// Number of events dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: &ProgressEvent) {
        match self.sender.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) | Err(TrySendError::Disconnected(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                trace!(kind = %event.kind, "progress subscriber behind, event dropped");
            }
        }
    }
}
