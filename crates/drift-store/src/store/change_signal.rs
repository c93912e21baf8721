//! Broadcast change signal fired after every committed mutation.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 256;

/// In-process change notification.
///
/// Carries no payload: subscribers re-query the store for current state,
/// so a coalesced or lagged signal loses nothing. `notify` never awaits;
/// slow receivers lag and are dropped rather than blocking the writer.
pub struct ChangeSignal {
    tx: broadcast::Sender<()>,
    notify_count: AtomicU64,
}

impl ChangeSignal {
    /// Create a signal with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a signal with a custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            notify_count: AtomicU64::new(0),
        }
    }

    /// Fire the signal. Non-blocking.
    ///
    /// Returns the number of receivers that observed it, 0 if none.
    pub fn notify(&self) -> usize {
        let _ = self.notify_count.fetch_add(1, Ordering::Relaxed);
        self.tx.send(()).unwrap_or(0)
    }

    /// Subscribe. The receiver observes every signal fired after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Total signals fired since creation.
    pub fn notify_count(&self) -> u64 {
        self.notify_count.load(Ordering::Relaxed)
    }
}

impl Default for ChangeSignal {
    fn default() -> Self {
        Self::new()
    }
}
