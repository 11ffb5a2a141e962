//! # Stateful subscriber that captures the event stream.
//!
//! [`Recorder`] keeps every delivered [`Event`] in memory for later inspection.
//! Useful for assertions in tests and for embedders that want to examine what
//! a finished invocation did (which workers lingered, what was discarded).
//!
//! ## Architecture
//! ```text
//!  Launcher / Boundary ── emit(Event) ──► SubscriberSet
//!                                              │
//!                                    worker thread (recorder)
//!                                              │
//!                                              ▼
//!                              Recorder (Vec<Event> behind Mutex)
//!
//! After Launcher::shutdown() (flush point):
//!   recorder.snapshot() ──► Vec<Event> in delivery order
//! ```
//!
//! ## Example
//! ```rust
//! use runvisor::{Event, EventKind, Recorder, Subscribe};
//!
//! let rec = Recorder::new();
//! rec.on_event(&Event::new(EventKind::WorkerSpawned));
//! assert_eq!(rec.count_of(EventKind::WorkerSpawned), 1);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::{Event, EventKind};

/// Records every event it receives, in delivery order.
///
/// Thread-safe and cloneable - multiple references share the same internal state.
/// Delivery runs on the recorder's dedicated worker thread; call
/// [`SubscriberSet::shutdown`](crate::SubscriberSet::shutdown) (or
/// [`Launcher::shutdown`](crate::Launcher::shutdown)) before reading when the
/// producing side has finished, to make the snapshot complete.
#[derive(Clone)]
pub struct Recorder {
    inner: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    /// Creates a new, empty recorder.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a copy of all recorded events in delivery order.
    pub fn snapshot(&self) -> Vec<Event> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events of the given kind.
    pub fn count_of(&self, kind: EventKind) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Worker names attached to recorded events of the given kind.
    pub fn workers_of(&self, kind: EventKind) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.worker.as_deref().map(str::to_string))
            .collect()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::subscribers::Subscribe for Recorder {
    fn on_event(&self, event: &Event) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::Subscribe;

    #[test]
    fn test_counts_and_worker_names() {
        let rec = Recorder::new();
        rec.on_event(&Event::new(EventKind::WorkerSpawned).with_worker("a"));
        rec.on_event(&Event::new(EventKind::WorkerSpawned).with_worker("b"));
        rec.on_event(&Event::new(EventKind::WorkerWillLinger).with_worker("b"));

        assert_eq!(rec.count_of(EventKind::WorkerSpawned), 2);
        assert_eq!(rec.count_of(EventKind::WorkerWillLinger), 1);
        assert_eq!(rec.count_of(EventKind::ForceKillAttempted), 0);
        assert_eq!(rec.workers_of(EventKind::WorkerSpawned), vec!["a", "b"]);

        rec.clear();
        assert!(rec.snapshot().is_empty());
    }
}
