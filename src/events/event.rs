//! # Supervision events emitted by the launcher, boundary, and supervisors.
//!
//! [`EventKind`] covers three groups of supervision activity:
//! - **Lifecycle**: invocation flow (entry starting, workers spawned/finished)
//! - **Failure capture**: the boundary's failure slot (recorded, discarded)
//! - **Termination**: sweep progress (cancel requests, linger/kill warnings, summaries)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, worker
//! name and class, reasons, and counts.
//!
//! ## Ordering guarantees
//! Every event carries a monotonically increasing global sequence number (`seq`).
//! Subscribers on separate queues may observe interleavings; sort by `seq` to
//! recover the emission order.
//!
//! ## Example
//! ```rust
//! use runvisor::{Event, EventKind, WorkerClass};
//!
//! let ev = Event::new(EventKind::FailureRecorded)
//!     .with_worker("app.Main::main")
//!     .with_class(WorkerClass::Blocking)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::FailureRecorded);
//! assert_eq!(ev.worker.as_deref(), Some("app.Main::main"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::core::WorkerClass;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of supervision events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Invocation lifecycle ===
    /// Entry point resolved; its worker is about to start.
    ///
    /// Sets:
    /// - `worker`: entry worker name
    /// - `reason`: rendered argument vector
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    EntryStarting,

    /// A worker was registered and its thread is starting.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `class`: blocking or background
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    WorkerSpawned,

    /// A worker's body returned (or panicked) and it is about to report finished.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    WorkerFinished,

    // === Failure capture ===
    /// First failure stored in the boundary's failure slot.
    ///
    /// Sets:
    /// - `worker`: worker that raised it
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    FailureRecorded,

    /// A later failure arrived while the slot was already taken; logged, not stored.
    ///
    /// Sets:
    /// - `worker`: worker that raised it
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    FailureDiscarded,

    // === Supervision ===
    /// The invoking context was cancelled while a supervisor was waiting on workers.
    ///
    /// Never aborts supervision; emitted at most once per supervision phase.
    ///
    /// Sets:
    /// - `reason`: what was being waited on
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JoinInterrupted,

    // === Termination sweep ===
    /// Cooperative cancellation signalled to a worker (idempotent).
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CancelRequested,

    /// Worker exhausted the sweep budget and will be left running.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `timeout_ms`: the shared budget that expired
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    WorkerWillLinger,

    /// Forced termination was attempted on an uncooperative worker.
    ///
    /// Emitted regardless of the attempt's outcome.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `reason`: outcome label (`killed`, `unsupported`, failure text)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ForceKillAttempted,

    /// Sweep finished with workers classified uncooperative.
    ///
    /// Sets:
    /// - `count`: number of uncooperative workers
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    UncooperativeSummary,

    /// Sweep finished cleanly yet a fresh snapshot still reports live workers.
    ///
    /// Harmless enumeration race (a worker spawned after the final snapshot),
    /// not a correctness failure.
    ///
    /// Sets:
    /// - `count`: number of residual workers
    /// - `worker`: one example worker name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ResidualWorkers,
}

/// Supervision event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Name of the worker, if applicable.
    pub worker: Option<Arc<str>>,
    /// Worker classification, if applicable.
    pub class: Option<WorkerClass>,
    /// Human-readable reason (failure messages, outcomes, argument previews).
    pub reason: Option<Arc<str>>,
    /// Expired budget in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Aggregate worker count (summaries, residual diagnostics).
    pub count: Option<u32>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            worker: None,
            class: None,
            reason: None,
            timeout_ms: None,
            count: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a worker classification.
    #[inline]
    pub fn with_class(mut self, class: WorkerClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a budget duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches an aggregate worker count.
    #[inline]
    pub fn with_count(mut self, n: u32) -> Self {
        self.count = Some(n);
        self
    }
}
