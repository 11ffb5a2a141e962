//! # Worker registry - liveness authority for launched threads.
//!
//! Every OS thread the launcher creates is recorded here *before* it starts,
//! so supervision snapshots can never miss a worker that is about to run.
//!
//! ## Architecture
//! ```text
//! Registry
//!   ├─► register(name, class, token) ──► Arc<Worker>   (before the thread starts)
//!   ├─► live() ────────────────────────► workers whose phase is still Running
//!   └─► live_of(class) ────────────────► live workers filtered by class
//! ```
//!
//! ## Rules
//! - Registration happens before `thread::spawn`, never after.
//! - Entries are never removed; [`Worker::is_finished`] is the liveness
//!   authority and the live views filter on it.
//! - Threads are detached. The per-worker phase flag plus condvar stands in
//!   for a join handle and supports both untimed and timed waits.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Classification of a launched worker.
///
/// Blocking workers hold the invocation open: the launcher waits for all of
/// them before supervision moves on. Background workers never gate the wait
/// phase but are still cancelled and swept during cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerClass {
    /// Waited for during the join phase.
    Blocking,
    /// Ignored by the join phase, swept during cleanup.
    Background,
}

impl WorkerClass {
    /// Returns the class as a short lowercase label.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerClass::Blocking => "blocking",
            WorkerClass::Background => "background",
        }
    }
}

/// Registry-scoped worker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkerId(u64);

impl WorkerId {
    /// Returns the numeric value of the identifier.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

enum Phase {
    Running,
    Finished,
}

/// One launched worker thread: identity, class, cancellation, and phase.
///
/// The underlying OS thread is detached; waiting happens through
/// [`await_finished`](Worker::await_finished), which the thread releases by
/// calling `mark_finished` as its very last step. The finish event is emitted
/// before `mark_finished`, so an observer that sees `is_finished() == true`
/// can rely on the worker's events being enqueued already.
pub struct Worker {
    id: WorkerId,
    name: Arc<str>,
    class: WorkerClass,
    cancel: CancellationToken,
    phase: Mutex<Phase>,
    cond: Condvar,
}

impl Worker {
    /// Returns the registry-scoped identifier.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Returns the worker name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the worker classification.
    pub fn class(&self) -> WorkerClass {
        self.class
    }

    /// Returns true once the worker thread has run to completion.
    pub fn is_finished(&self) -> bool {
        matches!(
            *self.phase.lock().unwrap_or_else(PoisonError::into_inner),
            Phase::Finished
        )
    }

    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Flips the phase to finished and wakes every waiter.
    ///
    /// Called exactly once, as the last step of the worker thread.
    pub(crate) fn mark_finished(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        *phase = Phase::Finished;
        drop(phase);
        self.cond.notify_all();
    }

    /// Blocks until the worker finishes, or until `timeout` elapses.
    ///
    /// Returns true if the worker finished within the wait. `None` waits
    /// without bound.
    pub(crate) fn await_finished(&self, timeout: Option<Duration>) -> bool {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        match timeout {
            None => {
                while matches!(*phase, Phase::Running) {
                    phase = self
                        .cond
                        .wait(phase)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                true
            }
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                loop {
                    if matches!(*phase, Phase::Finished) {
                        return true;
                    }
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return false;
                    }
                    let (next, _timed_out) = self
                        .cond
                        .wait_timeout(phase, remaining)
                        .unwrap_or_else(PoisonError::into_inner);
                    phase = next;
                }
            }
        }
    }
}

/// Registry of every worker the launcher has created.
pub struct Registry {
    workers: Mutex<Vec<Arc<Worker>>>,
    next_id: AtomicU64,
}

impl Registry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            workers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Records a worker and returns its handle.
    ///
    /// Must be called before the worker's thread is spawned.
    pub(crate) fn register(
        &self,
        name: Arc<str>,
        class: WorkerClass,
        cancel: CancellationToken,
    ) -> Arc<Worker> {
        let id = WorkerId(self.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        let worker = Arc::new(Worker {
            id,
            name,
            class,
            cancel,
            phase: Mutex::new(Phase::Running),
            cond: Condvar::new(),
        });
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&worker));
        worker
    }

    /// Returns a snapshot of workers that have not finished yet.
    pub fn live(&self) -> Vec<Arc<Worker>> {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|w| !w.is_finished())
            .cloned()
            .collect()
    }

    /// Returns a snapshot of live workers of the given class.
    pub fn live_of(&self, class: WorkerClass) -> Vec<Arc<Worker>> {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|w| w.class() == class && !w.is_finished())
            .cloned()
            .collect()
    }

    /// Returns how many workers were ever registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no worker was ever registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(reg: &Registry, name: &str, class: WorkerClass) -> Arc<Worker> {
        reg.register(Arc::from(name), class, CancellationToken::new())
    }

    #[test]
    fn test_register_assigns_unique_ids_and_keeps_entries() {
        let reg = Registry::new();
        let a = register(&reg, "a", WorkerClass::Blocking);
        let b = register(&reg, "b", WorkerClass::Background);

        assert_ne!(a.id(), b.id(), "ids must be unique");
        assert_eq!(reg.len(), 2);

        a.mark_finished();
        assert_eq!(reg.len(), 2, "finished workers stay registered");
        assert_eq!(reg.live().len(), 1, "live view filters finished workers");
        assert_eq!(reg.live()[0].name(), "b");
    }

    #[test]
    fn test_live_of_filters_by_class_and_phase() {
        let reg = Registry::new();
        register(&reg, "main", WorkerClass::Blocking);
        let bg = register(&reg, "ticker", WorkerClass::Background);
        let done = register(&reg, "worker-2", WorkerClass::Blocking);
        done.mark_finished();

        let blocking = reg.live_of(WorkerClass::Blocking);
        assert_eq!(blocking.len(), 1);
        assert_eq!(blocking[0].name(), "main");

        let background = reg.live_of(WorkerClass::Background);
        assert_eq!(background.len(), 1);
        assert_eq!(background[0].id(), bg.id());
    }

    #[test]
    fn test_await_finished_times_out_then_observes_finish() {
        let reg = Registry::new();
        let worker = register(&reg, "slow", WorkerClass::Blocking);

        assert!(
            !worker.await_finished(Some(Duration::from_millis(20))),
            "running worker must time out"
        );

        let waited = Arc::clone(&worker);
        let waiter = std::thread::spawn(move || waited.await_finished(None));
        std::thread::sleep(Duration::from_millis(20));
        worker.mark_finished();

        assert!(waiter.join().expect("waiter must not panic"));
        assert!(worker.await_finished(Some(Duration::ZERO)), "finished worker returns immediately");
    }
}
