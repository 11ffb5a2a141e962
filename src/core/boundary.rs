//! # Invocation boundary - failure slot and worker spawning.
//!
//! Every invocation gets one [`Boundary`]. It owns the worker [`Registry`],
//! the first-failure slot, and the cancellation root whose children become
//! per-worker tokens. Workers are spawned only through the boundary, so
//! registration, event emission, failure routing, and phase transitions
//! always happen in the same order.
//!
//! ## Architecture
//! ```text
//! Boundary::spawn(name, class, body)
//!   ├─► Registry.register(..)           (record exists before the thread)
//!   ├─► emit WorkerSpawned
//!   └─► thread::Builder::spawn(harness)
//!           │
//!           └─► harness: body(&ctx)
//!                 ├─► Err / panic ──► record_failure(..)
//!                 ├─► emit WorkerFinished
//!                 └─► mark_finished()    (always last)
//! ```
//!
//! ## Rules
//! - Registration precedes the thread start, so supervision snapshots never
//!   miss a worker that is about to run.
//! - The failure slot keeps the first non-benign cause. Later causes are
//!   discarded with a `FailureDiscarded` event.
//! - Benign causes (voluntary termination after observing cancellation) are
//!   filtered silently and never occupy the slot.
//! - `mark_finished` is the harness's final step and runs after the finish
//!   event is emitted, so `is_finished()` implies the worker's events are
//!   already enqueued.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tokio_util::sync::CancellationToken;

use crate::core::registry::{Registry, Worker, WorkerClass, WorkerId};
use crate::error::{InvokeError, WorkerError};
use crate::events::{Event, EventKind};
use crate::subscribers::SubscriberSet;

/// Isolation boundary for one invocation.
pub struct Boundary {
    name: Arc<str>,
    registry: Registry,
    failure: Mutex<Option<InvokeError>>,
    subs: Arc<SubscriberSet>,
    cancel_root: CancellationToken,
}

impl Boundary {
    /// Creates a boundary named after the entry symbol it hosts.
    pub(crate) fn new(name: impl Into<Arc<str>>, subs: Arc<SubscriberSet>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            registry: Registry::new(),
            failure: Mutex::new(None),
            subs,
            cancel_root: CancellationToken::new(),
        })
    }

    /// Returns the boundary name (the entry symbol).
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Returns the worker registry.
    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Emits an event through the subscriber pipeline.
    pub(crate) fn emit(&self, event: Event) {
        self.subs.emit(&event);
    }

    /// Registers a worker and starts its thread.
    ///
    /// The registry record and the `WorkerSpawned` event both precede the
    /// thread start. If the OS refuses the thread, the record is marked
    /// finished again (no finish event, the worker never ran) and the error
    /// is returned to the caller.
    pub(crate) fn spawn<F>(
        self: &Arc<Self>,
        name: Arc<str>,
        class: WorkerClass,
        body: F,
    ) -> std::io::Result<WorkerId>
    where
        F: FnOnce(&WorkerCtx) -> Result<(), WorkerError> + Send + 'static,
    {
        let worker = self
            .registry
            .register(Arc::clone(&name), class, self.cancel_root.child_token());
        self.emit(
            Event::new(EventKind::WorkerSpawned)
                .with_worker(Arc::clone(&name))
                .with_class(class),
        );

        let ctx = WorkerCtx {
            boundary: Arc::clone(self),
            worker: Arc::clone(&worker),
        };
        let spawned = thread::Builder::new()
            .name(format!("runvisor-{name}"))
            .spawn(move || harness(ctx, body));

        match spawned {
            Ok(_detached) => Ok(worker.id()),
            Err(err) => {
                worker.mark_finished();
                Err(err)
            }
        }
    }

    /// Routes a worker failure into the first-failure slot.
    ///
    /// Benign causes are dropped silently. Otherwise the slot keeps the first
    /// cause and every later one is discarded, each outcome with its event.
    pub(crate) fn record_failure(&self, worker: &str, cause: InvokeError) {
        if cause.is_benign() {
            return;
        }

        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        let kind = if slot.is_none() {
            *slot = Some(cause.clone());
            EventKind::FailureRecorded
        } else {
            EventKind::FailureDiscarded
        };
        drop(slot);

        self.emit(
            Event::new(kind)
                .with_worker(worker)
                .with_reason(cause.as_message()),
        );
    }

    /// Returns a clone of the recorded failure, if any.
    pub(crate) fn current_failure(&self) -> Option<InvokeError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Runs the worker body, routes its outcome, and closes the phase.
fn harness<F>(ctx: WorkerCtx, body: F)
where
    F: FnOnce(&WorkerCtx) -> Result<(), WorkerError> + Send + 'static,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| body(&ctx)));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(cause)) => ctx.boundary.record_failure(
            ctx.worker.name(),
            InvokeError::Invocation {
                worker: ctx.worker.name().to_string(),
                cause,
            },
        ),
        Err(payload) => ctx.boundary.record_failure(
            ctx.worker.name(),
            InvokeError::Invocation {
                worker: ctx.worker.name().to_string(),
                cause: WorkerError::Panic {
                    message: panic_message(payload),
                },
            },
        ),
    }
    ctx.boundary.emit(
        Event::new(EventKind::WorkerFinished).with_worker(ctx.worker.name_arc()),
    );
    ctx.worker.mark_finished();
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Per-worker execution context handed to every worker body.
///
/// Carries the worker's own cancellation token and the boundary, so entry
/// code can poll for cancellation and spawn further supervised workers.
///
/// ## Example
/// ```rust,no_run
/// use runvisor::{WorkerClass, WorkerCtx, WorkerError};
///
/// fn entry(ctx: &WorkerCtx, _args: &[String]) -> Result<(), WorkerError> {
///     ctx.spawn("ticker", WorkerClass::Background, |ctx| {
///         while !ctx.is_cancelled() {
///             std::thread::sleep(std::time::Duration::from_millis(10));
///         }
///         Err(WorkerError::Canceled)
///     })?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct WorkerCtx {
    boundary: Arc<Boundary>,
    worker: Arc<Worker>,
}

impl WorkerCtx {
    /// Returns this worker's identifier.
    pub fn id(&self) -> WorkerId {
        self.worker.id()
    }

    /// Returns this worker's name.
    pub fn name(&self) -> &str {
        self.worker.name()
    }

    /// Returns this worker's classification.
    pub fn class(&self) -> WorkerClass {
        self.worker.class()
    }

    /// Returns true once cancellation was requested for this worker.
    pub fn is_cancelled(&self) -> bool {
        self.worker.cancel_token().is_cancelled()
    }

    /// Returns a clone of this worker's cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.worker.cancel_token().clone()
    }

    /// Spawns a further supervised worker inside the same boundary.
    ///
    /// The new worker is registered before its thread starts and inherits a
    /// child of the boundary's cancellation root, not of this worker's token.
    pub fn spawn<F>(
        &self,
        name: impl Into<Arc<str>>,
        class: WorkerClass,
        body: F,
    ) -> std::io::Result<WorkerId>
    where
        F: FnOnce(&WorkerCtx) -> Result<(), WorkerError> + Send + 'static,
    {
        self.boundary.spawn(name.into(), class, body)
    }

    /// Builds a context that is not backed by a running thread.
    #[cfg(test)]
    pub(crate) fn detached_for_tests() -> WorkerCtx {
        let boundary = Boundary::new("detached", Arc::new(SubscriberSet::new(Vec::new())));
        let worker = boundary.registry.register(
            Arc::from("detached-worker"),
            WorkerClass::Blocking,
            boundary.cancel_root.child_token(),
        );
        WorkerCtx { boundary, worker }
    }
}
