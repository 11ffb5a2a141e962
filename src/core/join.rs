//! # Join supervision - drains the blocking worker set.
//!
//! [`wait_for_blocking`] keeps the invocation open until every blocking-class
//! worker has finished, re-snapshotting after each pass because workers may
//! spawn further workers while being waited for.
//!
//! ## Rules
//! - Only blocking-class workers gate the wait; background workers are left
//!   to the termination sweep.
//! - Each pass waits for one snapshot untimed, then takes a fresh snapshot.
//!   The loop ends on the first empty snapshot.
//! - A blocking worker spawned after that final empty snapshot is not waited
//!   for. The window is narrow and the termination sweep still reaches such
//!   stragglers.
//! - Interruption is advisory. The first time the interrupt token is observed
//!   cancelled, one `JoinInterrupted` warning is emitted; waiting continues
//!   and the token stays cancelled for downstream observers.

use tokio_util::sync::CancellationToken;

use crate::core::boundary::Boundary;
use crate::core::registry::WorkerClass;
use crate::events::{Event, EventKind};

/// Waits until no blocking-class worker is live.
///
/// `interrupt` is observed between waits, never aborts them.
pub(crate) fn wait_for_blocking(boundary: &Boundary, interrupt: Option<&CancellationToken>) {
    let mut noted = false;
    loop {
        let blocking = boundary.registry().live_of(WorkerClass::Blocking);
        if blocking.is_empty() {
            return;
        }
        note_interrupt(boundary, interrupt, &mut noted, "join");
        for worker in &blocking {
            worker.await_finished(None);
        }
        // A cancel that landed during the waits above is still noted before
        // the next snapshot can end the loop.
        note_interrupt(boundary, interrupt, &mut noted, "join");
    }
}

/// Emits one `JoinInterrupted` warning per supervision phase.
///
/// `noted` is the per-phase latch; the token is left cancelled.
pub(crate) fn note_interrupt(
    boundary: &Boundary,
    interrupt: Option<&CancellationToken>,
    noted: &mut bool,
    phase: &str,
) {
    if *noted {
        return;
    }
    if let Some(token) = interrupt
        && token.is_cancelled()
    {
        *noted = true;
        boundary.emit(Event::new(EventKind::JoinInterrupted).with_reason(phase));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::core::boundary::WorkerCtx;
    use crate::error::WorkerError;
    use crate::subscribers::{Recorder, Subscribe, SubscriberSet};

    fn harness(name: &str) -> (Arc<Boundary>, Recorder, Arc<SubscriberSet>) {
        let recorder = Recorder::new();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(recorder.clone())];
        let set = Arc::new(SubscriberSet::new(subs));
        (Boundary::new(name, Arc::clone(&set)), recorder, set)
    }

    #[test]
    fn test_drains_every_blocking_worker() {
        for count in [0usize, 1, 2, 5, 16] {
            let (boundary, _recorder, set) = harness("drain");
            let done = Arc::new(AtomicUsize::new(0));

            for i in 0..count {
                let done = Arc::clone(&done);
                boundary
                    .spawn(
                        Arc::from(format!("worker-{i}")),
                        WorkerClass::Blocking,
                        move |_ctx: &WorkerCtx| {
                            thread::sleep(Duration::from_millis(5));
                            done.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        },
                    )
                    .expect("spawn must succeed");
            }

            wait_for_blocking(&boundary, None);

            assert_eq!(
                done.load(Ordering::SeqCst),
                count,
                "all {count} blocking workers must finish before the join returns"
            );
            assert!(
                boundary.registry().live_of(WorkerClass::Blocking).is_empty(),
                "no blocking worker may remain live"
            );
            set.shutdown();
        }
    }

    #[test]
    fn test_waits_for_workers_spawned_while_waiting() {
        let (boundary, _recorder, set) = harness("chain");
        let done = Arc::new(AtomicUsize::new(0));

        let chained = Arc::clone(&done);
        boundary
            .spawn(
                Arc::from("first"),
                WorkerClass::Blocking,
                move |ctx: &WorkerCtx| {
                    thread::sleep(Duration::from_millis(20));
                    let done = Arc::clone(&chained);
                    ctx.spawn("second", WorkerClass::Blocking, move |_ctx: &WorkerCtx| {
                        thread::sleep(Duration::from_millis(20));
                        done.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })?;
                    chained.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )
            .expect("spawn must succeed");

        wait_for_blocking(&boundary, None);

        assert_eq!(
            done.load(Ordering::SeqCst),
            2,
            "the worker spawned mid-join must be waited for too"
        );
        set.shutdown();
    }

    #[test]
    fn test_background_workers_do_not_gate_the_join() {
        let (boundary, _recorder, set) = harness("bg");

        boundary
            .spawn(
                Arc::from("lingering"),
                WorkerClass::Background,
                |ctx: &WorkerCtx| {
                    let patience = Instant::now() + Duration::from_secs(2);
                    while !ctx.is_cancelled() && Instant::now() < patience {
                        thread::sleep(Duration::from_millis(5));
                    }
                    Err(WorkerError::Canceled)
                },
            )
            .expect("spawn must succeed");
        boundary
            .spawn(Arc::from("quick"), WorkerClass::Blocking, |_ctx: &WorkerCtx| {
                thread::sleep(Duration::from_millis(10));
                Ok(())
            })
            .expect("spawn must succeed");

        let started = Instant::now();
        wait_for_blocking(&boundary, None);
        let elapsed = started.elapsed();

        assert!(
            elapsed < Duration::from_millis(500),
            "join must not wait for the background worker, took {elapsed:?}"
        );
        let live = boundary.registry().live_of(WorkerClass::Background);
        assert_eq!(live.len(), 1, "background worker must still be running");

        live[0].cancel_token().cancel();
        assert!(
            live[0].await_finished(Some(Duration::from_secs(5))),
            "background worker must exit once cancelled"
        );
        set.shutdown();
    }

    #[test]
    fn test_interrupt_is_noted_once_and_waiting_continues() {
        let (boundary, recorder, set) = harness("interrupt");
        let token = CancellationToken::new();
        token.cancel();

        let done = Arc::new(AtomicUsize::new(0));
        for i in 0..2 {
            let done = Arc::clone(&done);
            boundary
                .spawn(
                    Arc::from(format!("worker-{i}")),
                    WorkerClass::Blocking,
                    move |_ctx: &WorkerCtx| {
                        // Long enough that the first snapshot reliably sees both live.
                        thread::sleep(Duration::from_millis(100));
                        done.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    },
                )
                .expect("spawn must succeed");
        }

        wait_for_blocking(&boundary, Some(&token));
        set.shutdown();

        assert_eq!(done.load(Ordering::SeqCst), 2, "interrupt must not abort the join");
        assert_eq!(
            recorder.count_of(EventKind::JoinInterrupted),
            1,
            "the interrupt is noted exactly once"
        );
        assert!(token.is_cancelled(), "the token must stay cancelled");
    }
}
