//! # Termination sweep - cancel, drain, classify leftovers.
//!
//! After the join phase the boundary may still hold live workers (background
//! class, or blocking stragglers from the late-spawn window). [`sweep`]
//! cancels them all and waits them out under one shared time budget.
//!
//! ## Architecture
//! ```text
//! sweep(boundary, cfg, killer, interrupt)
//!   └─► round:  snapshot live, minus workers already uncooperative
//!         ├─► empty ──► done (summary / residual diagnostic)
//!         ├─► cancel each + CancelRequested
//!         └─► per worker: wait with (join_timeout − elapsed)
//!               ├─► finished ──► joined
//!               └─► still running ──► uncooperative (final), then one of:
//!                     ├─► cfg.force_kill ──► ForceKillAttempted(outcome)
//!                     └─► otherwise ──────► WorkerWillLinger
//! ```
//!
//! ## Rules
//! - One `Instant` captured at entry anchors the budget; every round draws
//!   from the same remaining time.
//! - A worker classified uncooperative is never waited on or cancelled again.
//! - `join_timeout == ZERO` means unbounded: waits never expire, so nothing
//!   is ever classified uncooperative.
//! - Rounds repeat because cancelled workers may spawn successors on their
//!   way out; each round picks up what the previous snapshot missed.
//! - Force-kill outcomes are logged, never raised. A failed or unsupported
//!   attempt still retires the worker from the sweep.

use std::collections::HashSet;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::config::LaunchConfig;
use crate::core::boundary::Boundary;
use crate::core::join::note_interrupt;
use crate::core::kill::ForceKill;
use crate::events::{Event, EventKind};

/// Aggregate outcome of one termination sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SweepStats {
    /// Workers that finished during the sweep.
    pub joined: usize,
    /// Workers that outlived the budget and were left behind.
    pub uncooperative: usize,
    /// Forced termination attempts (at most one per uncooperative worker).
    pub forced: usize,
}

/// Cancels and drains every live worker, classifying the stubborn ones.
pub(crate) fn sweep(
    boundary: &Boundary,
    cfg: &LaunchConfig,
    killer: &dyn ForceKill,
    interrupt: Option<&CancellationToken>,
) -> SweepStats {
    let start = Instant::now();
    let budget = cfg.join_timeout();
    let mut uncooperative: HashSet<_> = HashSet::new();
    let mut stats = SweepStats::default();
    let mut noted = false;

    loop {
        let targets: Vec<_> = boundary
            .registry()
            .live()
            .into_iter()
            .filter(|w| !uncooperative.contains(&w.id()))
            .collect();
        if targets.is_empty() {
            break;
        }

        note_interrupt(boundary, interrupt, &mut noted, "sweep");

        for worker in &targets {
            worker.cancel_token().cancel();
            boundary.emit(Event::new(EventKind::CancelRequested).with_worker(worker.name_arc()));
        }

        for worker in &targets {
            let finished = match budget {
                None => worker.await_finished(None),
                Some(total) => {
                    let remaining = total.saturating_sub(start.elapsed());
                    if remaining.is_zero() {
                        // Budget exhausted: skip the wait, classify directly.
                        worker.is_finished()
                    } else {
                        worker.await_finished(Some(remaining))
                    }
                }
            };

            if finished {
                stats.joined += 1;
                continue;
            }

            uncooperative.insert(worker.id());
            stats.uncooperative += 1;
            if cfg.force_kill {
                let outcome = killer.force_kill(worker);
                stats.forced += 1;
                boundary.emit(
                    Event::new(EventKind::ForceKillAttempted)
                        .with_worker(worker.name_arc())
                        .with_reason(outcome.to_string()),
                );
            } else {
                boundary.emit(
                    Event::new(EventKind::WorkerWillLinger)
                        .with_worker(worker.name_arc())
                        .with_timeout(cfg.join_timeout),
                );
            }
        }
    }

    if !uncooperative.is_empty() {
        boundary.emit(
            Event::new(EventKind::UncooperativeSummary).with_count(uncooperative.len() as u32),
        );
    } else {
        let residual = boundary.registry().live();
        if let Some(example) = residual.first() {
            boundary.emit(
                Event::new(EventKind::ResidualWorkers)
                    .with_count(residual.len() as u32)
                    .with_worker(example.name_arc()),
            );
        }
    }

    stats
}
