//! # Built-in logging subscriber backed by `tracing`.
//!
//! [`LogWriter`] renders supervision events through the [`tracing`] macros:
//! warnings for advisory conditions (failures, lingering workers, forced
//! termination, interrupted joins) and debug for lifecycle noise. Enabled via
//! the `logging` feature.
//!
//! ## Output format (with a fmt subscriber installed)
//! ```text
//! DEBUG runvisor: entry starting worker=app.Main::main args=["--fast"]
//! DEBUG runvisor: worker spawned worker=bg-ticker class=background
//! WARN  runvisor: failure recorded worker=app.Main::main reason=...
//! WARN  runvisor: worker will linger despite cancellation worker=bg-ticker timeout_ms=50
//! WARN  runvisor: 1 worker(s) did not finish despite cancellation
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use runvisor::{LaunchConfig, Launcher, LogWriter, Subscribe};
//!
//! let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//! let launcher = Launcher::builder(LaunchConfig::default())
//!     .with_subscribers(subs)
//!     .build();
//! # drop(launcher);
//! ```

use tracing::{debug, warn};

use crate::core::WorkerClass;
use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Renders events via `tracing` at warn/debug level.
///
/// Install a `tracing` subscriber (e.g. `tracing-subscriber`'s fmt layer) in
/// the host application to see the output. For structured capture or custom
/// sinks, implement [`Subscribe`] directly instead.
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::EntryStarting => {
                debug!(worker, args = e.reason.as_deref().unwrap_or(""), "entry starting");
            }
            EventKind::WorkerSpawned => {
                debug!(worker, class = e.class.map(WorkerClass::as_label), "worker spawned");
            }
            EventKind::WorkerFinished => {
                debug!(worker, "worker finished");
            }
            EventKind::FailureRecorded => {
                warn!(
                    worker,
                    reason = e.reason.as_deref().unwrap_or(""),
                    "failure recorded"
                );
            }
            EventKind::FailureDiscarded => {
                warn!(
                    worker,
                    reason = e.reason.as_deref().unwrap_or(""),
                    "secondary failure discarded (slot already taken)"
                );
            }
            EventKind::JoinInterrupted => {
                warn!(
                    reason = e.reason.as_deref().unwrap_or(""),
                    "interrupted while joining; continuing supervision"
                );
            }
            EventKind::CancelRequested => {
                debug!(worker, "cancellation requested");
            }
            EventKind::WorkerWillLinger => {
                warn!(
                    worker,
                    timeout_ms = e.timeout_ms.unwrap_or(0),
                    "worker will linger despite cancellation"
                );
            }
            EventKind::ForceKillAttempted => {
                warn!(
                    worker,
                    outcome = e.reason.as_deref().unwrap_or(""),
                    "forced termination attempted"
                );
            }
            EventKind::UncooperativeSummary => {
                warn!(
                    count = e.count.unwrap_or(0),
                    "worker(s) did not finish despite cancellation; this is a problem \
                     with the invoked code, not with the launcher"
                );
            }
            EventKind::ResidualWorkers => {
                debug!(
                    count = e.count.unwrap_or(0),
                    example = worker,
                    "worker(s) still active after sweep (late spawn race)"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
