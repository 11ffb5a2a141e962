//! # Forced termination capability.
//!
//! Cancellation is cooperative: a worker that ignores its token cannot be
//! stopped from safe code. [`ForceKill`] is the escape hatch for embedders
//! that do have a way to take a worker down (a subprocess wrapper, an FFI
//! runtime with its own stop call). The shipped default, [`NoForceKill`],
//! supports nothing.
//!
//! ## Rules
//! - Outcomes are reported as [`KillOutcome`] and logged by the sweep; they
//!   are never surfaced as invocation errors.
//! - A `Killed` outcome means the worker will not run again. It does not mean
//!   its resources were released.
//! - The sweep calls the capability at most once per worker.

use crate::core::registry::Worker;

/// Outcome of one forced termination attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// The worker was taken down and will not run again.
    Killed,
    /// The capability cannot terminate this worker.
    Unsupported,
    /// The attempt ran and failed.
    Failed(String),
}

impl KillOutcome {
    /// Returns the outcome as a short stable label.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            KillOutcome::Killed => "killed",
            KillOutcome::Unsupported => "unsupported",
            KillOutcome::Failed(_) => "failed",
        }
    }
}

impl std::fmt::Display for KillOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KillOutcome::Killed => write!(f, "killed"),
            KillOutcome::Unsupported => write!(f, "unsupported"),
            KillOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Capability for forcibly terminating an uncooperative worker.
pub trait ForceKill: Send + Sync + 'static {
    /// Attempts to terminate the worker, reporting what happened.
    fn force_kill(&self, worker: &Worker) -> KillOutcome;
}

/// Default capability: forced termination is unsupported.
pub struct NoForceKill;

impl ForceKill for NoForceKill {
    fn force_kill(&self, _worker: &Worker) -> KillOutcome {
        KillOutcome::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::core::registry::{Registry, WorkerClass};

    #[test]
    fn test_default_capability_reports_unsupported() {
        let reg = Registry::new();
        let worker = reg.register(
            Arc::from("stuck"),
            WorkerClass::Background,
            CancellationToken::new(),
        );

        let outcome = NoForceKill.force_kill(&worker);
        assert_eq!(outcome, KillOutcome::Unsupported);
        assert_eq!(outcome.as_label(), "unsupported");
    }

    #[test]
    fn test_outcome_rendering() {
        assert_eq!(KillOutcome::Killed.to_string(), "killed");
        assert_eq!(
            KillOutcome::Failed("no handle".to_string()).to_string(),
            "failed: no handle"
        );
        assert_eq!(KillOutcome::Failed("x".to_string()).as_label(), "failed");
    }
}
