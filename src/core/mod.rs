//! Runtime core: orchestration and supervision.
//!
//! This module contains the embedded implementation of the runvisor runtime.
//! The public API from this module is [`Launcher`] (with its builder), the
//! worker surface ([`Worker`], [`WorkerCtx`], [`WorkerClass`], [`WorkerId`]),
//! and the forced-termination capability ([`ForceKill`]).
//!
//! Internal modules:
//! - [`launcher`]: runs one invocation end to end (overlay, resolve, supervise);
//! - [`boundary`]: failure slot, worker spawning, the harness around bodies;
//! - [`registry`]: worker records, liveness phase, snapshot views;
//! - [`join`]: drains the blocking worker set;
//! - [`terminate`]: cancels and classifies leftovers under a shared budget;
//! - [`kill`]: forced-termination capability and outcomes.

mod boundary;
mod builder;
mod join;
mod kill;
mod launcher;
mod registry;
mod terminate;

pub use boundary::WorkerCtx;
pub use builder::LauncherBuilder;
pub use kill::{ForceKill, KillOutcome, NoForceKill};
pub use launcher::Launcher;
pub use registry::{Worker, WorkerClass, WorkerId};
