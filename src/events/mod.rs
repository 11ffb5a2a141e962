//! Supervision events: the data model for the invocation log stream.
//!
//! This module groups the event **data model** emitted by the launcher,
//! the isolation boundary, worker harnesses, and the two supervisors.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `Launcher::invoke`, the boundary's failure slot and spawn
//!   harness, the join supervisor, and the termination sweep.
//! - **Consumers**: the [`SubscriberSet`](crate::SubscriberSet) fans each event
//!   out to user subscribers (e.g. `Recorder`, `LogWriter`).
//!
//! See the crate-level docs for the system-level wiring diagram.

mod event;

pub use event::{Event, EventKind};
