//! # runvisor
//!
//! **Runvisor** is a lightweight in-process entry-point launcher for Rust.
//!
//! It resolves a named entry point through an ordered search path, runs it on
//! a dedicated supervised OS thread, isolates its failures from the invoking
//! code, and manages every worker thread the entry spawns: blocking workers
//! are waited for, background leftovers are cancelled and swept. The crate is
//! designed as a building block for plugin hosts, embedded tool runners, and
//! test harnesses.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌────────────────┐         ┌──────────────────────┐
//!     │   LaunchSpec   │         │     LaunchConfig     │
//!     │ symbol + args  │         │ cleanup / budget ... │
//!     └───────┬────────┘         └──────────┬───────────┘
//!             ▼                             ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Launcher (invocation orchestrator)                          │
//! │  - SearchPath (ordered ResolveEntry modules, first wins)     │
//! │  - SubscriberSet (fans out to user subscribers)              │
//! │  - ForceKill capability (NoForceKill by default)             │
//! └───────┬──────────────────────────────────────────────────────┘
//!         ▼  one per invocation
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Boundary (isolation)                                        │
//! │  - Registry (worker records, liveness phase)                 │
//! │  - failure slot (first non-benign cause wins)                │
//! │  - cancellation root (child token per worker)                │
//! └───────┬───────────────────┬──────────────────┬───────────────┘
//!         ▼                   ▼                  ▼
//!   ┌────────────┐     ┌────────────┐     ┌────────────┐
//!   │ entry      │     │ worker     │     │ worker     │
//!   │ "X::main"  │     │ (blocking) │     │ (backgrnd) │
//!   └─────┬──────┘     └─────┬──────┘     └─────┬──────┘
//!         │ emits Events     │                  │
//!         ▼                  ▼                  ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SubscriberSet                         │
//! │           (bounded queue + worker per subscriber)            │
//! │                 sub.on_event(&Event) each                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Invocation lifecycle
//! ```text
//! LaunchSpec ──► Launcher::invoke()
//!
//! invoke {
//!   ├─► props::overlay(cfg.overlay)            (guard, when configured)
//!   ├─► SearchPath::resolve(symbol)
//!   │     ├─ Err ──► failure slot, no worker starts
//!   │     └─ Ok(f) ─► EntryStarting, spawn "{symbol}::main" (blocking)
//!   ├─► join: wait for every blocking worker (snapshot, wait, re-snapshot)
//!   ├─► cleanup? termination sweep:
//!   │     ├─ cancel each live worker (CancelRequested)
//!   │     ├─ wait with join_timeout − elapsed (ZERO = unbounded)
//!   │     ├─ stubborn ──► uncooperative:
//!   │     │     ├─ force_kill ─► ForceKillAttempted(outcome)
//!   │     │     └─ else ──────► WorkerWillLinger
//!   │     └─ UncooperativeSummary / ResidualWorkers
//!   ├─► drop overlay guard                     (table restored wholesale)
//!   └─► failure slot ──► Ok(()) | Err(InvokeError)
//! }
//! ```
//!
//! ## Features
//! | Area                   | Description                                                      | Key types / traits                             |
//! |------------------------|------------------------------------------------------------------|------------------------------------------------|
//! | **Invocation**         | Resolve an entry symbol and run it on a supervised thread.       | [`Launcher`], [`LaunchSpec`]                   |
//! | **Resolution**         | Ordered, first-definition-wins symbol lookup.                    | [`ResolveEntry`], [`EntryRegistry`]            |
//! | **Workers**            | Spawn further supervised workers from entry code.                | [`WorkerCtx`], [`WorkerClass`]                 |
//! | **Subscriber API**     | Hook into supervision events (logging, capture, custom sinks).   | [`Subscribe`], [`Recorder`]                    |
//! | **Forced termination** | Optional capability for workers that ignore cancellation.        | [`ForceKill`], [`KillOutcome`]                 |
//! | **Errors**             | Typed errors for resolution and worker failures.                 | [`InvokeError`], [`WorkerError`]               |
//! | **Configuration**      | Centralize invocation settings.                                  | [`LaunchConfig`]                               |
//! | **Properties**         | Scoped process-local property overlays.                          | [`props`]                                      |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber (renders events via `tracing`).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use runvisor::{EntryRegistry, LaunchConfig, LaunchSpec, Launcher, WorkerClass, WorkerCtx};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = LaunchConfig::default();
//!     cfg.join_timeout = Duration::from_secs(2);
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn runvisor::Subscribe>> = {
//!         use runvisor::LogWriter;
//!         vec![Arc::new(LogWriter)]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn runvisor::Subscribe>> = Vec::new();
//!
//!     // Register the entry points this process exposes
//!     let mut entries = EntryRegistry::new();
//!     entries.register("app.Main", |ctx: &WorkerCtx, args: &[String]| {
//!         println!("main({args:?})");
//!         ctx.spawn("ticker", WorkerClass::Background, |ctx: &WorkerCtx| {
//!             while !ctx.is_cancelled() {
//!                 std::thread::sleep(Duration::from_millis(10));
//!             }
//!             Err(runvisor::WorkerError::Canceled)
//!         })?;
//!         Ok(())
//!     });
//!
//!     // Create launcher
//!     let launcher = Launcher::builder(cfg)
//!         .with_module(Arc::new(entries))
//!         .with_subscribers(subs)
//!         .build();
//!
//!     // Invoke: joins the entry, then sweeps the ticker during cleanup
//!     launcher.invoke(LaunchSpec::new("app.Main").with_args(["--fast"]))?;
//!     launcher.shutdown();
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod entry;
mod error;
mod events;
pub mod props;
mod subscribers;

// ---- Public re-exports ----

pub use config::LaunchConfig;
pub use core::{
    ForceKill, KillOutcome, Launcher, LauncherBuilder, NoForceKill, Worker, WorkerClass,
    WorkerCtx, WorkerId,
};
pub use entry::{EntryFn, EntryRegistry, EntryTarget, LaunchSpec, ResolveEntry, SearchPath};
pub use error::{InvokeError, WorkerError};
pub use events::{Event, EventKind};
pub use subscribers::{Recorder, Subscribe, SubscriberSet};

// Optional: expose the built-in tracing-backed logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
