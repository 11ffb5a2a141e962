//! # Launcher: orchestrates entry invocation, worker supervision, and cleanup.
//!
//! The [`Launcher`] owns the configuration, a [`SubscriberSet`], the entry
//! [`SearchPath`], and the forced-termination capability. One call to
//! [`Launcher::invoke`] runs a full invocation: overlay, resolution, entry
//! worker, join supervision, termination sweep, restore, result.
//!
//! ## Key responsibilities
//! - apply and restore the configured property overlay, when one is present
//! - resolve the entry symbol through the ordered search path
//! - spawn the entry worker inside a fresh isolation [`Boundary`]
//! - drain blocking workers, then sweep the leftovers when cleanup is on
//! - fold the boundary's failure slot into the returned result
//!
//! ## High-level architecture
//! ```text
//! Inputs to invoke():
//!   LaunchSpec { symbol, args }  ──►  Launcher::invoke(spec)
//!
//! Invocation flow:
//!   props::overlay(cfg.overlay)           (only when non-empty; guard restores on exit)
//!   Boundary::new(symbol)                 (registry + failure slot + cancel root)
//!   SearchPath::resolve(symbol)
//!     ├─► Err ──► record_failure(..)      (no worker ever starts)
//!     └─► Ok(f) ──► EntryStarting
//!                   Boundary::spawn("{symbol}::main", Blocking, f)
//!
//! Supervision:
//!   join::wait_for_blocking(..)           (blocking workers, advisory interrupt)
//!   cfg.cleanup ──► terminate::sweep(..)  (cancel + drain + classify leftovers)
//!
//! Result:
//!   drop(overlay guard)                   (property table restored wholesale)
//!   boundary.current_failure()
//!     ├─► Some(cause) ──► Err(cause)
//!     └─► None ─────────► Ok(())
//!
//! Event flow (as wired here):
//!   boundary / supervisors ── emit(Event) ──► SubscriberSet
//!                                              ┌─────────┬─────────┐
//!                                              ▼         ▼         ▼
//!                                       [queue S1] [queue S2] ... [queue SN]
//!                                        worker S1  worker S2 ...  worker SN
//!                                              sub.on_event(&Event) (per subscriber)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use runvisor::{
//!     EntryRegistry, LaunchConfig, LaunchSpec, Launcher, Recorder, Subscribe, WorkerCtx,
//! };
//!
//! let mut entries = EntryRegistry::new();
//! entries.register("app.Main", |_ctx: &WorkerCtx, args: &[String]| {
//!     println!("hello from app.Main({args:?})");
//!     Ok(())
//! });
//!
//! let recorder = Recorder::new();
//! let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(recorder.clone())];
//! let launcher = Launcher::builder(LaunchConfig::default())
//!     .with_module(Arc::new(entries))
//!     .with_subscribers(subs)
//!     .build();
//!
//! let result = launcher.invoke(LaunchSpec::new("app.Main").with_args(["--fast"]));
//! assert!(result.is_ok());
//! launcher.shutdown();
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::LaunchConfig;
use crate::entry::{LaunchSpec, SearchPath};
use crate::error::{InvokeError, WorkerError};
use crate::events::{Event, EventKind};
use crate::props;
use crate::subscribers::SubscriberSet;

use super::boundary::{Boundary, WorkerCtx};
use super::builder::LauncherBuilder;
use super::kill::ForceKill;
use super::registry::WorkerClass;
use super::{join, terminate};

/// Coordinates entry invocation, worker supervision, and event delivery.
pub struct Launcher {
    /// Per-launcher configuration.
    pub cfg: LaunchConfig,
    /// Fan-out set for subscribers.
    pub subs: Arc<SubscriberSet>,
    path: SearchPath,
    killer: Arc<dyn ForceKill>,
    interrupt: Option<CancellationToken>,
}

impl Launcher {
    /// Creates a builder seeded with the given configuration.
    pub fn builder(cfg: LaunchConfig) -> LauncherBuilder {
        LauncherBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: LaunchConfig,
        subs: Arc<SubscriberSet>,
        path: SearchPath,
        killer: Arc<dyn ForceKill>,
        interrupt: Option<CancellationToken>,
    ) -> Self {
        Self {
            cfg,
            subs,
            path,
            killer,
            interrupt,
        }
    }

    pub(crate) fn search_path(&self) -> &SearchPath {
        &self.path
    }

    /// Runs one entry-point invocation end to end.
    ///
    /// Resolution failures and worker failures travel the same path: the
    /// boundary's first-failure slot, read exactly once after supervision
    /// finishes. Uncooperative workers never fail the invocation; they are
    /// warned about and left behind.
    pub fn invoke(&self, spec: LaunchSpec) -> Result<(), InvokeError> {
        let overlay = (!self.cfg.overlay.is_empty()).then(|| props::overlay(&self.cfg.overlay));
        let boundary = Boundary::new(spec.symbol(), Arc::clone(&self.subs));

        self.resolve_and_start(&boundary, &spec);
        join::wait_for_blocking(&boundary, self.interrupt.as_ref());
        if self.cfg.cleanup {
            terminate::sweep(
                &boundary,
                &self.cfg,
                self.killer.as_ref(),
                self.interrupt.as_ref(),
            );
        }

        drop(overlay);
        match boundary.current_failure() {
            Some(cause) => Err(cause),
            None => Ok(()),
        }
    }

    /// Flushes the subscriber pipeline and joins its worker threads.
    ///
    /// Everything emitted before this call is delivered; late events from
    /// lingering workers are dropped silently.
    pub fn shutdown(self) {
        self.subs.shutdown();
    }

    /// Resolves the entry symbol and starts the entry worker.
    ///
    /// Every failure in here goes through the boundary's failure slot; the
    /// caller proceeds to supervision either way (with no workers to wait
    /// for, that is a no-op).
    fn resolve_and_start(&self, boundary: &Arc<Boundary>, spec: &LaunchSpec) {
        let entry = match self.path.resolve(spec.symbol()) {
            Ok(f) => f,
            Err(cause) => {
                boundary.record_failure(boundary.name(), cause);
                return;
            }
        };

        let worker_name: Arc<str> = Arc::from(format!("{}::main", boundary.name()));
        let args = spec.args().to_vec();
        boundary.emit(
            Event::new(EventKind::EntryStarting)
                .with_worker(Arc::clone(&worker_name))
                .with_reason(format!("{args:?}")),
        );

        let spawned = boundary.spawn(Arc::clone(&worker_name), WorkerClass::Blocking, {
            move |ctx: &WorkerCtx| entry(ctx, &args)
        });
        if let Err(err) = spawned {
            boundary.record_failure(
                &worker_name,
                InvokeError::Invocation {
                    worker: worker_name.to_string(),
                    cause: WorkerError::from(err),
                },
            );
        }
    }
}
