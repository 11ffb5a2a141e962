//! # Entry targets and the map-backed registry.
//!
//! This module defines what an entry point *is* to the launcher:
//! - [`EntryFn`] - the canonical invocable shape (context + argument vector)
//! - [`EntryTarget`] - a registered symbol's binding (static or instance-bound)
//! - [`ResolveEntry`] - trait for anything that can look symbols up
//! - [`EntryRegistry`] - the shipped map-backed implementation
//!
//! A registry models one module of a loaded environment: it exports symbols,
//! some directly invocable, some requiring a receiver. Symbols exported with a
//! shape other than the canonical one cannot be represented and are
//! indistinguishable from absent.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::WorkerCtx;
use crate::error::WorkerError;

/// Shared handle to an invocable entry body.
///
/// The body receives the entry worker's [`WorkerCtx`] (for cancellation checks
/// and nested spawns) and the invocation's argument vector.
pub type EntryFn = Arc<dyn Fn(&WorkerCtx, &[String]) -> Result<(), WorkerError> + Send + Sync>;

/// Binding of a registered symbol.
#[derive(Clone)]
pub enum EntryTarget {
    /// Directly invocable with an argument vector.
    Static(EntryFn),
    /// Declared by the module but bound to an instance; cannot be invoked
    /// without a receiver. Resolving to this fails shape validation.
    Instance,
}

impl EntryTarget {
    /// True if the target can be invoked directly.
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self, EntryTarget::Static(_))
    }
}

/// Contract for symbol lookup within one module.
///
/// Implementations answer "does this module define `symbol`, and how is it
/// bound" without judging the result; shape validation is the
/// [`SearchPath`](crate::SearchPath)'s job.
pub trait ResolveEntry: Send + Sync + 'static {
    /// Returns the module's target for `symbol`, or `None` if undefined here.
    fn lookup(&self, symbol: &str) -> Option<EntryTarget>;
}

/// Map-backed module of entry targets.
///
/// ## Example
/// ```rust
/// use runvisor::{EntryRegistry, ResolveEntry, WorkerCtx};
///
/// let mut reg = EntryRegistry::new();
/// reg.register("app.Main", |_ctx: &WorkerCtx, _args: &[String]| Ok(()));
/// reg.register_instance("app.Tool");
///
/// assert!(reg.lookup("app.Main").is_some_and(|t| t.is_static()));
/// assert!(reg.lookup("app.Tool").is_some_and(|t| !t.is_static()));
/// assert!(reg.lookup("app.Missing").is_none());
/// ```
#[derive(Default)]
pub struct EntryRegistry {
    entries: HashMap<String, EntryTarget>,
}

impl EntryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a statically invocable entry under `symbol`.
    ///
    /// Re-registering a symbol replaces the previous target.
    pub fn register<F>(&mut self, symbol: impl Into<String>, f: F)
    where
        F: Fn(&WorkerCtx, &[String]) -> Result<(), WorkerError> + Send + Sync + 'static,
    {
        self.entries
            .insert(symbol.into(), EntryTarget::Static(Arc::new(f)));
    }

    /// Declares `symbol` as present but instance-bound.
    ///
    /// Resolution that lands on such a target fails with
    /// [`EntryPointNotStatic`](crate::InvokeError::EntryPointNotStatic).
    pub fn register_instance(&mut self, symbol: impl Into<String>) {
        self.entries.insert(symbol.into(), EntryTarget::Instance);
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no symbols are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolveEntry for EntryRegistry {
    fn lookup(&self, symbol: &str) -> Option<EntryTarget> {
        self.entries.get(symbol).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_distinguishes_bindings() {
        let mut reg = EntryRegistry::new();
        reg.register("app.Main", |_ctx: &WorkerCtx, _args: &[String]| Ok(()));
        reg.register_instance("app.Tool");

        assert!(reg.lookup("app.Main").is_some_and(|t| t.is_static()));
        assert!(reg.lookup("app.Tool").is_some_and(|t| !t.is_static()));
        assert!(reg.lookup("app.Missing").is_none());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_reregistering_replaces_target() {
        let mut reg = EntryRegistry::new();
        reg.register_instance("app.Main");
        reg.register("app.Main", |_ctx: &WorkerCtx, _args: &[String]| Ok(()));

        assert!(
            reg.lookup("app.Main").is_some_and(|t| t.is_static()),
            "later registration should win within one module"
        );
        assert_eq!(reg.len(), 1);
    }
}
