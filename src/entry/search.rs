//! # Ordered symbol resolution across modules.
//!
//! [`SearchPath`] owns the ordered list of modules that form the invocation's
//! symbol environment. Resolution walks the list in order; the **first module
//! defining the symbol wins** and later modules are never consulted, mirroring
//! loader precedence. Only then is the winning target's shape validated.
//!
//! ## Rules
//! - Order of [`SearchPath::push`] (or of `with_module` on the builder) is
//!   resolution precedence and is preserved.
//! - An instance-bound first definition is not rescued by a static definition
//!   in a later module; it fails shape validation.
//! - An undefined symbol (or one a module could not export in the canonical
//!   shape) resolves to [`InvokeError::EntryPointNotFound`].

use std::sync::Arc;

use crate::error::InvokeError;

use super::registry::{EntryFn, EntryTarget, ResolveEntry};

/// Ordered module list with first-match resolution.
pub struct SearchPath {
    modules: Vec<Arc<dyn ResolveEntry>>,
}

impl SearchPath {
    /// Creates a search path over the given modules, in precedence order.
    #[must_use]
    pub fn new(modules: Vec<Arc<dyn ResolveEntry>>) -> Self {
        Self { modules }
    }

    /// Appends a module with the lowest precedence so far.
    pub fn push(&mut self, module: Arc<dyn ResolveEntry>) {
        self.modules.push(module);
    }

    /// Resolves `symbol` to an invocable entry.
    ///
    /// Two-stage validation behind one contract: existence first (walk the
    /// modules in order, first definition wins), then invocability shape
    /// (the winning target must be static).
    pub fn resolve(&self, symbol: &str) -> Result<EntryFn, InvokeError> {
        for module in &self.modules {
            if let Some(target) = module.lookup(symbol) {
                return match target {
                    EntryTarget::Static(f) => Ok(f),
                    EntryTarget::Instance => Err(InvokeError::EntryPointNotStatic {
                        symbol: symbol.to_string(),
                    }),
                };
            }
        }
        Err(InvokeError::EntryPointNotFound {
            symbol: symbol.to_string(),
        })
    }

    /// Number of modules on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True if the path holds no modules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkerCtx;
    use crate::entry::EntryRegistry;
    use std::sync::Mutex;

    fn static_module(symbol: &str, marker: &'static Mutex<Vec<&'static str>>, tag: &'static str) -> Arc<dyn ResolveEntry> {
        let mut reg = EntryRegistry::new();
        reg.register(symbol, move |_ctx: &WorkerCtx, _args: &[String]| {
            marker.lock().unwrap().push(tag);
            Ok(())
        });
        Arc::new(reg)
    }

    #[test]
    fn test_missing_symbol_is_not_found() {
        let path = SearchPath::new(vec![Arc::new(EntryRegistry::new())]);
        let err = path.resolve("app.Main").err().unwrap();
        assert!(matches!(err, InvokeError::EntryPointNotFound { symbol } if symbol == "app.Main"));
    }

    #[test]
    fn test_empty_symbol_is_not_found() {
        let path = SearchPath::default();
        let err = path.resolve("").err().unwrap();
        assert_eq!(err.as_label(), "entry_point_not_found");
    }

    #[test]
    fn test_instance_bound_fails_shape_validation() {
        let mut reg = EntryRegistry::new();
        reg.register_instance("app.Tool");
        let path = SearchPath::new(vec![Arc::new(reg)]);

        let err = path.resolve("app.Tool").err().unwrap();
        assert!(matches!(err, InvokeError::EntryPointNotStatic { symbol } if symbol == "app.Tool"));
    }

    #[test]
    fn test_first_module_wins() {
        static CALLS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        let path = SearchPath::new(vec![
            static_module("app.Main", &CALLS, "first"),
            static_module("app.Main", &CALLS, "second"),
        ]);

        let f = path.resolve("app.Main").expect("should resolve");
        let ctx = WorkerCtx::detached_for_tests();
        f(&ctx, &[]).unwrap();

        assert_eq!(
            CALLS.lock().unwrap().as_slice(),
            &["first"],
            "only the first module's entry should run"
        );
    }

    #[test]
    fn test_instance_bound_first_match_shadows_later_static() {
        static CALLS: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

        let mut shadowing = EntryRegistry::new();
        shadowing.register_instance("app.Main");

        let path = SearchPath::new(vec![
            Arc::new(shadowing),
            static_module("app.Main", &CALLS, "fallback"),
        ]);

        let err = path.resolve("app.Main").err().unwrap();
        assert_eq!(
            err.as_label(),
            "entry_point_not_static",
            "the first definition decides; later modules are never consulted"
        );
        assert!(CALLS.lock().unwrap().is_empty());
    }
}
