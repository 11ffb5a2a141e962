use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::LaunchConfig;
use crate::entry::{ResolveEntry, SearchPath};
use crate::subscribers::{Subscribe, SubscriberSet};

use super::kill::{ForceKill, NoForceKill};
use super::launcher::Launcher;

/// Builder for constructing a Launcher with optional features.
pub struct LauncherBuilder {
    cfg: LaunchConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    modules: Vec<Arc<dyn ResolveEntry>>,
    killer: Arc<dyn ForceKill>,
    interrupt: Option<CancellationToken>,
}

impl LauncherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: LaunchConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            modules: Vec::new(),
            killer: Arc::new(NoForceKill),
            interrupt: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive supervision events (worker lifecycle, failures,
    /// sweep progress) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends a resolution module to the search path.
    ///
    /// Repeatable. The order of calls is the resolution precedence: the
    /// first module defining a symbol wins.
    pub fn with_module(mut self, module: Arc<dyn ResolveEntry>) -> Self {
        self.modules.push(module);
        self
    }

    /// Installs a forced-termination capability for uncooperative workers.
    ///
    /// Only consulted when [`LaunchConfig::force_kill`] is set. Without this
    /// call the launcher carries [`NoForceKill`], which reports every attempt
    /// as unsupported.
    pub fn with_force_kill(mut self, killer: Arc<dyn ForceKill>) -> Self {
        self.killer = killer;
        self
    }

    /// Attaches an advisory interrupt token.
    ///
    /// When the token is cancelled while a supervisor is waiting on workers,
    /// one `JoinInterrupted` warning is emitted per supervision phase; the
    /// waits themselves always run to completion.
    pub fn with_interrupt(mut self, token: CancellationToken) -> Self {
        self.interrupt = Some(token);
        self
    }

    /// Builds and returns the Launcher instance.
    ///
    /// This consumes the builder and initializes the runtime components:
    /// subscriber workers with bounded queues, the ordered search path, and
    /// the forced-termination capability.
    pub fn build(self) -> Launcher {
        let subs = Arc::new(SubscriberSet::new(self.subscribers));
        Launcher::new_internal(
            self.cfg,
            subs,
            SearchPath::new(self.modules),
            self.killer,
            self.interrupt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkerCtx;
    use crate::entry::EntryRegistry;

    #[test]
    fn test_module_order_is_preserved() {
        let mut first = EntryRegistry::new();
        first.register("app.Main", |_ctx: &WorkerCtx, _args: &[String]| Ok(()));
        let second = EntryRegistry::new();

        let launcher = LauncherBuilder::new(LaunchConfig::default())
            .with_module(Arc::new(first))
            .with_module(Arc::new(second))
            .build();

        assert_eq!(launcher.search_path().len(), 2, "both modules must be kept in order");
    }
}
