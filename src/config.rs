//! # Launcher configuration.
//!
//! Provides [`LaunchConfig`], the per-launcher settings for cleanup behavior,
//! termination deadlines, forced termination, and the property overlay.
//!
//! Config is used in two ways:
//! 1. **Launcher creation**: `Launcher::builder(config)`
//! 2. **Termination sweep**: the sweep reads `cleanup`, `join_timeout()` and
//!    `force_kill` to decide how hard to push lingering workers.
//!
//! ## Sentinel values
//! - `join_timeout = 0s` → wait indefinitely (treated as `None` by
//!   [`LaunchConfig::join_timeout`])

use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for one launcher.
///
/// Defines:
/// - **Cleanup behavior**: whether background workers are swept after the
///   foreground work drains
/// - **Termination deadline**: shared time budget for the whole sweep
/// - **Escalation**: whether uncooperative workers get a forced-termination attempt
/// - **Environment**: the property overlay installed for the invocation
///
/// ## Field semantics
/// - `cleanup`: run the termination sweep after the join phase (`false` = leave
///   background workers running)
/// - `join_timeout`: total budget for the sweep, measured from a single start
///   timestamp across all rounds (`0s` = unbounded)
/// - `force_kill`: attempt forced termination on workers that exhaust the budget
/// - `overlay`: key→value properties applied before the entry worker starts and
///   restored after cleanup finishes (empty = no overlay)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessor
/// [`LaunchConfig::join_timeout`] to avoid sprinkling sentinel checks (`0s`)
/// across the codebase.
#[derive(Clone, Debug)]
pub struct LaunchConfig {
    /// Whether to sweep remaining background workers after the join phase.
    ///
    /// When disabled, the invocation returns as soon as blocking-class workers
    /// drain; background workers are left untouched.
    pub cleanup: bool,

    /// Maximum total time the termination sweep spends waiting for workers.
    ///
    /// - `Duration::ZERO` = unbounded (wait until every worker exits)
    /// - `> 0` = shared deadline; workers still alive past it are classified
    ///   uncooperative
    pub join_timeout: Duration,

    /// Whether to attempt forced termination on uncooperative workers.
    ///
    /// Forced termination is best-effort and may be unsupported; see
    /// [`ForceKill`](crate::ForceKill). When disabled, uncooperative workers
    /// are abandoned with a warning.
    pub force_kill: bool,

    /// Property overlay installed for the duration of one invocation.
    ///
    /// Applied to the process-wide table in [`props`](crate::props) before the
    /// entry worker starts; the prior table is restored wholesale after all
    /// cleanup work finishes, regardless of outcome.
    pub overlay: BTreeMap<String, String>,
}

impl LaunchConfig {
    /// Returns the sweep time budget as an `Option`.
    ///
    /// - `None` → unbounded (wait as long as it takes)
    /// - `Some(d)` → shared deadline across all sweep rounds
    #[inline]
    pub fn join_timeout(&self) -> Option<Duration> {
        if self.join_timeout == Duration::ZERO {
            None
        } else {
            Some(self.join_timeout)
        }
    }
}

impl Default for LaunchConfig {
    /// Default configuration:
    ///
    /// - `cleanup = true` (sweep background workers)
    /// - `join_timeout = 15s` (generous budget for well-behaved workers)
    /// - `force_kill = false` (abandon uncooperative workers with a warning)
    /// - `overlay = {}` (no property overlay)
    fn default() -> Self {
        Self {
            cleanup: true,
            join_timeout: Duration::from_secs(15),
            force_kill: false,
            overlay: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let mut cfg = LaunchConfig::default();
        cfg.join_timeout = Duration::ZERO;
        assert_eq!(cfg.join_timeout(), None);

        cfg.join_timeout = Duration::from_millis(50);
        assert_eq!(cfg.join_timeout(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_defaults() {
        let cfg = LaunchConfig::default();
        assert!(cfg.cleanup, "cleanup should default to enabled");
        assert!(!cfg.force_kill, "force-kill should default to disabled");
        assert_eq!(cfg.join_timeout, Duration::from_secs(15));
        assert!(cfg.overlay.is_empty());
    }
}
