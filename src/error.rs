//! Error types used by the runvisor launcher and workers.
//!
//! This module defines two main error enums:
//!
//! - [`InvokeError`]: terminal failures of one entry-point invocation.
//! - [`WorkerError`]: failures raised by individual worker executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics
//! and additional utilities such as [`WorkerError::is_benign`].

use thiserror::Error;

/// # Terminal failures of an entry-point invocation.
///
/// Exactly one of these (or success) reaches the caller of
/// [`Launcher::invoke`](crate::Launcher::invoke). The two resolution variants
/// are raised before any worker runs user code; [`InvokeError::Invocation`]
/// wraps the first failure captured from the worker set.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum InvokeError {
    /// The symbol does not resolve to an invocable target taking one argument vector.
    #[error("entry point '{symbol}' not found or not invocable with an argument vector")]
    EntryPointNotFound {
        /// The symbol that failed to resolve.
        symbol: String,
    },

    /// The symbol resolved, but the target is instance-bound and cannot be
    /// invoked without a receiver.
    #[error("entry point '{symbol}' is instance-bound and cannot be invoked directly")]
    EntryPointNotStatic {
        /// The symbol whose target failed shape validation.
        symbol: String,
    },

    /// First uncaught failure captured from the worker set.
    #[error("worker '{worker}' failed: {cause}")]
    Invocation {
        /// Name of the worker that raised the failure.
        worker: String,
        /// The underlying worker failure.
        cause: WorkerError,
    },
}

impl InvokeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use runvisor::InvokeError;
    ///
    /// let err = InvokeError::EntryPointNotFound { symbol: "app.Main".into() };
    /// assert_eq!(err.as_label(), "entry_point_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InvokeError::EntryPointNotFound { .. } => "entry_point_not_found",
            InvokeError::EntryPointNotStatic { .. } => "entry_point_not_static",
            InvokeError::Invocation { .. } => "invocation_failure",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InvokeError::EntryPointNotFound { symbol } => {
                format!("symbol '{symbol}' not found")
            }
            InvokeError::EntryPointNotStatic { symbol } => {
                format!("symbol '{symbol}' is not static")
            }
            InvokeError::Invocation { worker, cause } => {
                format!("worker '{worker}': {}", cause.as_message())
            }
        }
    }

    /// True for failures the isolation boundary filters out instead of recording.
    ///
    /// Only a worker's own voluntary cancellation marker is benign; resolution
    /// failures and real worker failures are not.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            InvokeError::Invocation {
                cause: WorkerError::Canceled,
                ..
            }
        )
    }
}

/// # Failures raised by worker execution.
///
/// Worker bodies return these; the spawn harness synthesizes [`WorkerError::Panic`]
/// from caught panics. [`WorkerError::Canceled`] signals voluntary termination
/// after observing cancellation and is never recorded as a failure.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum WorkerError {
    /// Worker code failed with an ordinary error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Worker panicked; the harness captured the payload.
    #[error("panicked: {message}")]
    Panic {
        /// The panic payload rendered as text.
        message: String,
    },

    /// Worker stopped voluntarily after observing its cancellation token.
    #[error("cancelled")]
    Canceled,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use runvisor::WorkerError;
    ///
    /// let err = WorkerError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "worker_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Panic { .. } => "worker_panicked",
            WorkerError::Canceled => "worker_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkerError::Fail { error } => format!("error: {error}"),
            WorkerError::Panic { message } => format!("panic: {message}"),
            WorkerError::Canceled => "cancelled".to_string(),
        }
    }

    /// Indicates whether this is an expected termination signal rather than a failure.
    ///
    /// Returns `true` only for [`WorkerError::Canceled`]. The isolation boundary
    /// filters benign signals before touching the failure slot.
    ///
    /// # Example
    /// ```
    /// use runvisor::WorkerError;
    ///
    /// assert!(WorkerError::Canceled.is_benign());
    /// assert!(!WorkerError::Fail { error: "boom".into() }.is_benign());
    /// ```
    pub fn is_benign(&self) -> bool {
        matches!(self, WorkerError::Canceled)
    }
}

impl From<std::io::Error> for WorkerError {
    fn from(e: std::io::Error) -> Self {
        WorkerError::Fail {
            error: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let not_found = InvokeError::EntryPointNotFound {
            symbol: "x".into(),
        };
        let not_static = InvokeError::EntryPointNotStatic {
            symbol: "x".into(),
        };
        let invocation = InvokeError::Invocation {
            worker: "w".into(),
            cause: WorkerError::Fail { error: "e".into() },
        };
        assert_eq!(not_found.as_label(), "entry_point_not_found");
        assert_eq!(not_static.as_label(), "entry_point_not_static");
        assert_eq!(invocation.as_label(), "invocation_failure");
    }

    #[test]
    fn test_only_cancellation_is_benign() {
        assert!(WorkerError::Canceled.is_benign());
        assert!(!WorkerError::Panic { message: "p".into() }.is_benign());
        assert!(
            !WorkerError::Fail { error: "e".into() }.is_benign(),
            "ordinary failures must be recorded"
        );

        let benign = InvokeError::Invocation {
            worker: "w".into(),
            cause: WorkerError::Canceled,
        };
        assert!(benign.is_benign());
        assert!(
            !InvokeError::EntryPointNotFound { symbol: "s".into() }.is_benign(),
            "resolution failures are fatal"
        );
    }

    #[test]
    fn test_display_wraps_worker_cause() {
        let err = InvokeError::Invocation {
            worker: "app.Main::main".into(),
            cause: WorkerError::Panic {
                message: "index out of bounds".into(),
            },
        };
        let text = err.to_string();
        assert!(text.contains("app.Main::main"), "display: {text}");
        assert!(text.contains("index out of bounds"), "display: {text}");
    }

    #[test]
    fn test_io_error_converts_to_fail() {
        let io = std::io::Error::other("no threads left");
        let err: WorkerError = io.into();
        assert!(matches!(err, WorkerError::Fail { .. }));
        assert!(err.as_message().contains("no threads left"));
    }
}
