//! # Invocation specification.
//!
//! Defines [`LaunchSpec`], the per-invocation bundle describing *what* to run:
//! the entry point symbol and the argument vector handed to it.
//!
//! ## Rules
//! - The spec is passed to [`Launcher::invoke`](crate::Launcher::invoke) for execution.
//! - The symbol must resolve through the launcher's search path; an empty or
//!   unknown symbol surfaces as `EntryPointNotFound`.

/// Specification for one entry-point invocation.
///
/// Bundles together:
/// - The entry point symbol (resolved via the launcher's search path)
/// - The argument vector (possibly empty)
///
/// ## Example
/// ```rust
/// use runvisor::LaunchSpec;
///
/// let spec = LaunchSpec::new("app.Main").with_args(["--fast", "input.txt"]);
/// assert_eq!(spec.symbol(), "app.Main");
/// assert_eq!(spec.args().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct LaunchSpec {
    symbol: String,
    args: Vec<String>,
}

impl LaunchSpec {
    /// Creates a specification with an empty argument vector.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            args: Vec::new(),
        }
    }

    /// Returns a new spec with the given argument vector.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the entry point symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the argument vector.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}
