//! # Entry-point resolution and invocation specs.
//!
//! This module provides the types describing *what* the launcher runs:
//! - [`LaunchSpec`] - specification bundling an entry symbol with its arguments
//! - [`EntryFn`] - shared callable entry point (`Arc<dyn Fn>`)
//! - [`EntryTarget`] - resolution result (static callable or instance-bound)
//! - [`ResolveEntry`] - trait for pluggable symbol-to-entry lookup modules
//! - [`EntryRegistry`] - map-backed [`ResolveEntry`] implementation
//! - [`SearchPath`] - ordered module list with first-definition-wins lookup

mod registry;
mod search;
mod spec;

pub use registry::{EntryFn, EntryRegistry, EntryTarget, ResolveEntry};
pub use search::SearchPath;
pub use spec::LaunchSpec;
