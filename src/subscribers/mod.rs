//! # Event subscribers for the launcher.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and built-in implementations for handling supervision events.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Launcher / Boundary / supervisors ── emit(Event) ──► SubscriberSet
//!                                                            │
//!                                              ┌─────────────┼─────────────┐
//!                                              ▼             ▼             ▼
//!                                         [queue S1]    [queue S2]    [queue SN]
//!                                              │             │             │
//!                                         worker S1     worker S2     worker SN
//!                                              │             │             │
//!                                         Recorder      LogWriter      Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging, metrics, alerts)
//! - **Stateful subscribers** - maintain internal state based on events ([`Recorder`])

mod recorder;
mod set;
mod subscribe;

pub use recorder::Recorder;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
