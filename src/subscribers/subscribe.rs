//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the
//! launcher. Each subscriber is driven by a dedicated worker thread fed by a bounded
//! queue that is owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching, retries); they do **not** block
//!   the publisher nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** (with a notice).
//!
//! ## Example
//! ```rust
//! use runvisor::{Event, Subscribe};
//!
//! struct Audit;
//!
//! impl Subscribe for Audit {
//!     fn on_event(&self, ev: &Event) {
//!         // write audit record...
//!         let _ = ev;
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 512 }
//! }
//! ```

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker thread. Blocking is tolerated (each
/// subscriber has its own thread) but backs up only that subscriber's queue.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are **dropped** (with a notice).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
