//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to multiple
//! subscribers **without waiting** for their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and logged (isolation).
//! - After `shutdown()` returns, every event queued before it has been processed.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that
//!   subscriber).
//! - Events emitted after `shutdown()` are dropped.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc::{SyncSender, TrySendError, sync_channel};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::events::Event;

use super::Subscribe;

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: SyncSender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker threads.
pub struct SubscriberSet {
    channels: Mutex<Vec<SubscriberChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker thread per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, rx) = sync_channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);

            let spawned = std::thread::Builder::new()
                .name(format!("runvisor-sub-{name}"))
                .spawn(move || {
                    while let Ok(ev) = rx.recv() {
                        let hook = AssertUnwindSafe(|| s.on_event(ev.as_ref()));
                        if let Err(panic_err) = catch_unwind(hook) {
                            eprintln!(
                                "[runvisor] subscriber '{}' panicked: {:?}",
                                s.name(),
                                panic_err
                            );
                        }
                    }
                });

            match spawned {
                Ok(handle) => {
                    channels.push(SubscriberChannel { name, sender: tx });
                    workers.push(handle);
                }
                Err(err) => {
                    eprintln!("[runvisor] subscriber '{name}' worker failed to start: {err}");
                }
            }
        }

        Self {
            channels: Mutex::new(channels),
            workers: Mutex::new(workers),
        }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped for it
    /// and a notice is printed with the subscriber's name.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        let channels = self
            .channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for channel in channels.iter() {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    eprintln!(
                        "[runvisor] subscriber '{}' dropped event: queue full",
                        channel.name
                    );
                }
                Err(TrySendError::Disconnected(_)) => {
                    eprintln!(
                        "[runvisor] subscriber '{}' dropped event: worker closed",
                        channel.name
                    );
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and join worker threads.
    ///
    /// Workers drain every event already queued before exiting, so this is the
    /// flush point when deterministic delivery matters (e.g. in tests).
    /// Idempotent; later `emit` calls become no-ops.
    pub fn shutdown(&self) {
        let drained: Vec<SubscriberChannel> = {
            let mut channels = self
                .channels
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            channels.drain(..).collect()
        };
        drop(drained);

        let handles: Vec<JoinHandle<()>> = {
            let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            workers.drain(..).collect()
        };
        for h in handles {
            let _ = h.join();
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::mpsc;

    struct Collecting {
        seen: Mutex<Vec<u64>>,
    }

    impl Subscribe for Collecting {
        fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.seq);
        }
        fn name(&self) -> &'static str {
            "collecting"
        }
    }

    struct PanicsOnce {
        fired: Mutex<bool>,
        delivered: Mutex<usize>,
    }

    impl Subscribe for PanicsOnce {
        fn on_event(&self, _event: &Event) {
            let mut fired = self.fired.lock().unwrap();
            if !*fired {
                *fired = true;
                drop(fired);
                panic!("subscriber exploded");
            }
            *self.delivered.lock().unwrap() += 1;
        }
        fn name(&self) -> &'static str {
            "panics-once"
        }
    }

    struct Gated {
        started_tx: Mutex<mpsc::Sender<()>>,
        release_rx: Mutex<mpsc::Receiver<()>>,
        delivered: Mutex<usize>,
    }

    impl Subscribe for Gated {
        fn on_event(&self, _event: &Event) {
            let first = {
                let mut delivered = self.delivered.lock().unwrap();
                *delivered += 1;
                *delivered == 1
            };
            if first {
                self.started_tx.lock().unwrap().send(()).unwrap();
                self.release_rx.lock().unwrap().recv().unwrap();
            }
        }
        fn name(&self) -> &'static str {
            "gated"
        }
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[test]
    fn test_fan_out_preserves_per_subscriber_order() {
        let sub = Arc::new(Collecting {
            seen: Mutex::new(Vec::new()),
        });
        let set = SubscriberSet::new(vec![sub.clone() as Arc<dyn Subscribe>]);
        assert_eq!(set.len(), 1);

        let a = Event::new(EventKind::WorkerSpawned);
        let b = Event::new(EventKind::WorkerFinished);
        let c = Event::new(EventKind::UncooperativeSummary);
        set.emit(&a);
        set.emit(&b);
        set.emit(&c);
        set.shutdown();

        let seen = sub.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![a.seq, b.seq, c.seq], "FIFO per subscriber");
    }

    #[test]
    fn test_subscriber_panic_does_not_stop_delivery() {
        let sub = Arc::new(PanicsOnce {
            fired: Mutex::new(false),
            delivered: Mutex::new(0),
        });
        let set = SubscriberSet::new(vec![sub.clone() as Arc<dyn Subscribe>]);

        set.emit(&Event::new(EventKind::WorkerSpawned));
        set.emit(&Event::new(EventKind::WorkerFinished));
        set.shutdown();

        assert!(*sub.fired.lock().unwrap(), "first event should panic");
        assert_eq!(
            *sub.delivered.lock().unwrap(),
            1,
            "second event must still be delivered after the panic"
        );
    }

    #[test]
    fn test_overflow_drops_instead_of_blocking() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let sub = Arc::new(Gated {
            started_tx: Mutex::new(started_tx),
            release_rx: Mutex::new(release_rx),
            delivered: Mutex::new(0),
        });
        let set = SubscriberSet::new(vec![sub.clone() as Arc<dyn Subscribe>]);

        // First event reaches the worker and blocks it behind the gate.
        set.emit(&Event::new(EventKind::WorkerSpawned));
        started_rx.recv().unwrap();

        // Second fills the queue (capacity 1); the rest are dropped.
        set.emit(&Event::new(EventKind::WorkerFinished));
        set.emit(&Event::new(EventKind::CancelRequested));
        set.emit(&Event::new(EventKind::CancelRequested));

        release_tx.send(()).unwrap();
        set.shutdown();

        assert_eq!(
            *sub.delivered.lock().unwrap(),
            2,
            "exactly the blocked event and one queued event should arrive"
        );
    }

    #[test]
    fn test_shutdown_is_idempotent_and_emit_after_is_noop() {
        let sub = Arc::new(Collecting {
            seen: Mutex::new(Vec::new()),
        });
        let set = SubscriberSet::new(vec![sub.clone() as Arc<dyn Subscribe>]);
        set.shutdown();
        set.shutdown();
        assert!(set.is_empty());

        set.emit(&Event::new(EventKind::WorkerSpawned));
        assert!(sub.seen.lock().unwrap().is_empty());
    }
}
