//! Signal/slot system for Ripple.
//!
//! Signals are how host nodes publish their events (clicks, animation
//! lifecycle) and how widgets publish theirs. Slots are plain closures;
//! they are always invoked directly on the emitting thread.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Example
//!
//! ```
//! use ripple_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// Keys are versioned, so a stale ID never disconnects a newer slot that
    /// happens to reuse the same storage.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// `Signal<Args>` is `Send + Sync`. Slots are snapshotted before they are
/// invoked, so a slot may connect or disconnect (itself included) while the
/// signal is being emitted. Such changes take effect from the next emission.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Check whether a connection is still live.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().contains_key(id)
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    pub fn emit(&self, args: Args) {
        let slots: Vec<(ConnectionId, Slot<Args>)> = self
            .connections
            .lock()
            .iter()
            .map(|(id, slot)| (id, slot.clone()))
            .collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for (id, slot) in slots {
            // A slot earlier in this emission may have disconnected this one.
            if self.is_connected(id) {
                slot(&args);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn slots_run_in_connection_order() {
        let signal = Signal::<&'static str>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for slot in ["first", "second"] {
            let log = log.clone();
            signal.connect(move |event| log.lock().push(format!("{slot}:{event}")));
        }
        signal.emit("click");

        assert_eq!(*log.lock(), vec!["first:click", "second:click"]);
        assert_eq!(signal.connection_count(), 2);
    }

    #[test]
    fn stale_id_disconnects_nothing() {
        let signal = Signal::<()>::new();
        let calls = Arc::new(AtomicU32::new(0));

        let id = signal.connect(|_| {});
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));

        let counter = calls.clone();
        let fresh = signal.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(!signal.disconnect(id));
        assert!(signal.is_connected(fresh));
        signal.emit(());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn slot_can_disconnect_itself() {
        let signal = Arc::new(Signal::<()>::new());
        let calls = Arc::new(AtomicU32::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let id = {
            let signal = signal.clone();
            let calls = calls.clone();
            let own_id = own_id.clone();
            signal.clone().connect(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *own_id.lock() {
                    signal.disconnect(id);
                }
            })
        };
        *own_id.lock() = Some(id);

        signal.emit(());
        signal.emit(());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn disconnect_during_emit_skips_later_slot() {
        let signal = Arc::new(Signal::<()>::new());
        let second_calls = Arc::new(AtomicU32::new(0));
        let second_id = Arc::new(Mutex::new(None::<ConnectionId>));

        {
            let signal_ref = signal.clone();
            let second_id = second_id.clone();
            signal.connect(move |_| {
                if let Some(id) = *second_id.lock() {
                    signal_ref.disconnect(id);
                }
            });
        }
        let calls = second_calls.clone();
        let id = signal.connect(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        *second_id.lock() = Some(id);

        signal.emit(());
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }
}
