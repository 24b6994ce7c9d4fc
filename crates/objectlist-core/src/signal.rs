//! Signal/slot notifications for ObjectList.
//!
//! Two flavours are provided:
//!
//! - [`Signal<Args>`] - plain notifications. Slots receive `&Args` and cannot
//!   influence the operation that emitted the signal.
//! - [`CancellableSignal<Args>`] - veto-able notifications. Slots receive
//!   `&mut Args`, may rewrite the payload, and may cancel the operation by
//!   calling [`Cancellable::cancel`].
//!
//! All emission happens on the thread that owns the list; there is no queued
//! delivery. Slots are cloned out of the connection table before they are
//! invoked, so a slot may safely connect or disconnect other slots.
//!
//! # Example
//!
//! ```
//! use objectlist_core::{Cancellable, CancellableSignal, Signal};
//!
//! let changed = Signal::<usize>::new();
//! changed.connect(|count| println!("{count} items"));
//! changed.emit(3);
//!
//! #[derive(Default)]
//! struct Adding {
//!     count: usize,
//!     cancelled: bool,
//! }
//!
//! impl Cancellable for Adding {
//!     fn is_cancelled(&self) -> bool {
//!         self.cancelled
//!     }
//!     fn set_cancelled(&mut self, cancelled: bool) {
//!         self.cancelled = cancelled;
//!     }
//! }
//!
//! let adding = CancellableSignal::<Adding>::new();
//! adding.connect(|args| {
//!     if args.count > 10 {
//!         args.cancel();
//!     }
//! });
//! let mut args = Adding { count: 11, cancelled: false };
//! assert!(adding.emit(&mut args));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`] or [`CancellableSignal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type MutSlot<Args> = Arc<dyn Fn(&mut Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The payload passed to connected slots. Use `()` for signals
///   with no payload.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
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
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    pub fn emit(&self, args: Args) {
        self.emit_ref(&args);
    }

    /// Emit the signal with a borrowed payload.
    pub fn emit_ref(&self, args: &Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(args);
        }
    }
}

/// A payload that connected slots can veto.
///
/// Cancellation is an expected outcome, not an error: the operation that
/// emitted the payload unwinds to its pre-operation state.
pub trait Cancellable {
    /// Whether the payload has been cancelled.
    fn is_cancelled(&self) -> bool;

    /// Set or clear the cancel flag.
    fn set_cancelled(&mut self, cancelled: bool);

    /// Cancel the operation.
    fn cancel(&mut self) {
        self.set_cancelled(true);
    }
}

/// A signal whose slots may rewrite or cancel its payload.
///
/// Every connected slot runs, even after an earlier slot cancelled, so later
/// slots can observe (and clear) the cancel flag.
pub struct CancellableSignal<Args> {
    connections: Mutex<SlotMap<ConnectionId, MutSlot<Args>>>,
    blocked: AtomicBool,
}

impl<Args> Default for CancellableSignal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for CancellableSignal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellableSignal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

impl<Args> CancellableSignal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot that may mutate or cancel the payload.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&mut Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }
}

impl<Args: Cancellable> CancellableSignal<Args> {
    /// Emit the signal and report whether the payload ended up cancelled.
    ///
    /// The cancel flag is left as the caller set it before emission; a blocked
    /// signal simply reports that flag.
    pub fn emit(&self, args: &mut Args) -> bool {
        if self.blocked.load(Ordering::SeqCst) {
            return args.is_cancelled();
        }

        let slots: Vec<MutSlot<Args>> = self.connections.lock().values().cloned().collect();
        for slot in slots {
            slot(args);
        }
        let cancelled = args.is_cancelled();
        if cancelled {
            tracing::trace!(target: targets::SIGNAL, "payload cancelled by slot");
        }
        cancelled
    }
}

static_assertions::assert_impl_all!(Signal<i32>: Send, Sync);
static_assertions::assert_impl_all!(CancellableSignal<i32>: Send, Sync);
