//! Core runtime pieces shared by ObjectList.
//!
//! This crate holds the parts of the list engine that know nothing about
//! columns or rows:
//!
//! - [`Signal`] and [`CancellableSignal`] for notifications, the latter for
//!   the cancellable "before" events that let a handler veto an operation.
//! - [`TaskQueue`] for work deferred until the current input event finishes.
//! - [`Mailbox`] and [`Poster`] for handing mutations from worker threads to
//!   the thread that owns a list.
//! - [`ThreadAffinity`] for detecting calls made off the owning thread.
//! - [`logging`] with the tracing targets used throughout.

pub mod geometry;
pub mod logging;
pub mod mailbox;
pub mod signal;
pub mod task;
pub mod thread_check;

pub use geometry::Rect;
pub use mailbox::{Mailbox, Poster};
pub use signal::{Cancellable, CancellableSignal, ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
pub use thread_check::ThreadAffinity;
