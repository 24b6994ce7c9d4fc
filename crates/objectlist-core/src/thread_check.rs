//! Thread affinity checks.
//!
//! A list is owned by exactly one thread. [`ThreadAffinity`] records that
//! thread when the list is created so the list can tell whether a call needs
//! to be marshalled through a [`Mailbox`](crate::Mailbox) instead of running
//! directly.
//!
//! ```
//! use objectlist_core::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//!
//! let moved = std::thread::spawn(move || affinity.is_same_thread())
//!     .join()
//!     .unwrap();
//! assert!(!moved);
//! ```

use std::thread::ThreadId;

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The owning thread.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the calling thread is the owning thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
    }

    #[test]
    fn test_other_thread() {
        let affinity = ThreadAffinity::current();
        let result = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!result);
    }
}
