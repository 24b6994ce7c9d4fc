//! Cross-thread delivery of mutations to the owning thread.
//!
//! The owning thread keeps the [`Mailbox`]; any number of [`Poster`]s can be
//! cloned and sent to worker threads. Messages are applied, in the order they
//! were posted, when the owner calls [`Mailbox::drain`].

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::logging::targets;

/// Receiving half, held by the owning thread.
#[derive(Debug)]
pub struct Mailbox<M> {
    sender: Sender<M>,
    receiver: Receiver<M>,
}

/// Sending half, cloneable and `Send` when `M` is.
#[derive(Debug)]
pub struct Poster<M> {
    sender: Sender<M>,
}

impl<M> Clone for Poster<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M> Default for Mailbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Mailbox<M> {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Create a poster for this mailbox.
    pub fn poster(&self) -> Poster<M> {
        Poster {
            sender: self.sender.clone(),
        }
    }

    /// Number of messages waiting.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Take every message currently queued, oldest first.
    pub fn drain(&self) -> Vec<M> {
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => out.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if !out.is_empty() {
            tracing::trace!(target: targets::TASK, count = out.len(), "drained mailbox");
        }
        out
    }
}

impl<M> Poster<M> {
    /// Queue a message for the owning thread.
    ///
    /// Returns `false` if the mailbox has been dropped.
    pub fn post(&self, message: M) -> bool {
        self.sender.send(message).is_ok()
    }
}

static_assertions::assert_impl_all!(Poster<String>: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_drain_in_order() {
        let mailbox = Mailbox::new();
        let poster = mailbox.poster();
        assert!(poster.post(1));
        assert!(poster.post(2));
        assert_eq!(mailbox.pending_count(), 2);
        assert_eq!(mailbox.drain(), vec![1, 2]);
        assert!(mailbox.drain().is_empty());
    }

    #[test]
    fn test_post_from_worker_thread() {
        let mailbox = Mailbox::new();
        let poster = mailbox.poster();
        std::thread::spawn(move || {
            for i in 0..10 {
                poster.post(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(mailbox.drain(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_post_after_mailbox_dropped() {
        let mailbox = Mailbox::<u8>::new();
        let poster = mailbox.poster();
        drop(mailbox);
        assert!(!poster.post(1));
    }
}
