//! Deferred work queue for idle processing.
//!
//! A list posts work it cannot safely do mid-callback (reopening an editor
//! after Tab, coalescing selection notifications) and drains the queue once
//! the current input event has been fully handled.
//!
//! Work items are plain values rather than closures so the owner can match
//! on them with full `&mut` access to itself while draining.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a deferred work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
struct Entry<W> {
    id: TaskId,
    work: W,
}

/// FIFO queue of deferred work items.
#[derive(Debug)]
pub struct TaskQueue<W> {
    entries: VecDeque<Entry<W>>,
}

impl<W> TaskQueue<W> {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Post a work item.
    pub fn post(&mut self, work: W) -> TaskId {
        let id = next_task_id();
        tracing::trace!(target: targets::TASK, task = id.as_u64(), "posted deferred work");
        self.entries.push_back(Entry { id, work });
        id
    }

    /// Post a work item unless an equal item is already pending.
    ///
    /// Returns the ID of the pending or newly posted item.
    pub fn post_unique(&mut self, work: W) -> TaskId
    where
        W: PartialEq,
    {
        match self.entries.iter().find(|e| e.work == work) {
            Some(entry) => entry.id,
            None => self.post(work),
        }
    }

    /// Drop every pending item matching `predicate`.
    ///
    /// Returns the number of items removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&W) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(&e.work));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::trace!(target: targets::TASK, removed, "cancelled deferred work");
        }
        removed
    }

    /// Rewrite pending items in place. Items for which `update` returns
    /// `false` are dropped.
    pub fn retain_mut(&mut self, mut update: impl FnMut(&mut W) -> bool) {
        self.entries.retain_mut(|e| update(&mut e.work));
    }

    /// Check if there are any pending items.
    pub fn has_pending(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get the number of pending items.
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Take every pending item.
    pub fn take_all(&mut self) -> Vec<W> {
        self.entries.drain(..).map(|e| e.work).collect()
    }
}

impl<W> Default for TaskQueue<W> {
    fn default() -> Self {
        Self::new()
    }
}
