//! Payloads of the events a list raises.
//!
//! The "before" events carry a cancel flag; cancelling one unwinds the
//! operation with no partial effect. Handlers may also rewrite the payload,
//! for instance to filter the objects being added.

use std::sync::Arc;

use objectlist_core::Cancellable;

use crate::sort::SortOrder;

macro_rules! impl_cancellable {
    ($($ty:ident $(<$param:ident>)?),+ $(,)?) => {
        $(
            impl$(<$param>)? Cancellable for $ty$(<$param>)? {
                fn is_cancelled(&self) -> bool {
                    self.cancelled
                }

                fn set_cancelled(&mut self, cancelled: bool) {
                    self.cancelled = cancelled;
                }
            }
        )+
    };
}

/// Raised before objects are added. Handlers may change `objects`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsAddingEventArgs<T> {
    pub objects: Vec<T>,
    pub cancelled: bool,
}

/// Raised before objects are removed. Handlers may change `objects`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsRemovingEventArgs<T> {
    pub objects: Vec<T>,
    pub cancelled: bool,
}

/// Raised before the whole collection is replaced. Handlers may substitute
/// a different collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsChangingEventArgs<T> {
    pub old_count: usize,
    pub new_objects: Arc<Vec<T>>,
    pub cancelled: bool,
}

/// Raised after the collection changed by any means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemsChangedEventArgs {
    pub old_count: usize,
    pub new_count: usize,
}

/// Raised before a sort. Handlers may change the column or direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeSortingEventArgs {
    /// Catalog index of the column to sort by.
    pub column: usize,
    pub order: SortOrder,
    pub cancelled: bool,
}

/// Raised after a sort completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfterSortingEventArgs {
    pub column: usize,
    pub order: SortOrder,
}

impl_cancellable!(
    ItemsAddingEventArgs<T>,
    ItemsRemovingEventArgs<T>,
    ItemsChangingEventArgs<T>,
    BeforeSortingEventArgs,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_sets_flag() {
        let mut args = ItemsAddingEventArgs {
            objects: vec![1, 2],
            cancelled: false,
        };
        args.cancel();
        assert!(args.is_cancelled());

        let mut sorting = BeforeSortingEventArgs {
            column: 0,
            order: SortOrder::Ascending,
            cancelled: true,
        };
        sorting.set_cancelled(false);
        assert!(!sorting.is_cancelled());
    }
}
