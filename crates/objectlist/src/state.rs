//! Saved view state: view mode, sort, grouping, and per-column layout.
//!
//! Columns are matched by catalog position only. A snapshot taken against a
//! catalog of a different size is incompatible and is rejected whole.

use serde::{Deserialize, Serialize};

use objectlist_core::logging::targets;

use crate::error::StateError;
use crate::options::ViewMode;
use crate::sort::SortOrder;

/// Schema version written into every snapshot.
pub const STATE_VERSION: u32 = 1;

/// Layout of one catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    pub visible: bool,
    /// Last known display position, -1 if never shown.
    pub display_index: i32,
    pub width: i32,
}

/// The user-adjustable configuration of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    pub version: u32,
    pub column_count: usize,
    pub view: ViewMode,
    /// Catalog index of the sort column, -1 for none.
    pub sort_column: i32,
    pub showing_groups: bool,
    pub sort_order: SortOrder,
    /// One entry per catalog column, in catalog order.
    pub columns: Vec<ColumnState>,
}

impl ListState {
    /// The sort column as a catalog index.
    pub fn sort_column_index(&self) -> Option<usize> {
        usize::try_from(self.sort_column).ok()
    }

    /// Encode as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode bytes produced by [`to_bytes`](ListState::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Check that this snapshot fits a catalog of `column_count` columns.
    pub fn validate(&self, column_count: usize) -> Result<(), StateError> {
        if self.column_count != column_count || self.columns.len() != column_count {
            tracing::debug!(
                target: targets::STATE,
                expected = column_count,
                found = self.column_count,
                "rejecting snapshot"
            );
            return Err(StateError::ColumnCountMismatch {
                expected: column_count,
                found: self.column_count.max(self.columns.len()),
            });
        }
        if self.sort_column >= 0 && self.sort_column as usize >= column_count {
            return Err(StateError::SortColumnOutOfRange {
                index: self.sort_column,
                count: column_count,
            });
        }
        Ok(())
    }
}
