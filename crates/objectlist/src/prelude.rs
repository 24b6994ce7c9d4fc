//! Prelude module for ObjectList.
//!
//! ```ignore
//! use objectlist::prelude::*;
//! ```
//!
//! Brings in what most hosts touch: the model trait, columns, the list
//! itself, its options, and the input and event types.

// ============================================================================
// Model access
// ============================================================================

pub use crate::aspect::{Member, Reflect};
pub use crate::value::{AspectValue, CheckState, ImageSelector};

// ============================================================================
// Columns and the list
// ============================================================================

pub use crate::column::Column;
pub use crate::list::{ListHandle, ObjectListView};
pub use crate::options::{ListOptions, ViewMode};
pub use crate::row::RowItem;
pub use crate::sort::SortOrder;

// ============================================================================
// Editing and input
// ============================================================================

pub use crate::edit::{CellEditActivation, EditState, Key, KeyEvent, Modifiers, PointerEvent};
pub use crate::editor::{CellEditor, EditorFactory};

// ============================================================================
// Events
// ============================================================================

pub use objectlist_core::{Cancellable, Signal};
