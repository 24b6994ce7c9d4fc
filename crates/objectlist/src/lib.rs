//! ObjectList - a data-bound list engine.
//!
//! Rows are model objects, columns are aspects read from them. The engine
//! turns a collection into display rows and keeps them sorted, grouped and
//! sized; it runs in-place cell edits and saves the view layout. Painting is
//! left to the host widget.
//!
//! # Example
//!
//! ```
//! use objectlist::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Song {
//!     title: String,
//!     plays: u32,
//! }
//!
//! impl Reflect for Song {
//!     fn member(&self, name: &str) -> Option<Member<'_>> {
//!         match name {
//!             "Title" => Some(Member::Value(self.title.clone().into())),
//!             "Plays" => Some(Member::Value(self.plays.into())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut list = ObjectListView::new(vec![
//!     Column::new("Title", "Title"),
//!     Column::new("Plays", "Plays").with_format("{0} plays"),
//! ]);
//! list.set_objects(vec![
//!     Song { title: "Rain".into(), plays: 3 },
//!     Song { title: "Dust".into(), plays: 12 },
//! ]);
//! list.sort(1, SortOrder::Descending);
//!
//! let first = list.item(0).unwrap();
//! assert_eq!(first.text(0), Some("Dust"));
//! assert_eq!(first.text(1), Some("12 plays"));
//! ```

pub mod aspect;
pub mod column;
pub mod edit;
pub mod editor;
pub mod error;
pub mod events;
pub mod format;
pub mod grouping;
pub mod layout;
pub mod list;
pub mod options;
pub mod prelude;
pub mod row;
pub mod sort;
pub mod state;
pub mod value;

pub use aspect::{AspectPath, Member, Reflect};
pub use column::Column;
pub use edit::{
    CellEditActivation, CellEditEventArgs, EditState, Key, KeyEvent, Modifiers, MouseButton,
    PointerEvent,
};
pub use editor::{CellEditor, DefaultEditorFactory, EditorFactory, EditorKind, EditorRequest, ValueEditor};
pub use error::{AspectError, ColumnError, ConfigError, StateError};
pub use events::{
    AfterSortingEventArgs, BeforeSortingEventArgs, ItemsAddingEventArgs, ItemsChangedEventArgs,
    ItemsChangingEventArgs, ItemsRemovingEventArgs,
};
pub use grouping::ListGroup;
pub use list::{CustomSorter, ListHandle, ListSignals, Mutation, ObjectListView};
pub use options::{ListOptions, ViewMode};
pub use row::{Cell, RowItem, RowStyle};
pub use sort::{RowComparator, SortOrder};
pub use state::{ColumnState, ListState};
pub use value::{AspectValue, CheckState, ImageSelector};

pub use objectlist_core::{Cancellable, Rect};
