//! Cell edit sessions: activation rules, states and navigation.
//!
//! A session moves through
//! `Idle -> Activating -> Editing -> (Committing | Cancelling) -> Idle`.
//! The list engine drives the transitions and raises the cancellable
//! starting, validating and finishing events; this module holds the pieces
//! that do not need the engine.

use serde::{Deserialize, Serialize};

use objectlist_core::{Cancellable, Rect};

use crate::editor::CellEditor;
use crate::value::AspectValue;

/// How the user starts editing a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellEditActivation {
    /// Cells cannot be edited.
    #[default]
    None,
    /// A single click edits a subitem cell. The primary cell needs F2.
    SingleClick,
    /// A double click edits any cell.
    DoubleClick,
    /// Only F2 starts editing.
    F2Only,
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditState {
    #[default]
    Idle,
    /// Editor created, starting event not yet resolved.
    Activating,
    Editing,
    /// Validated, finishing event and write-back in progress.
    Committing,
    Cancelling,
}

/// Mouse buttons the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
        alt: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.control || self.alt)
    }
}

/// A pointer release, already hit-tested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: MouseButton,
    /// Click count of the preceding press (2 for a double click).
    pub clicks: u8,
    pub modifiers: Modifiers,
    /// Display row under the pointer.
    pub row: Option<usize>,
    /// Position of the column under the pointer among the active columns.
    pub column: Option<usize>,
}

impl PointerEvent {
    /// A plain left click on a cell.
    pub fn click(row: usize, column: usize, clicks: u8) -> Self {
        Self {
            button: MouseButton::Left,
            clicks,
            modifiers: Modifiers::NONE,
            row: Some(row),
            column: Some(column),
        }
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    F2,
    Tab,
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Tab with at most Shift held.
    pub fn is_simple_tab(&self) -> bool {
        self.key == Key::Tab && !self.modifiers.control && !self.modifiers.alt
    }
}

/// Whether a pointer release should start editing.
///
/// Only an unmodified left click counts: a single click in
/// [`CellEditActivation::SingleClick`] mode, or a double click in
/// [`CellEditActivation::DoubleClick`] mode. Single clicks never edit the
/// primary (first) column.
pub fn should_start_edit(activation: CellEditActivation, event: &PointerEvent) -> bool {
    if event.button != MouseButton::Left || !event.modifiers.is_empty() {
        return false;
    }
    match (activation, event.clicks) {
        (CellEditActivation::SingleClick, 1) => event.column.is_some_and(|c| c > 0),
        (CellEditActivation::DoubleClick, 2) => true,
        _ => false,
    }
}

/// Find the next editable column in display order, wrapping at the edges.
///
/// `display_order` lists catalog indices of the active columns in display
/// order. Returns `None` if `current` is not active or no other column is
/// editable.
pub fn next_editable_column(
    display_order: &[usize],
    current: usize,
    backwards: bool,
    is_editable: impl Fn(usize) -> bool,
) -> Option<usize> {
    let count = display_order.len();
    let start = display_order.iter().position(|&c| c == current)?;
    let mut position = start;
    for _ in 0..count {
        position = if backwards {
            (position + count - 1) % count
        } else {
            (position + 1) % count
        };
        let column = display_order[position];
        if is_editable(column) {
            return (column != current).then_some(column);
        }
    }
    None
}

/// Payload of the cell-edit starting, validating and finishing events.
///
/// The live editor travels with the payload so handlers can adjust it or
/// swap in a different one.
#[derive(Debug)]
pub struct CellEditEventArgs {
    /// Display row of the cell.
    pub row: usize,
    /// Model index of the row.
    pub model_index: usize,
    /// Catalog index of the column.
    pub column: usize,
    /// Aspect value when editing began.
    pub value: AspectValue,
    /// Value to write back on commit. Filled from the editor before
    /// finishing; handlers may replace it.
    pub new_value: AspectValue,
    pub bounds: Rect,
    pub editor: Option<Box<dyn CellEditor>>,
    pub cancelled: bool,
}

impl Cancellable for CellEditEventArgs {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// The transient state of an edit in progress.
#[derive(Debug)]
pub(crate) struct EditSession {
    pub row: usize,
    pub model_index: usize,
    pub column: usize,
    pub value: AspectValue,
    pub bounds: Rect,
    pub editor: Box<dyn CellEditor>,
}

impl EditSession {
    /// Move the session into an event payload.
    pub fn into_args(self, cancelled: bool) -> CellEditEventArgs {
        let new_value = self.editor.value();
        CellEditEventArgs {
            row: self.row,
            model_index: self.model_index,
            column: self.column,
            value: self.value,
            new_value,
            bounds: self.bounds,
            editor: Some(self.editor),
            cancelled,
        }
    }

    /// Rebuild the session from a payload, keeping any replacement editor.
    /// `None` if a handler took the editor away.
    pub fn from_args(args: CellEditEventArgs) -> Option<Self> {
        Some(Self {
            row: args.row,
            model_index: args.model_index,
            column: args.column,
            value: args.value,
            bounds: args.bounds,
            editor: args.editor?,
        })
    }
}
