//! Cell editors and the factory that picks one for a value.
//!
//! The engine never draws an editor. It asks an [`EditorFactory`] for a
//! [`CellEditor`] handle, positions and seeds it, and reads its value back
//! on commit. Hosts wrap their own widgets in [`CellEditor`]; headless use
//! and tests get [`ValueEditor`] from [`DefaultEditorFactory`].

use std::collections::HashSet;

use objectlist_core::Rect;

use crate::aspect::Reflect;
use crate::column::Column;
use crate::value::AspectValue;

/// Maximum number of rows scanned for text autocomplete suggestions.
pub const AUTOCOMPLETE_ROW_LIMIT: usize = 1000;

/// Which kind of editor suits a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    /// Checkbox-style toggle.
    Boolean,
    /// Date/time picker.
    DateTime,
    /// Signed integer stepper.
    Integer,
    /// Unsigned integer stepper.
    UnsignedInteger,
    /// Floating point editor.
    Float,
    /// Free text with autocomplete.
    Text,
}

impl EditorKind {
    /// Pick the editor kind from the runtime type of `value`.
    pub fn for_value(value: &AspectValue) -> Self {
        match value {
            AspectValue::Bool(_) => EditorKind::Boolean,
            AspectValue::DateTime(_) => EditorKind::DateTime,
            AspectValue::Int(_) => EditorKind::Integer,
            AspectValue::UInt(_) => EditorKind::UnsignedInteger,
            AspectValue::Float(_) => EditorKind::Float,
            AspectValue::Null | AspectValue::Text(_) => EditorKind::Text,
        }
    }

    /// Whether editors of this kind hold a typed value rather than text.
    pub fn has_typed_value(self) -> bool {
        !matches!(self, EditorKind::Text)
    }
}

/// Distinct display strings of `column` over the first
/// [`AUTOCOMPLETE_ROW_LIMIT`] models, in first-seen order.
pub fn autocomplete_source<'a, T, I>(column: &Column<T>, models: I) -> Vec<String>
where
    T: Reflect + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for model in models.into_iter().take(AUTOCOMPLETE_ROW_LIMIT) {
        let text = match column.get_value(model) {
            AspectValue::Text(s) => s,
            other => column.value_to_string(&other),
        };
        if seen.insert(text.clone()) {
            out.push(text);
        }
    }
    out
}

/// A live editor control.
pub trait CellEditor: Send + std::fmt::Debug {
    fn kind(&self) -> EditorKind;

    fn set_bounds(&mut self, bounds: Rect);

    fn bounds(&self) -> Rect;

    /// Give the editor a typed value. Returns `false` when the editor has no
    /// typed value slot or rejects the value, in which case the caller falls
    /// back to [`set_text`](CellEditor::set_text).
    fn set_value(&mut self, value: &AspectValue) -> bool;

    fn set_text(&mut self, text: &str);

    /// The value the editor currently shows.
    fn value(&self) -> AspectValue;

    fn focus(&mut self) {}
}

/// Everything a factory needs to build an editor for a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorRequest {
    pub kind: EditorKind,
    /// Catalog index of the column being edited.
    pub column: usize,
    /// Model index of the row being edited.
    pub model_index: usize,
    /// Suggestions for text editors; empty for other kinds.
    pub autocomplete: Vec<String>,
}

/// Creates editors for cells.
pub trait EditorFactory: Send + Sync {
    fn create_editor(&self, request: &EditorRequest) -> Box<dyn CellEditor>;
}

/// Factory producing [`ValueEditor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEditorFactory;

impl EditorFactory for DefaultEditorFactory {
    fn create_editor(&self, request: &EditorRequest) -> Box<dyn CellEditor> {
        Box::new(ValueEditor::new(request.kind).with_autocomplete(request.autocomplete.clone()))
    }
}

/// A headless editor that stores what it is given.
///
/// Text editors only accept text; the other kinds accept a typed value of
/// their own kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEditor {
    kind: EditorKind,
    bounds: Rect,
    value: AspectValue,
    text: String,
    focused: bool,
    autocomplete: Vec<String>,
}

impl ValueEditor {
    pub fn new(kind: EditorKind) -> Self {
        Self {
            kind,
            bounds: Rect::default(),
            value: AspectValue::Null,
            text: String::new(),
            focused: false,
            autocomplete: Vec::new(),
        }
    }

    pub fn with_autocomplete(mut self, suggestions: Vec<String>) -> Self {
        self.autocomplete = suggestions;
        self
    }

    pub fn autocomplete(&self) -> &[String] {
        &self.autocomplete
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl CellEditor for ValueEditor {
    fn kind(&self) -> EditorKind {
        self.kind
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_value(&mut self, value: &AspectValue) -> bool {
        if !self.kind.has_typed_value() {
            return false;
        }
        if !value.is_null() && EditorKind::for_value(value) != self.kind {
            return false;
        }
        self.value = value.clone();
        self.text = value.to_string();
        true
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        if !self.kind.has_typed_value() {
            self.value = AspectValue::Text(self.text.clone());
        }
    }

    fn value(&self) -> AspectValue {
        if self.kind.has_typed_value() {
            self.value.clone()
        } else {
            AspectValue::Text(self.text.clone())
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
