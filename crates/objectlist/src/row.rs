//! Row items: the rendered form of one model object.

use std::sync::Arc;

use crate::aspect::Reflect;
use crate::column::Column;
use crate::value::{CheckState, ImageSelector};

/// Adjusts a freshly filled row, e.g. to colour overdue entries.
pub type RowFormatter<T> = Arc<dyn Fn(&mut RowItem, &T) + Send + Sync>;
/// Reads a model's checkbox state.
pub type CheckStateGetter<T> = Arc<dyn Fn(&T) -> CheckState + Send + Sync>;
/// Writes a model's checkbox state, returning the state actually stored.
pub type CheckStatePutter<T> = Arc<dyn Fn(&mut T, CheckState) -> CheckState + Send + Sync>;

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub text: String,
    pub image: ImageSelector,
}

/// Visual attributes a row formatter may change. Colours are `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowStyle {
    pub foreground: Option<u32>,
    pub background: Option<u32>,
    pub bold: bool,
}

/// The presentation record binding a model object to its cells.
///
/// Items are created fresh on every rebuild and refer to their model by
/// index into the list's object collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    model_index: usize,
    pub cells: Vec<Cell>,
    pub check_state: CheckState,
    pub selected: bool,
    pub style: RowStyle,
}

impl RowItem {
    pub fn new(model_index: usize) -> Self {
        Self {
            model_index,
            cells: Vec::new(),
            check_state: CheckState::Unchecked,
            selected: false,
            style: RowStyle::default(),
        }
    }

    /// Index of the model object in the list's collection.
    pub fn model_index(&self) -> usize {
        self.model_index
    }

    /// Text of the cell at `column` (position among the active columns).
    pub fn text(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(|c| c.text.as_str())
    }
}

/// Fills row items from their models.
pub struct RowFiller<'a, T> {
    /// Active columns in index order.
    pub columns: Vec<&'a Column<T>>,
    pub row_formatter: Option<&'a RowFormatter<T>>,
    pub check_state_getter: Option<&'a CheckStateGetter<T>>,
    pub checkboxes: bool,
}

impl<'a, T: Reflect> RowFiller<'a, T> {
    /// Rewrite `item`'s cells, style and check state from `model`.
    ///
    /// Touches nothing but `item`, so it can refresh a single row.
    pub fn fill(&self, item: &mut RowItem, model: &T) {
        item.cells.clear();
        item.cells.extend(self.columns.iter().map(|column| Cell {
            text: column.get_string_value(model),
            image: column.get_image(model),
        }));
        item.style = RowStyle::default();
        if let Some(format_row) = self.row_formatter {
            format_row(item, model);
        }
        if self.checkboxes {
            if let Some(getter) = self.check_state_getter {
                item.check_state = getter(model);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Member;
    use crate::value::AspectValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        title: &'static str,
        done: Option<bool>,
        overdue: bool,
    }

    impl Reflect for Task {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Title" => Some(Member::Value(self.title.into())),
                "Done" => Some(Member::Value(self.done.into())),
                _ => None,
            }
        }
    }

    fn task() -> Task {
        Task {
            title: "Ship",
            done: None,
            overdue: true,
        }
    }

    #[test]
    fn test_fill_writes_cells_in_column_order() {
        let title = Column::<Task>::new("Title", "Title").with_image_key("task");
        let done = Column::<Task>::new("Done", "Done");
        let filler = RowFiller {
            columns: vec![&title, &done],
            row_formatter: None,
            check_state_getter: None,
            checkboxes: false,
        };
        let mut item = RowItem::new(0);
        filler.fill(&mut item, &task());
        assert_eq!(item.text(0), Some("Ship"));
        assert_eq!(item.text(1), Some(""));
        assert_eq!(item.cells[0].image, ImageSelector::Key("task".into()));
        assert_eq!(item.cells.len(), 2);
    }

    #[test]
    fn test_fill_is_idempotent() {
        let title = Column::<Task>::new("Title", "Title");
        let filler = RowFiller {
            columns: vec![&title],
            row_formatter: None,
            check_state_getter: None,
            checkboxes: false,
        };
        let mut item = RowItem::new(0);
        filler.fill(&mut item, &task());
        let first = item.clone();
        filler.fill(&mut item, &task());
        assert_eq!(item, first);
    }

    #[test]
    fn test_formatter_and_check_state() {
        let title = Column::<Task>::new("Title", "Title");
        let formatter: RowFormatter<Task> = Arc::new(|item, task| {
            if task.overdue {
                item.style.foreground = Some(0xFF0000);
            }
        });
        let getter: CheckStateGetter<Task> = Arc::new(|t| {
            let done = match Column::<Task>::new("", "Done").get_value(t) {
                AspectValue::Bool(b) => Some(b),
                _ => None,
            };
            CheckState::from_option(done)
        });
        let filler = RowFiller {
            columns: vec![&title],
            row_formatter: Some(&formatter),
            check_state_getter: Some(&getter),
            checkboxes: true,
        };
        let mut item = RowItem::new(3);
        filler.fill(&mut item, &task());
        assert_eq!(item.style.foreground, Some(0xFF0000));
        assert_eq!(item.check_state, CheckState::Indeterminate);
        assert_eq!(item.model_index(), 3);
    }
}
