//! Column model: how one aspect of a model object is read, shown, grouped,
//! edited and sized.
//!
//! Columns are built with [`Column::new`] and the `with_*` methods:
//!
//! ```
//! use objectlist::{AspectValue, Column, Member, Reflect};
//!
//! struct Employee {
//!     salary: u32,
//! }
//!
//! impl Reflect for Employee {
//!     fn member(&self, name: &str) -> Option<Member<'_>> {
//!         (name == "Salary").then(|| Member::Value(self.salary.into()))
//!     }
//! }
//!
//! let mut salary = Column::<Employee>::new("Salary", "Salary")
//!     .with_format("${0}")
//!     .with_min_width(40)
//!     .with_free_space_proportion(1);
//! salary
//!     .make_groupies(vec![20_000u32, 100_000], vec!["Lowly", "Middle", "Rarefied"])
//!     .unwrap();
//!
//! let e = Employee { salary: 55_000 };
//! assert_eq!(salary.get_string_value(&e), "$55000");
//! let key = salary.get_group_key(&e);
//! assert_eq!(salary.get_group_title(&key), "Middle");
//! ```

use std::fmt;
use std::sync::Arc;

use objectlist_core::logging::targets;

use crate::aspect::{AspectPath, Reflect};
use crate::error::{AspectError, ColumnError};
use crate::format;
use crate::layout::WidthConstraint;
use crate::value::{AspectValue, ImageSelector};

/// Reads an aspect directly, bypassing path resolution.
pub type AspectGetter<T> = Arc<dyn Fn(&T) -> AspectValue + Send + Sync>;
/// Writes an aspect directly, bypassing path resolution.
pub type AspectPutter<T> = Arc<dyn Fn(&mut T, AspectValue) + Send + Sync>;
/// Turns a value (or group key) into display text.
pub type ValueConverter = Arc<dyn Fn(&AspectValue) -> String + Send + Sync>;
/// Chooses the image for a cell.
pub type ImageGetter<T> = Arc<dyn Fn(&T) -> ImageSelector + Send + Sync>;

/// Default width of a new column, in pixels.
pub const DEFAULT_COLUMN_WIDTH: i32 = 60;

/// Where a column's value comes from.
enum ValueSource<T> {
    Getter(AspectGetter<T>),
    Path(AspectPath),
    Nothing,
}

impl<T> Clone for ValueSource<T> {
    fn clone(&self) -> Self {
        match self {
            ValueSource::Getter(g) => ValueSource::Getter(g.clone()),
            ValueSource::Path(p) => ValueSource::Path(p.clone()),
            ValueSource::Nothing => ValueSource::Nothing,
        }
    }
}

impl<T: Reflect> ValueSource<T> {
    fn get(&self, model: &T) -> AspectValue {
        match self {
            ValueSource::Getter(getter) => getter(model),
            ValueSource::Path(path) => path.get(model),
            ValueSource::Nothing => AspectValue::Null,
        }
    }
}

/// One column of the list.
pub struct Column<T> {
    title: String,
    aspect_name: String,
    aspect: Option<AspectPath>,
    getter: Option<AspectGetter<T>>,
    putter: Option<AspectPutter<T>>,
    converter: Option<ValueConverter>,
    format: Option<String>,
    group_key_getter: Option<AspectGetter<T>>,
    group_key_to_title: Option<ValueConverter>,
    use_initial_letter_for_group: bool,
    group_with_item_count_format: Option<String>,
    group_with_item_count_singular_format: Option<String>,
    image_getter: Option<ImageGetter<T>>,
    image_key: Option<String>,
    image_index: Option<usize>,
    is_visible: bool,
    is_editable: bool,
    is_tile_view_column: bool,
    sortable: bool,
    width: i32,
    min_width: i32,
    max_width: i32,
    free_space_proportion: u32,
    display_index: i32,
    last_display_index: i32,
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("aspect", &self.aspect_name)
            .field("visible", &self.is_visible)
            .field("editable", &self.is_editable)
            .field("width", &self.width)
            .field("min_width", &self.min_width)
            .field("max_width", &self.max_width)
            .field("free_space_proportion", &self.free_space_proportion)
            .field("display_index", &self.display_index)
            .finish_non_exhaustive()
    }
}

impl<T> Column<T> {
    /// Create a column showing the aspect at the dotted path `aspect`.
    ///
    /// An empty aspect name leaves the column without a value source until a
    /// getter is installed; it then shows empty cells.
    pub fn new(title: impl Into<String>, aspect: impl Into<String>) -> Self {
        let aspect_name = aspect.into();
        let aspect = match AspectPath::parse(&aspect_name) {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::trace!(target: targets::ASPECT, error = %err, "column has no aspect path");
                None
            }
        };
        Self {
            title: title.into(),
            aspect_name,
            aspect,
            getter: None,
            putter: None,
            converter: None,
            format: None,
            group_key_getter: None,
            group_key_to_title: None,
            use_initial_letter_for_group: false,
            group_with_item_count_format: None,
            group_with_item_count_singular_format: None,
            image_getter: None,
            image_key: None,
            image_index: None,
            is_visible: true,
            is_editable: true,
            is_tile_view_column: false,
            sortable: true,
            width: DEFAULT_COLUMN_WIDTH,
            min_width: -1,
            max_width: -1,
            free_space_proportion: 0,
            display_index: -1,
            last_display_index: -1,
        }
    }

    // -------------------------------------------------------------------------
    // Builder methods
    // -------------------------------------------------------------------------

    /// Read the aspect with `getter` instead of the path.
    pub fn with_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&T) -> AspectValue + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    /// Write the aspect with `putter` instead of the path.
    pub fn with_putter<F>(mut self, putter: F) -> Self
    where
        F: Fn(&mut T, AspectValue) + Send + Sync + 'static,
    {
        self.putter = Some(Arc::new(putter));
        self
    }

    /// Format non-null values with `converter`.
    pub fn with_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&AspectValue) -> String + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Format non-null values with a `{0}` template.
    pub fn with_format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }

    pub fn with_group_key_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&T) -> AspectValue + Send + Sync + 'static,
    {
        self.group_key_getter = Some(Arc::new(getter));
        self
    }

    pub fn with_group_key_to_title<F>(mut self, convert: F) -> Self
    where
        F: Fn(&AspectValue) -> String + Send + Sync + 'static,
    {
        self.group_key_to_title = Some(Arc::new(convert));
        self
    }

    /// Group string values by their upper-cased first letter.
    pub fn with_initial_letter_grouping(mut self, enabled: bool) -> Self {
        self.use_initial_letter_for_group = enabled;
        self
    }

    /// Item-count templates for this column's group headers, overriding the
    /// list-wide ones. `{0}` is the title and `{1}` the count.
    pub fn with_group_item_count_formats(
        mut self,
        plural: impl Into<String>,
        singular: impl Into<String>,
    ) -> Self {
        self.group_with_item_count_format = Some(plural.into());
        self.group_with_item_count_singular_format = Some(singular.into());
        self
    }

    pub fn with_image_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&T) -> ImageSelector + Send + Sync + 'static,
    {
        self.image_getter = Some(Arc::new(getter));
        self
    }

    pub fn with_image_key(mut self, key: impl Into<String>) -> Self {
        self.image_key = Some(key.into());
        self
    }

    pub fn with_image_index(mut self, index: usize) -> Self {
        self.image_index = Some(index);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.is_editable = editable;
        self
    }

    pub fn with_tile_view(mut self, tile: bool) -> Self {
        self.is_tile_view_column = tile;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_width(mut self, width: i32) -> Self {
        self.set_width(width);
        self
    }

    pub fn with_min_width(mut self, min_width: i32) -> Self {
        self.set_min_width(min_width);
        self
    }

    pub fn with_max_width(mut self, max_width: i32) -> Self {
        self.set_max_width(max_width);
        self
    }

    /// Fix the width: sets both bounds and the width itself.
    pub fn with_fixed_width(mut self, width: i32) -> Self {
        self.min_width = width;
        self.max_width = width;
        self.width = width;
        self
    }

    pub fn with_free_space_proportion(mut self, proportion: u32) -> Self {
        self.free_space_proportion = proportion;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The dotted aspect name this column was created with.
    pub fn aspect_name(&self) -> &str {
        &self.aspect_name
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    pub fn is_editable(&self) -> bool {
        self.is_editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.is_editable = editable;
    }

    pub fn is_tile_view_column(&self) -> bool {
        self.is_tile_view_column
    }

    pub fn set_tile_view_column(&mut self, tile: bool) {
        self.is_tile_view_column = tile;
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Set the width, clamped into `[min_width, max_width]`.
    pub fn set_width(&mut self, width: i32) {
        self.width = self.clamp_width(width);
    }

    pub fn min_width(&self) -> i32 {
        self.min_width
    }

    /// Set the lower bound (-1 for none) and clamp the current width into it.
    pub fn set_min_width(&mut self, min_width: i32) {
        self.min_width = min_width.max(-1);
        if self.min_width >= 0 && self.width < self.min_width {
            self.width = self.min_width;
        }
    }

    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    /// Set the upper bound (-1 for none) and clamp the current width into it.
    pub fn set_max_width(&mut self, max_width: i32) {
        self.max_width = max_width.max(-1);
        if self.max_width >= 0 && self.width > self.max_width {
            self.width = self.max_width;
        }
    }

    /// True when both bounds are set and leave no room to resize.
    pub fn is_fixed_width(&self) -> bool {
        self.min_width >= 0 && self.max_width >= 0 && self.min_width >= self.max_width
    }

    pub fn free_space_proportion(&self) -> u32 {
        self.free_space_proportion
    }

    pub fn set_free_space_proportion(&mut self, proportion: u32) {
        self.free_space_proportion = proportion;
    }

    /// Whether the column takes a share of unoccupied width.
    pub fn fills_free_space(&self) -> bool {
        self.free_space_proportion > 0
    }

    /// Position in display order while the column is active, else -1.
    pub fn display_index(&self) -> i32 {
        self.display_index
    }

    pub(crate) fn set_display_index(&mut self, index: i32) {
        self.display_index = index;
    }

    /// Last known display position, kept while the column is hidden.
    pub fn last_display_index(&self) -> i32 {
        self.last_display_index
    }

    pub fn set_last_display_index(&mut self, index: i32) {
        self.last_display_index = index;
    }

    pub fn group_item_count_format(&self) -> Option<&str> {
        self.group_with_item_count_format.as_deref()
    }

    pub fn group_item_count_singular_format(&self) -> Option<&str> {
        self.group_with_item_count_singular_format.as_deref()
    }

    pub(crate) fn width_constraint(&self) -> WidthConstraint {
        WidthConstraint {
            width: self.width,
            min_width: self.min_width,
            max_width: self.max_width,
            proportion: self.free_space_proportion,
        }
    }

    fn clamp_width(&self, width: i32) -> i32 {
        let mut width = width.max(0);
        if self.min_width >= 0 {
            width = width.max(self.min_width);
        }
        if self.max_width >= 0 {
            width = width.min(self.max_width);
        }
        width
    }

    fn value_source(&self) -> ValueSource<T> {
        match (&self.getter, &self.aspect) {
            (Some(getter), _) => ValueSource::Getter(getter.clone()),
            (None, Some(path)) => ValueSource::Path(path.clone()),
            (None, None) => ValueSource::Nothing,
        }
    }

    /// Format a value the way this column shows it.
    pub fn value_to_string(&self, value: &AspectValue) -> String {
        format::value_to_string(value, self.converter.as_deref(), self.format.as_deref())
    }

    /// Turn a group key into a header title.
    pub fn get_group_title(&self, key: &AspectValue) -> String {
        match &self.group_key_to_title {
            Some(convert) => convert(key),
            None => self.value_to_string(key),
        }
    }
}

impl<T: Reflect> Column<T> {
    /// Read this column's aspect from `model`.
    pub fn get_value(&self, model: &T) -> AspectValue {
        match (&self.getter, &self.aspect) {
            (Some(getter), _) => getter(model),
            (None, Some(path)) => path.get(model),
            (None, None) => AspectValue::Null,
        }
    }

    /// Read and format this column's aspect.
    pub fn get_string_value(&self, model: &T) -> String {
        self.value_to_string(&self.get_value(model))
    }

    /// Write `value` into `model`, reporting why it could not be written.
    pub fn try_put_value(&self, model: &mut T, value: AspectValue) -> Result<(), AspectError> {
        match (&self.putter, &self.aspect) {
            (Some(putter), _) => {
                putter(model, value);
                Ok(())
            }
            (None, Some(path)) => path.put(model, value),
            (None, None) => Err(AspectError::EmptyPath),
        }
    }

    /// Write `value` into `model`. A failed write is logged and dropped.
    pub fn put_value(&self, model: &mut T, value: AspectValue) {
        if let Err(err) = self.try_put_value(model, value) {
            tracing::warn!(
                target: targets::ASPECT,
                column = %self.title,
                error = %err,
                "dropped write to aspect"
            );
        }
    }

    /// The key used to bucket `model` into a group.
    pub fn get_group_key(&self, model: &T) -> AspectValue {
        if let Some(getter) = &self.group_key_getter {
            return getter(model);
        }
        let key = self.get_value(model);
        if self.use_initial_letter_for_group {
            if let AspectValue::Text(s) = &key {
                if let Some(first) = s.chars().next() {
                    return AspectValue::Text(first.to_uppercase().collect());
                }
            }
        }
        key
    }

    /// The image a cell of this column shows for `model`.
    pub fn get_image(&self, model: &T) -> ImageSelector {
        if let Some(getter) = &self.image_getter {
            return getter(model);
        }
        if let Some(key) = self.image_key.as_ref().filter(|k| !k.is_empty()) {
            return ImageSelector::Key(key.clone());
        }
        match self.image_index {
            Some(index) => ImageSelector::Index(index),
            None => ImageSelector::None,
        }
    }
}

impl<T: Reflect + 'static> Column<T> {
    /// Bucket rows by thresholds.
    ///
    /// A value is put in bucket `i` for the first threshold it is strictly
    /// less than, or in the last bucket if it is not less than any. Null
    /// values get a null key and an empty title. There must be one more label
    /// than thresholds.
    pub fn make_groupies<V, L>(&mut self, thresholds: Vec<V>, labels: Vec<L>) -> Result<(), ColumnError>
    where
        V: Into<AspectValue>,
        L: Into<String>,
    {
        if labels.len() != thresholds.len() + 1 {
            return Err(ColumnError::GroupieLengths {
                thresholds: thresholds.len(),
                labels: labels.len(),
            });
        }
        let thresholds: Vec<AspectValue> = thresholds.into_iter().map(Into::into).collect();
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let last = labels.len() - 1;

        let source = self.value_source();
        self.group_key_getter = Some(Arc::new(move |model: &T| {
            let value = source.get(model);
            if value.is_null() {
                return AspectValue::Null;
            }
            let index = thresholds
                .iter()
                .position(|t| value.natural_cmp(t) == Some(std::cmp::Ordering::Less))
                .unwrap_or(last);
            AspectValue::Int(index as i64)
        }));
        self.group_key_to_title = Some(Arc::new(move |key: &AspectValue| {
            key.as_i64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Member;

    #[derive(Debug, Clone, PartialEq)]
    struct City {
        name: String,
        population: Option<u64>,
    }

    impl Reflect for City {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Name" => Some(Member::Value(self.name.clone().into())),
                "Population" => Some(Member::Value(self.population.into())),
                _ => None,
            }
        }

        fn set_member(&mut self, name: &str, value: AspectValue) -> Result<(), AspectError> {
            match (name, value) {
                ("Name", AspectValue::Text(s)) => {
                    self.name = s;
                    Ok(())
                }
                ("Name", v) => Err(AspectError::type_mismatch(name, "String", v.type_name())),
                _ => Err(AspectError::read_only(name, "City")),
            }
        }
    }

    fn city(name: &str, population: Option<u64>) -> City {
        City {
            name: name.into(),
            population,
        }
    }

    #[test]
    fn test_get_value_via_path_and_getter() {
        let c = city("Lyon", Some(500));
        let by_path = Column::<City>::new("Name", "Name");
        assert_eq!(by_path.get_value(&c), AspectValue::from("Lyon"));

        let by_getter = Column::<City>::new("Name", "Name")
            .with_getter(|c: &City| AspectValue::from(c.name.len() as u64));
        assert_eq!(by_getter.get_value(&c), AspectValue::UInt(4));

        let nothing = Column::<City>::new("Blank", "");
        assert_eq!(nothing.get_value(&c), AspectValue::Null);
    }

    #[test]
    fn test_string_value_formatting() {
        let c = city("Lyon", Some(500));
        let pop = Column::<City>::new("Pop", "Population").with_format("{0} people");
        assert_eq!(pop.get_string_value(&c), "500 people");
        assert_eq!(pop.get_string_value(&city("Nowhere", None)), "");
    }

    #[test]
    fn test_put_value_via_path_and_putter() {
        let mut c = city("Lyon", None);
        let name = Column::<City>::new("Name", "Name");
        name.put_value(&mut c, AspectValue::from("Nice"));
        assert_eq!(c.name, "Nice");

        name.put_value(&mut c, AspectValue::Int(3));
        assert_eq!(c.name, "Nice");

        let pop = Column::<City>::new("Pop", "Population")
            .with_putter(|c: &mut City, v| c.population = v.as_i64().map(|n| n as u64));
        pop.put_value(&mut c, AspectValue::Int(9));
        assert_eq!(c.population, Some(9));
    }

    #[test]
    fn test_try_put_value_reports_read_only() {
        let mut c = city("Lyon", None);
        let pop = Column::<City>::new("Pop", "Population");
        assert_eq!(
            pop.try_put_value(&mut c, AspectValue::Int(1)),
            Err(AspectError::read_only("Population", "City"))
        );
    }

    #[test]
    fn test_initial_letter_grouping() {
        let col = Column::<City>::new("Name", "Name").with_initial_letter_grouping(true);
        assert_eq!(col.get_group_key(&city("lyon", None)), AspectValue::from("L"));
        assert_eq!(col.get_group_key(&city("", None)), AspectValue::from(""));
    }

    #[test]
    fn test_group_title_uses_converter_on_key() {
        let col = Column::<City>::new("Name", "Name")
            .with_group_key_to_title(|k: &AspectValue| format!("City {k}"));
        assert_eq!(col.get_group_title(&AspectValue::from("Lyon")), "City Lyon");

        let plain = Column::<City>::new("Name", "Name").with_format("<{0}>");
        assert_eq!(plain.get_group_title(&AspectValue::from("Lyon")), "<Lyon>");
        assert_eq!(plain.get_group_title(&AspectValue::Null), "");
    }

    #[test]
    fn test_width_constraints_clamp() {
        let mut col = Column::<City>::new("Name", "Name").with_width(100);
        col.set_max_width(80);
        assert_eq!(col.width(), 80);
        col.set_min_width(90);
        assert_eq!(col.width(), 90);
        assert!(col.is_fixed_width());
        col.set_max_width(-1);
        assert!(!col.is_fixed_width());
        col.set_width(10);
        assert_eq!(col.width(), 90);
    }

    #[test]
    fn test_fixed_width_builder() {
        let col = Column::<City>::new("Flag", "").with_fixed_width(16);
        assert!(col.is_fixed_width());
        assert_eq!(col.width(), 16);
        assert!(!col.fills_free_space());
    }

    #[test]
    fn test_make_groupies_buckets() {
        let mut col = Column::<City>::new("Pop", "Population");
        col.make_groupies(vec![100u64, 1000], vec!["Village", "Town", "City"])
            .unwrap();

        let title = |pop| col.get_group_title(&col.get_group_key(&city("x", pop)));
        assert_eq!(title(Some(5)), "Village");
        assert_eq!(title(Some(100)), "Town");
        assert_eq!(title(Some(999)), "Town");
        assert_eq!(title(Some(1000)), "City");
        assert_eq!(title(None), "");
        assert_eq!(col.get_group_key(&city("x", None)), AspectValue::Null);
    }

    #[test]
    fn test_make_groupies_rejects_bad_lengths() {
        let mut col = Column::<City>::new("Pop", "Population");
        let err = col
            .make_groupies(vec![1u64, 2], vec!["a", "b"])
            .unwrap_err();
        assert_eq!(
            err,
            ColumnError::GroupieLengths {
                thresholds: 2,
                labels: 2
            }
        );
    }

    #[test]
    fn test_image_selection_precedence() {
        let c = city("Lyon", None);
        let none = Column::<City>::new("Name", "Name");
        assert_eq!(none.get_image(&c), ImageSelector::None);

        let index = Column::<City>::new("Name", "Name").with_image_index(3);
        assert_eq!(index.get_image(&c), ImageSelector::Index(3));

        let key = Column::<City>::new("Name", "Name")
            .with_image_index(3)
            .with_image_key("flag");
        assert_eq!(key.get_image(&c), ImageSelector::Key("flag".into()));

        let getter = key.with_image_getter(|_: &City| ImageSelector::Index(9));
        assert_eq!(getter.get_image(&c), ImageSelector::Index(9));
    }
}
