//! List-wide configuration.
//!
//! [`ListOptions`] holds every knob that is not specific to one column. It
//! round-trips through JSON and TOML, and every field has a default so a
//! config file only needs to name what it changes:
//!
//! ```
//! use objectlist::{CellEditActivation, ListOptions, ViewMode};
//!
//! let options = ListOptions::from_toml_str(
//!     r#"
//!     show_groups = true
//!     cell_edit_activation = "DoubleClick"
//!     "#,
//! )
//! .unwrap();
//! assert!(options.show_groups);
//! assert_eq!(options.cell_edit_activation, CellEditActivation::DoubleClick);
//! assert_eq!(options.view, ViewMode::Details);
//! ```

use serde::{Deserialize, Serialize};

use crate::edit::CellEditActivation;
use crate::error::ConfigError;
use crate::grouping::{DEFAULT_GROUP_ITEM_COUNT_FORMAT, DEFAULT_GROUP_ITEM_COUNT_SINGULAR_FORMAT};
use crate::sort::SortOrder;

/// How the host presents rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Rows and columns with a header.
    #[default]
    Details,
    /// Tiles showing the first column plus tile columns.
    Tile,
    LargeIcon,
    SmallIcon,
    /// A plain list with no columns.
    List,
}

impl ViewMode {
    /// Whether rows can be shown in groups in this view.
    pub fn supports_groups(self) -> bool {
        !matches!(self, ViewMode::List)
    }
}

/// Control-level settings of a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub view: ViewMode,
    pub show_groups: bool,
    /// Append the member count to group headers.
    pub show_item_count_on_groups: bool,
    /// Header template for groups of several rows. `{0}` title, `{1}` count.
    pub group_with_item_count_format: String,
    /// Header template for single-row groups.
    pub group_with_item_count_singular_format: String,
    /// Sort rows inside groups by the first column rather than the
    /// grouping column.
    pub sort_group_items_by_primary_column: bool,
    /// Always group by this catalog column, whatever column was sorted.
    pub always_group_by_column: Option<usize>,
    /// Always order groups this way, unless `None`.
    pub always_group_by_sort_order: SortOrder,
    /// Direction used when no sort has been requested yet, such as when
    /// rows are grouped before any header click.
    pub sorting: SortOrder,
    /// Tie-break column (catalog index). Defaults to the first active column.
    pub secondary_sort_column: Option<usize>,
    pub secondary_sort_order: SortOrder,
    pub cell_edit_activation: CellEditActivation,
    pub checkboxes: bool,
    /// Width kept free of filling columns, in pixels.
    pub layout_margin: i32,
    /// Row height used to compute cell bounds, in pixels.
    pub row_height: i32,
    pub show_sort_indicators: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            view: ViewMode::Details,
            show_groups: false,
            show_item_count_on_groups: false,
            group_with_item_count_format: DEFAULT_GROUP_ITEM_COUNT_FORMAT.to_owned(),
            group_with_item_count_singular_format: DEFAULT_GROUP_ITEM_COUNT_SINGULAR_FORMAT
                .to_owned(),
            sort_group_items_by_primary_column: true,
            always_group_by_column: None,
            always_group_by_sort_order: SortOrder::None,
            sorting: SortOrder::None,
            secondary_sort_column: None,
            secondary_sort_order: SortOrder::Ascending,
            cell_edit_activation: CellEditActivation::None,
            checkboxes: false,
            layout_margin: 2,
            row_height: 20,
            show_sort_indicators: true,
        }
    }
}

impl ListOptions {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
