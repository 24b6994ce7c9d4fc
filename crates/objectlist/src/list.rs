//! The list engine.
//!
//! [`ObjectListView`] owns a catalog of [`Column`]s and a shared collection of
//! model objects, and keeps a display-ordered vector of [`RowItem`]s in step
//! with them. Everything a host widget needs to paint rows, react to clicks
//! and keys, and persist its layout goes through this type; the widget itself
//! stays a thin shell.
//!
//! # Threading
//!
//! A list belongs to the thread that created it. Other threads talk to it
//! through a [`ListHandle`], whose calls are queued and applied when the
//! owner calls [`ObjectListView::process_pending`]. Work the list defers to
//! itself, such as re-opening an editor after Tab or announcing a selection
//! change, runs from the same call.
//!
//! # Copy-on-write
//!
//! The collection is held as `Arc<Vec<T>>`. [`ObjectListView::shared_objects`]
//! hands out a cheap snapshot; later mutations copy the collection first when
//! a snapshot is still alive, so readers never see a partial update.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use objectlist_core::logging::{PerfSpan, span_names, targets};
use objectlist_core::{CancellableSignal, Mailbox, Poster, Rect, Signal, TaskQueue, ThreadAffinity};

use crate::aspect::Reflect;
use crate::column::Column;
use crate::edit::{
    CellEditActivation, CellEditEventArgs, EditSession, EditState, Key, KeyEvent, PointerEvent,
    next_editable_column, should_start_edit,
};
use crate::editor::{
    CellEditor, DefaultEditorFactory, EditorFactory, EditorKind, EditorRequest, autocomplete_source,
};
use crate::error::StateError;
use crate::events::{
    AfterSortingEventArgs, BeforeSortingEventArgs, ItemsAddingEventArgs, ItemsChangedEventArgs,
    ItemsChangingEventArgs, ItemsRemovingEventArgs,
};
use crate::grouping::{GroupingPlan, ItemCountFormats, ListGroup, build_groups};
use crate::layout;
use crate::options::{ListOptions, ViewMode};
use crate::row::{CheckStateGetter, CheckStatePutter, RowFiller, RowFormatter, RowItem};
use crate::sort::{RowComparator, SortOrder};
use crate::state::{ColumnState, ListState, STATE_VERSION};
use crate::value::{AspectValue, CheckState};

/// Replaces the built-in comparison when rows are not grouped. Receives the
/// catalog index of the sort column and the direction.
///
/// The function must be a total order, as for [`slice::sort_by`]: a
/// comparator that is inconsistent across calls can panic the sort.
pub type CustomSorter<T> = Arc<dyn Fn(&T, &T, usize, SortOrder) -> Ordering + Send + Sync>;

/// A collection change queued from another thread.
#[derive(Debug)]
pub enum Mutation<T> {
    Set(Arc<Vec<T>>),
    Add(Vec<T>),
    Remove(Vec<T>),
    Refresh(Vec<T>),
    Update(Vec<T>),
    Clear,
}

/// Sends collection changes to a list from any thread.
pub struct ListHandle<T> {
    poster: Poster<Mutation<T>>,
}

impl<T> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        Self {
            poster: self.poster.clone(),
        }
    }
}

impl<T> fmt::Debug for ListHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListHandle").finish_non_exhaustive()
    }
}

impl<T> ListHandle<T> {
    /// Queue a mutation. Returns `false` if the list has been dropped.
    pub fn post(&self, mutation: Mutation<T>) -> bool {
        self.poster.post(mutation)
    }

    pub fn set_objects(&self, objects: Vec<T>) -> bool {
        self.post(Mutation::Set(Arc::new(objects)))
    }

    pub fn add_objects(&self, objects: Vec<T>) -> bool {
        self.post(Mutation::Add(objects))
    }

    pub fn remove_objects(&self, objects: Vec<T>) -> bool {
        self.post(Mutation::Remove(objects))
    }

    pub fn refresh_objects(&self, objects: Vec<T>) -> bool {
        self.post(Mutation::Refresh(objects))
    }

    pub fn incremental_update(&self, objects: Vec<T>) -> bool {
        self.post(Mutation::Update(objects))
    }

    pub fn clear_objects(&self) -> bool {
        self.post(Mutation::Clear)
    }
}

/// Work the list schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredWork {
    StartEdit { model_index: usize, column: usize },
    SelectionChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowState {
    selected: bool,
    check_state: CheckState,
}

/// Events raised by a list.
pub struct ListSignals<T> {
    pub items_adding: CancellableSignal<ItemsAddingEventArgs<T>>,
    pub items_removing: CancellableSignal<ItemsRemovingEventArgs<T>>,
    pub items_changing: CancellableSignal<ItemsChangingEventArgs<T>>,
    pub items_changed: Signal<ItemsChangedEventArgs>,
    /// Raised once per batch of selection changes, from
    /// [`ObjectListView::process_pending`].
    pub selection_changed: Signal<()>,
    pub before_sorting: CancellableSignal<BeforeSortingEventArgs>,
    pub after_sorting: Signal<AfterSortingEventArgs>,
    /// Cancelling refuses the edit; handlers may swap the editor.
    pub cell_edit_starting: CancellableSignal<CellEditEventArgs>,
    /// Cancelling rejects the value and keeps the editor open.
    pub cell_edit_validating: CancellableSignal<CellEditEventArgs>,
    /// Cancelling skips the write-back. Raised with `cancelled` already set
    /// when the user abandoned the edit.
    pub cell_edit_finishing: CancellableSignal<CellEditEventArgs>,
}

impl<T> Default for ListSignals<T> {
    fn default() -> Self {
        Self {
            items_adding: CancellableSignal::new(),
            items_removing: CancellableSignal::new(),
            items_changing: CancellableSignal::new(),
            items_changed: Signal::new(),
            selection_changed: Signal::new(),
            before_sorting: CancellableSignal::new(),
            after_sorting: Signal::new(),
            cell_edit_starting: CancellableSignal::new(),
            cell_edit_validating: CancellableSignal::new(),
            cell_edit_finishing: CancellableSignal::new(),
        }
    }
}

impl<T> fmt::Debug for ListSignals<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSignals").finish_non_exhaustive()
    }
}

/// A data-bound list of model objects shown through aspect columns.
pub struct ObjectListView<T> {
    options: ListOptions,
    /// Every column, whether shown or not.
    all_columns: Vec<Column<T>>,
    /// Catalog indices of the columns shown in the current view, in
    /// catalog order. Cells of a row follow this order.
    columns: Vec<usize>,
    objects: Arc<Vec<T>>,
    /// Rows in display order.
    items: Vec<RowItem>,
    groups: Vec<ListGroup>,
    last_sort_column: Option<usize>,
    last_sort_order: SortOrder,
    viewport_width: Option<i32>,
    freeze_count: u32,
    /// A sort ran while frozen and its after-sorting event is owed.
    sorted_while_frozen: bool,
    /// Row states waiting for the list to be unfrozen.
    pending_states: Option<Vec<Option<RowState>>>,
    focused_row: Option<usize>,
    edit_state: EditState,
    edit: Option<EditSession>,
    editor_factory: Arc<dyn EditorFactory>,
    custom_sorter: Option<CustomSorter<T>>,
    row_formatter: Option<RowFormatter<T>>,
    check_state_getter: Option<CheckStateGetter<T>>,
    check_state_putter: Option<CheckStatePutter<T>>,
    deferred: TaskQueue<DeferredWork>,
    mailbox: Mailbox<Mutation<T>>,
    affinity: ThreadAffinity,
    signals: ListSignals<T>,
}

impl<T> fmt::Debug for ObjectListView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectListView")
            .field("view", &self.options.view)
            .field("columns", &self.columns)
            .field("objects", &self.objects.len())
            .field("rows", &self.items.len())
            .field("groups", &self.groups.len())
            .field("sort", &(self.last_sort_column, self.last_sort_order))
            .field("edit_state", &self.edit_state)
            .finish_non_exhaustive()
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl<T> ObjectListView<T>
where
    T: Reflect + Clone + PartialEq + 'static,
{
    /// Create an empty list with default options.
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self::with_options(columns, ListOptions::default())
    }

    pub fn with_options(columns: Vec<Column<T>>, options: ListOptions) -> Self {
        let mut list = Self {
            options,
            all_columns: columns,
            columns: Vec::new(),
            objects: Arc::new(Vec::new()),
            items: Vec::new(),
            groups: Vec::new(),
            last_sort_column: None,
            last_sort_order: SortOrder::None,
            viewport_width: None,
            freeze_count: 0,
            sorted_while_frozen: false,
            pending_states: None,
            focused_row: None,
            edit_state: EditState::Idle,
            edit: None,
            editor_factory: Arc::new(DefaultEditorFactory),
            custom_sorter: None,
            row_formatter: None,
            check_state_getter: None,
            check_state_putter: None,
            deferred: TaskQueue::new(),
            mailbox: Mailbox::new(),
            affinity: ThreadAffinity::current(),
            signals: ListSignals::default(),
        };
        list.apply_filtered_columns();
        list
    }

    pub fn signals(&self) -> &ListSignals<T> {
        &self.signals
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Replace every option and rebuild columns and rows.
    pub fn set_options(&mut self, options: ListOptions) {
        self.cancel_cell_edit();
        self.remember_display_indices();
        self.options = options;
        self.apply_filtered_columns();
    }

    pub fn set_cell_edit_activation(&mut self, activation: CellEditActivation) {
        self.options.cell_edit_activation = activation;
    }

    pub fn set_editor_factory(&mut self, factory: impl EditorFactory + 'static) {
        self.editor_factory = Arc::new(factory);
    }

    pub fn set_row_formatter<F>(&mut self, formatter: F)
    where
        F: Fn(&mut RowItem, &T) + Send + Sync + 'static,
    {
        self.row_formatter = Some(Arc::new(formatter));
        self.build_list();
    }

    /// Replace the built-in row comparison for ungrouped sorts.
    pub fn set_custom_sorter<F>(&mut self, sorter: F)
    where
        F: Fn(&T, &T, usize, SortOrder) -> Ordering + Send + Sync + 'static,
    {
        self.custom_sorter = Some(Arc::new(sorter));
    }

    pub fn clear_custom_sorter(&mut self) {
        self.custom_sorter = None;
    }

    // ------------------------------------------------------------------
    // Threading
    // ------------------------------------------------------------------

    /// A handle for changing the collection from other threads.
    pub fn handle(&self) -> ListHandle<T> {
        ListHandle {
            poster: self.mailbox.poster(),
        }
    }

    /// Make the calling thread the owner, after the list has been moved.
    pub fn adopt_current_thread(&mut self) {
        self.affinity = ThreadAffinity::current();
    }

    /// Whether queued mutations or deferred work are waiting.
    pub fn has_pending_work(&self) -> bool {
        self.mailbox.pending_count() > 0 || self.deferred.has_pending()
    }

    /// Apply queued mutations, then run deferred work. Returns how many
    /// entries were processed.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        for mutation in self.mailbox.drain() {
            self.apply_mutation(mutation);
            processed += 1;
        }
        for work in self.deferred.take_all() {
            match work {
                DeferredWork::StartEdit {
                    model_index,
                    column,
                } => {
                    if let Some(row) = self.row_of_model_index(model_index) {
                        self.edit_sub_item(row, column);
                    }
                }
                DeferredWork::SelectionChanged => self.signals.selection_changed.emit(()),
            }
            processed += 1;
        }
        processed
    }

    /// Queue `mutation` if called off the owning thread.
    fn marshal(&self, mutation: Mutation<T>) -> Option<Mutation<T>> {
        if self.affinity.is_same_thread() {
            return Some(mutation);
        }
        tracing::debug!(
            target: targets::TASK,
            owner = ?self.affinity.thread_id(),
            "called off the owning thread, queueing mutation"
        );
        self.mailbox.poster().post(mutation);
        None
    }

    fn apply_mutation(&mut self, mutation: Mutation<T>) {
        match mutation {
            Mutation::Set(objects) => self.replace_objects(objects, false),
            Mutation::Add(objects) => self.apply_add(objects),
            Mutation::Remove(objects) => self.apply_remove(objects),
            Mutation::Refresh(objects) => self.apply_refresh(&objects),
            Mutation::Update(objects) => self.replace_objects(Arc::new(objects), true),
            Mutation::Clear => self.replace_objects(Arc::new(Vec::new()), false),
        }
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    pub fn objects(&self) -> &[T] {
        &self.objects
    }

    /// A snapshot of the collection that later mutations will not touch.
    pub fn shared_objects(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.objects)
    }

    /// Replace the whole collection. Selection and check states are reset.
    pub fn set_objects(&mut self, objects: impl Into<Arc<Vec<T>>>) {
        if let Some(Mutation::Set(objects)) = self.marshal(Mutation::Set(objects.into())) {
            self.replace_objects(objects, false);
        }
    }

    /// Append objects and re-sort.
    pub fn add_objects(&mut self, objects: Vec<T>) {
        if let Some(Mutation::Add(objects)) = self.marshal(Mutation::Add(objects)) {
            self.apply_add(objects);
        }
    }

    /// Remove the first occurrence of each given object. Objects not in the
    /// list are ignored.
    pub fn remove_objects(&mut self, objects: Vec<T>) {
        if let Some(Mutation::Remove(objects)) = self.marshal(Mutation::Remove(objects)) {
            self.apply_remove(objects);
        }
    }

    pub fn clear_objects(&mut self) {
        if self.marshal(Mutation::Clear).is_some() {
            self.replace_objects(Arc::new(Vec::new()), false);
        }
    }

    /// Re-read the rows showing the given objects.
    pub fn refresh_objects(&mut self, objects: &[T]) {
        if self.affinity.is_same_thread() {
            self.apply_refresh(objects);
        } else {
            self.marshal(Mutation::Refresh(objects.to_vec()));
        }
    }

    /// Replace the collection, keeping the selection and check state of
    /// objects present before and after.
    pub fn incremental_update(&mut self, objects: Vec<T>) {
        if let Some(Mutation::Update(objects)) = self.marshal(Mutation::Update(objects)) {
            self.replace_objects(Arc::new(objects), true);
        }
    }

    fn replace_objects(&mut self, objects: Arc<Vec<T>>, keep_state: bool) {
        let old_count = self.objects.len();
        let mut args = ItemsChangingEventArgs {
            old_count,
            new_objects: objects,
            cancelled: false,
        };
        if self.signals.items_changing.emit(&mut args) {
            tracing::trace!(target: targets::OBJECTS, "collection change cancelled");
            return;
        }
        self.cancel_cell_edit();
        let states = if keep_state {
            let carried = self.carried_indices(&args.new_objects);
            self.remap_pending_edits(&carried);
            self.states_for(&carried, args.new_objects.len())
        } else {
            self.deferred
                .cancel_where(|work| matches!(work, DeferredWork::StartEdit { .. }));
            vec![None; args.new_objects.len()]
        };
        self.objects = args.new_objects;
        self.rebuild_items(states);
        self.notify_changed(old_count);
    }

    fn apply_add(&mut self, objects: Vec<T>) {
        if objects.is_empty() {
            return;
        }
        let mut args = ItemsAddingEventArgs {
            objects,
            cancelled: false,
        };
        if self.signals.items_adding.emit(&mut args) {
            tracing::trace!(target: targets::OBJECTS, "add cancelled");
            return;
        }
        if args.objects.is_empty() {
            return;
        }
        let old_count = self.objects.len();
        let mut states = self.row_states();
        states.resize(old_count + args.objects.len(), None);
        Arc::make_mut(&mut self.objects).extend(args.objects);
        self.rebuild_items(states);
        self.notify_changed(old_count);
    }

    fn apply_remove(&mut self, objects: Vec<T>) {
        if objects.is_empty() {
            return;
        }
        let mut args = ItemsRemovingEventArgs {
            objects,
            cancelled: false,
        };
        if self.signals.items_removing.emit(&mut args) {
            tracing::trace!(target: targets::OBJECTS, "remove cancelled");
            return;
        }

        let count = self.objects.len();
        let mut doomed = vec![false; count];
        for model in &args.objects {
            if let Some(index) = (0..count).find(|&i| !doomed[i] && self.objects[i] == *model) {
                doomed[index] = true;
            }
        }
        if !doomed.contains(&true) {
            return;
        }

        self.cancel_cell_edit();
        let old_states = self.row_states();
        let mut kept = Vec::with_capacity(count);
        let mut states = Vec::with_capacity(count);
        let mut carried = vec![None; count];
        for (index, model) in self.objects.iter().enumerate() {
            if !doomed[index] {
                carried[index] = Some(kept.len());
                kept.push(model.clone());
                states.push(old_states.get(index).copied().flatten());
            }
        }
        self.remap_pending_edits(&carried);
        self.objects = Arc::new(kept);
        self.rebuild_items(states);
        self.notify_changed(count);
    }

    fn apply_refresh(&mut self, objects: &[T]) {
        let rows: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                self.objects
                    .get(item.model_index())
                    .is_some_and(|model| objects.contains(model))
            })
            .map(|(row, _)| row)
            .collect();
        for row in rows {
            self.refresh_row(row);
        }
    }

    fn notify_changed(&self, old_count: usize) {
        let new_count = self.objects.len();
        tracing::debug!(target: targets::OBJECTS, old_count, new_count, "collection changed");
        self.signals.items_changed.emit(ItemsChangedEventArgs {
            old_count,
            new_count,
        });
    }

    /// For each current object, its index in `new_objects`, matched by
    /// equality.
    fn carried_indices(&self, new_objects: &[T]) -> Vec<Option<usize>> {
        let count = self.objects.len();
        let mut carried = vec![None; count];
        let mut used = vec![false; count];
        for (new_index, model) in new_objects.iter().enumerate() {
            if let Some(old) = (0..count).find(|&i| !used[i] && self.objects[i] == *model) {
                used[old] = true;
                carried[old] = Some(new_index);
            }
        }
        carried
    }

    /// Row state for a collection of `len` objects, carried over by index.
    fn states_for(&self, carried: &[Option<usize>], len: usize) -> Vec<Option<RowState>> {
        let old = self.row_states();
        let mut states = vec![None; len];
        for (old_index, new_index) in carried.iter().enumerate() {
            if let Some(slot) = new_index.and_then(|n| states.get_mut(n)) {
                *slot = old.get(old_index).copied().flatten();
            }
        }
        states
    }

    /// Point queued editor reopenings at their object's new index, dropping
    /// those whose object is gone. Appending never moves an object, so only
    /// removals and replacements need this.
    fn remap_pending_edits(&mut self, carried: &[Option<usize>]) {
        self.deferred.retain_mut(|work| match work {
            DeferredWork::StartEdit { model_index, .. } => {
                match carried.get(*model_index).copied().flatten() {
                    Some(new_index) => {
                        *model_index = new_index;
                        true
                    }
                    None => false,
                }
            }
            DeferredWork::SelectionChanged => true,
        });
    }

    /// Current row state indexed by model index.
    fn row_states(&self) -> Vec<Option<RowState>> {
        if let Some(states) = &self.pending_states {
            return states.clone();
        }
        let mut states = vec![None; self.objects.len()];
        for item in &self.items {
            if let Some(slot) = states.get_mut(item.model_index()) {
                *slot = Some(RowState {
                    selected: item.selected,
                    check_state: item.check_state,
                });
            }
        }
        states
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Rows in display order.
    pub fn items(&self) -> &[RowItem] {
        &self.items
    }

    pub fn item(&self, row: usize) -> Option<&RowItem> {
        self.items.get(row)
    }

    pub fn row_count(&self) -> usize {
        self.items.len()
    }

    /// The model shown at display row `row`.
    pub fn get_model_object(&self, row: usize) -> Option<&T> {
        self.items
            .get(row)
            .and_then(|item| self.objects.get(item.model_index()))
    }

    /// Display row of `model`.
    pub fn index_of(&self, model: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|item| self.objects.get(item.model_index()) == Some(model))
    }

    /// The row item showing `model`.
    pub fn model_to_row(&self, model: &T) -> Option<&RowItem> {
        self.index_of(model).and_then(|row| self.items.get(row))
    }

    /// The row after `row` in display order, groups included.
    pub fn next_row(&self, row: usize) -> Option<usize> {
        let next = row.checked_add(1)?;
        (next < self.items.len()).then_some(next)
    }

    pub fn previous_row(&self, row: usize) -> Option<usize> {
        row.checked_sub(1).filter(|&r| r < self.items.len())
    }

    fn row_of_model_index(&self, model_index: usize) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.model_index() == model_index)
    }

    /// Groups in display order. Empty when rows are not grouped.
    pub fn groups(&self) -> &[ListGroup] {
        &self.groups
    }

    /// Rebuild every row from the collection, applying the last sort or
    /// grouping. Selection and check state follow their objects.
    pub fn build_list(&mut self) {
        let states = self.row_states();
        self.rebuild_items(states);
    }

    /// Re-read one row from its model.
    pub fn refresh_row(&mut self, row: usize) {
        let Some(model_index) = self.items.get(row).map(RowItem::model_index) else {
            return;
        };
        if model_index >= self.objects.len() {
            return;
        }
        let mut item = std::mem::replace(&mut self.items[row], RowItem::new(model_index));
        self.row_filler().fill(&mut item, &self.objects[model_index]);
        self.items[row] = item;
    }

    fn row_filler(&self) -> RowFiller<'_, T> {
        RowFiller {
            columns: self.columns.iter().map(|&c| &self.all_columns[c]).collect(),
            row_formatter: self.row_formatter.as_ref(),
            check_state_getter: self.check_state_getter.as_ref(),
            checkboxes: self.options.checkboxes,
        }
    }

    fn rebuild_items(&mut self, states: Vec<Option<RowState>>) {
        self.lay_out(states, self.last_sort_column, self.effective_sort_order());
    }

    fn lay_out(&mut self, states: Vec<Option<RowState>>, column: Option<usize>, order: SortOrder) {
        if self.is_frozen() {
            self.pending_states = Some(states);
            return;
        }
        self.pending_states = None;
        let _span = PerfSpan::new(span_names::BUILD_LIST);
        let selected_before = self.items.iter().filter(|item| item.selected).count();

        let mut rows: Vec<usize> = (0..self.objects.len()).collect();
        let mut groups = Vec::new();
        if self.showing_groups() {
            groups = self.group_rows(column, order, &rows);
            rows = groups.iter().flat_map(|g| g.rows.iter().copied()).collect();
        } else if let Some(column) = column {
            self.sort_rows(column, order, &mut rows);
        }

        let filler = self.row_filler();
        let items: Vec<RowItem> = rows
            .into_iter()
            .filter_map(|model_index| {
                let model = self.objects.get(model_index)?;
                let mut item = RowItem::new(model_index);
                if let Some(Some(state)) = states.get(model_index) {
                    item.selected = state.selected;
                    item.check_state = state.check_state;
                }
                filler.fill(&mut item, model);
                Some(item)
            })
            .collect();

        self.items = items;
        self.groups = groups;
        if self.focused_row.is_some_and(|row| row >= self.items.len()) {
            self.focused_row = None;
        }
        if self.items.iter().filter(|item| item.selected).count() != selected_before {
            self.mark_selection_changed();
        }
        tracing::debug!(
            target: targets::OBJECTS,
            rows = self.items.len(),
            groups = self.groups.len(),
            "rebuilt rows"
        );
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Sort by the catalog column `column`.
    ///
    /// Ignored for an unknown column, for [`SortOrder::None`], and when no
    /// column is shown. The before-sorting event may redirect or cancel it.
    pub fn sort(&mut self, column: usize, order: SortOrder) {
        if column >= self.all_columns.len() || order == SortOrder::None || self.columns.is_empty() {
            tracing::trace!(target: targets::SORT, column, ?order, "sort request ignored");
            return;
        }
        let mut args = BeforeSortingEventArgs {
            column,
            order,
            cancelled: false,
        };
        if self.signals.before_sorting.emit(&mut args) {
            tracing::trace!(target: targets::SORT, "sort cancelled");
            return;
        }
        if args.column >= self.all_columns.len() || args.order == SortOrder::None {
            return;
        }

        self.last_sort_column = Some(args.column);
        self.last_sort_order = args.order;
        tracing::debug!(
            target: targets::SORT,
            column = self.all_columns[args.column].title(),
            order = ?args.order,
            "sorting"
        );
        self.build_list();
        if self.is_frozen() {
            self.sorted_while_frozen = true;
            return;
        }
        self.signals.after_sorting.emit(AfterSortingEventArgs {
            column: args.column,
            order: args.order,
        });
    }

    /// Sort again by the last column and direction.
    pub fn resort(&mut self) {
        if let Some(column) = self.last_sort_column {
            self.sort(column, self.effective_sort_order());
        }
    }

    /// The last sort direction, or the configured default before any sort.
    fn effective_sort_order(&self) -> SortOrder {
        match self.last_sort_order {
            SortOrder::None => self.options.sorting,
            order => order,
        }
    }

    pub fn last_sort_column(&self) -> Option<usize> {
        self.last_sort_column
    }

    pub fn last_sort_order(&self) -> SortOrder {
        self.last_sort_order
    }

    /// The indicator a header should draw on catalog column `column`.
    pub fn sort_indicator(&self, column: usize) -> Option<SortOrder> {
        (self.options.show_sort_indicators
            && self.last_sort_column == Some(column)
            && self.last_sort_order != SortOrder::None)
            .then_some(self.last_sort_order)
    }

    /// React to a click on the header of the active column at `position`.
    ///
    /// Clicking the sorted column flips the direction; any other sortable
    /// column sorts ascending.
    pub fn handle_column_click(&mut self, position: usize) {
        if !self.finish_cell_edit() {
            return;
        }
        let Some(&column) = self.columns.get(position) else {
            return;
        };
        if !self.all_columns[column].is_sortable() {
            return;
        }
        let order = if self.last_sort_column == Some(column) {
            self.last_sort_order.toggled()
        } else {
            SortOrder::Ascending
        };
        self.sort(column, order);
    }

    fn comparator<'a>(&'a self, column: &'a Column<T>, order: SortOrder) -> RowComparator<'a, T> {
        let comparator = RowComparator::new(column, order);
        match self.secondary_column() {
            Some(secondary) => comparator.with_secondary(secondary, self.options.secondary_sort_order),
            None => comparator,
        }
    }

    fn secondary_column(&self) -> Option<&Column<T>> {
        self.options
            .secondary_sort_column
            .filter(|&c| c < self.all_columns.len())
            .or_else(|| self.primary_column())
            .and_then(|c| self.all_columns.get(c))
    }

    fn sort_rows(&self, column: usize, order: SortOrder, rows: &mut [usize]) {
        if order == SortOrder::None {
            return;
        }
        let Some(primary) = self.all_columns.get(column) else {
            return;
        };
        let _span = PerfSpan::new(span_names::SORT);
        let objects = self.objects.as_slice();
        match &self.custom_sorter {
            Some(sorter) => rows.sort_by(|&a, &b| sorter(&objects[a], &objects[b], column, order)),
            None => self.comparator(primary, order).sort_indices(objects, rows),
        }
        tracing::trace!(target: targets::SORT, rows = rows.len(), "sorted rows");
    }

    // ------------------------------------------------------------------
    // Grouping
    // ------------------------------------------------------------------

    /// Whether rows are currently laid out in groups.
    pub fn showing_groups(&self) -> bool {
        self.options.show_groups && self.options.view.supports_groups() && !self.all_columns.is_empty()
    }

    pub fn set_show_groups(&mut self, show: bool) {
        if self.options.show_groups != show {
            self.options.show_groups = show;
            self.build_list();
        }
    }

    /// Regroup rows by `column` (catalog index) in direction `order`,
    /// without changing the remembered sort.
    pub fn build_groups(&mut self, column: Option<usize>, order: SortOrder) {
        if !self.showing_groups() {
            return;
        }
        let states = self.row_states();
        self.lay_out(states, column, order);
    }

    fn group_rows(&self, column: Option<usize>, order: SortOrder, rows: &[usize]) -> Vec<ListGroup> {
        let count = self.all_columns.len();
        let valid = |c: &usize| *c < count;
        let Some(column) = column.filter(valid).or((count > 0).then_some(0)) else {
            return Vec::new();
        };
        let _span = PerfSpan::new(span_names::BUILD_GROUPS);

        let group_column = self.options.always_group_by_column.filter(valid).unwrap_or(column);
        let group_order = match self.options.always_group_by_sort_order {
            SortOrder::None => order,
            fixed => fixed,
        };
        let item_column = if self.options.sort_group_items_by_primary_column {
            self.primary_column().unwrap_or(column)
        } else {
            column
        };

        let grouped_by = &self.all_columns[group_column];
        let item_counts = self.options.show_item_count_on_groups.then(|| ItemCountFormats {
            plural: grouped_by
                .group_item_count_format()
                .unwrap_or(&self.options.group_with_item_count_format),
            singular: grouped_by
                .group_item_count_singular_format()
                .unwrap_or(&self.options.group_with_item_count_singular_format),
        });
        let plan = GroupingPlan {
            group_column: grouped_by,
            group_order,
            item_order: self.comparator(&self.all_columns[item_column], order),
            item_counts,
        };
        build_groups(&self.objects, rows, &plan)
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    pub fn all_columns(&self) -> &[Column<T>] {
        &self.all_columns
    }

    pub fn column(&self, index: usize) -> Option<&Column<T>> {
        self.all_columns.get(index)
    }

    /// Mutable access to a catalog column. Changes to visibility or tile
    /// membership take effect at the next [`rebuild_columns`](Self::rebuild_columns).
    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column<T>> {
        self.all_columns.get_mut(index)
    }

    /// Catalog indices of the shown columns, in catalog order.
    pub fn active_columns(&self) -> &[usize] {
        &self.columns
    }

    /// The shown column at `position`.
    pub fn get_column(&self, position: usize) -> Option<&Column<T>> {
        self.columns.get(position).and_then(|&c| self.all_columns.get(c))
    }

    fn primary_column(&self) -> Option<usize> {
        self.columns.first().copied()
    }

    /// Catalog indices of the shown columns, left to right.
    pub fn display_order(&self) -> Vec<usize> {
        let mut order = self.columns.clone();
        order.sort_by_key(|&c| (self.all_columns[c].display_index(), c));
        order
    }

    /// Columns `view` would show: the first column plus the visible ones in
    /// details view, the first plus the tile columns in tile view, none
    /// otherwise.
    pub fn filtered_columns(&self, view: ViewMode) -> Vec<usize> {
        let keep: fn(&Column<T>) -> bool = match view {
            ViewMode::Details => Column::is_visible,
            ViewMode::Tile => Column::is_tile_view_column,
            ViewMode::LargeIcon | ViewMode::SmallIcon | ViewMode::List => return Vec::new(),
        };
        self.all_columns
            .iter()
            .enumerate()
            .filter(|&(index, column)| index == 0 || keep(column))
            .map(|(index, _)| index)
            .collect()
    }

    /// Re-derive the shown columns after catalog changes.
    pub fn rebuild_columns(&mut self) {
        self.cancel_cell_edit();
        self.remember_display_indices();
        self.apply_filtered_columns();
    }

    /// Show the columns of the current view, placing each at its remembered
    /// display position. On a collision a column coming back into view wins
    /// over one already shown, then catalog order decides. Columns never
    /// shown go last.
    fn apply_filtered_columns(&mut self) {
        let active = self.filtered_columns(self.options.view);
        let previous = std::mem::take(&mut self.columns);
        for column in &mut self.all_columns {
            column.set_display_index(-1);
        }
        let mut by_position = active.clone();
        by_position.sort_by_key(|&c| {
            let last = self.all_columns[c].last_display_index();
            (if last < 0 { i32::MAX } else { last }, previous.contains(&c), c)
        });
        for (position, &c) in by_position.iter().enumerate() {
            self.all_columns[c].set_display_index(to_i32(position));
        }
        self.columns = active;
        tracing::debug!(
            target: targets::LAYOUT,
            view = ?self.options.view,
            shown = self.columns.len(),
            "rebuilt columns"
        );
        self.resize_free_space_filling_columns();
        self.build_list();
    }

    pub fn set_column_visible(&mut self, column: usize, visible: bool) -> bool {
        let Some(target) = self.all_columns.get_mut(column) else {
            return false;
        };
        if target.is_visible() == visible {
            return false;
        }
        target.set_visible(visible);
        self.rebuild_columns();
        true
    }

    pub fn set_column_width(&mut self, column: usize, width: i32) {
        if let Some(target) = self.all_columns.get_mut(column) {
            target.set_width(width);
            self.resize_free_space_filling_columns();
        }
    }

    /// Move a shown column to `display_index`, shifting the others.
    pub fn move_column(&mut self, column: usize, display_index: usize) -> bool {
        if !self.columns.contains(&column) {
            return false;
        }
        let mut order = self.display_order();
        order.retain(|&c| c != column);
        order.insert(display_index.min(order.len()), column);
        for (position, &c) in order.iter().enumerate() {
            self.all_columns[c].set_display_index(to_i32(position));
        }
        self.remember_display_indices();
        true
    }

    /// Record the display position of every shown column, so it can be
    /// restored when the column is shown again.
    pub fn remember_display_indices(&mut self) {
        for &c in &self.columns {
            let index = self.all_columns[c].display_index();
            self.all_columns[c].set_last_display_index(index);
        }
    }

    pub fn view(&self) -> ViewMode {
        self.options.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if self.options.view == view {
            return;
        }
        self.cancel_cell_edit();
        self.remember_display_indices();
        self.options.view = view;
        self.apply_filtered_columns();
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    pub fn viewport_width(&self) -> Option<i32> {
        self.viewport_width
    }

    /// Record the client width and refit free-space-filling columns.
    pub fn set_viewport_width(&mut self, width: i32) {
        self.viewport_width = Some(width.max(0));
        self.resize_free_space_filling_columns();
    }

    /// Share the viewport width left by fixed columns among the columns
    /// with a free space proportion.
    pub fn resize_free_space_filling_columns(&mut self) {
        if self.is_frozen() {
            return;
        }
        let Some(viewport) = self.viewport_width else {
            return;
        };
        let constraints: Vec<_> = self
            .columns
            .iter()
            .map(|&c| self.all_columns[c].width_constraint())
            .collect();
        let Some(widths) = layout::allocate(viewport, self.options.layout_margin, &constraints) else {
            return;
        };
        for (&c, width) in self.columns.iter().zip(widths) {
            if let Some(width) = width {
                self.all_columns[c].set_width(width);
            }
        }
    }

    /// Bounds of the cell at display row `row` in catalog column `column`,
    /// relative to the top left of the first row.
    pub fn cell_bounds(&self, row: usize, column: usize) -> Option<Rect> {
        let height = self.options.row_height;
        let y = to_i32(row).saturating_mul(height);
        let mut x = 0;
        for c in self.display_order() {
            let width = self.all_columns[c].width();
            if c == column {
                return Some(Rect::new(x, y, width, height));
            }
            x += width;
        }
        None
    }

    // ------------------------------------------------------------------
    // Freezing
    // ------------------------------------------------------------------

    /// Suspend rebuilds until the matching [`unfreeze`](Self::unfreeze).
    /// Calls nest.
    pub fn freeze(&mut self) {
        self.freeze_count += 1;
    }

    pub fn unfreeze(&mut self) {
        if self.freeze_count == 0 {
            return;
        }
        self.freeze_count -= 1;
        if self.freeze_count == 0 {
            self.resize_free_space_filling_columns();
            self.build_list();
            if std::mem::take(&mut self.sorted_while_frozen)
                && let Some(column) = self.last_sort_column
            {
                self.signals.after_sorting.emit(AfterSortingEventArgs {
                    column,
                    order: self.last_sort_order,
                });
            }
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_count > 0
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn focused_row(&self) -> Option<usize> {
        self.focused_row
    }

    pub fn set_focused_row(&mut self, row: Option<usize>) {
        self.focused_row = row.filter(|&r| r < self.items.len());
    }

    pub fn set_row_selected(&mut self, row: usize, selected: bool) {
        let Some(item) = self.items.get_mut(row) else {
            return;
        };
        if item.selected != selected {
            item.selected = selected;
            self.mark_selection_changed();
        }
    }

    /// Select `model` alone and focus its row.
    pub fn select_object(&mut self, model: &T) -> bool {
        let Some(row) = self.index_of(model) else {
            return false;
        };
        self.deselect_all();
        self.set_row_selected(row, true);
        self.focused_row = Some(row);
        true
    }

    /// Select exactly the rows showing `models`.
    pub fn select_objects(&mut self, models: &[T]) {
        for row in 0..self.items.len() {
            let wanted = self
                .get_model_object(row)
                .is_some_and(|model| models.contains(model));
            self.set_row_selected(row, wanted);
        }
    }

    pub fn select_all(&mut self) {
        for row in 0..self.items.len() {
            self.set_row_selected(row, true);
        }
    }

    pub fn deselect_all(&mut self) {
        for row in 0..self.items.len() {
            self.set_row_selected(row, false);
        }
    }

    /// Selected rows in display order.
    pub fn selected_rows(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.selected)
            .map(|(row, _)| row)
            .collect()
    }

    pub fn selected_objects(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| item.selected)
            .filter_map(|item| self.objects.get(item.model_index()))
            .collect()
    }

    pub fn selected_object(&self) -> Option<&T> {
        self.selected_objects().into_iter().next()
    }

    fn mark_selection_changed(&mut self) {
        self.deferred.post_unique(DeferredWork::SelectionChanged);
    }

    // ------------------------------------------------------------------
    // Checkboxes
    // ------------------------------------------------------------------

    /// Read check states from the models instead of keeping them on rows.
    pub fn set_check_state_getter<F>(&mut self, getter: F)
    where
        F: Fn(&T) -> CheckState + Send + Sync + 'static,
    {
        self.check_state_getter = Some(Arc::new(getter));
        self.build_list();
    }

    /// Write check states into the models. The putter returns the state it
    /// actually stored.
    pub fn set_check_state_putter<F>(&mut self, putter: F)
    where
        F: Fn(&mut T, CheckState) -> CheckState + Send + Sync + 'static,
    {
        self.check_state_putter = Some(Arc::new(putter));
    }

    pub fn check_state(&self, model: &T) -> Option<CheckState> {
        self.model_to_row(model).map(|item| item.check_state)
    }

    pub fn is_checked(&self, model: &T) -> bool {
        self.check_state(model) == Some(CheckState::Checked)
    }

    pub fn check_object(&mut self, model: &T) -> bool {
        self.set_object_check_state(model, CheckState::Checked)
    }

    pub fn uncheck_object(&mut self, model: &T) -> bool {
        self.set_object_check_state(model, CheckState::Unchecked)
    }

    pub fn toggle_check_object(&mut self, model: &T) -> bool {
        match self.check_state(model) {
            Some(state) => self.set_object_check_state(model, state.toggled()),
            None => false,
        }
    }

    pub fn set_object_check_state(&mut self, model: &T, state: CheckState) -> bool {
        match self.index_of(model) {
            Some(row) => self.set_row_check_state(row, state),
            None => false,
        }
    }

    /// Change the check state of display row `row`. Does nothing unless
    /// checkboxes are enabled.
    pub fn set_row_check_state(&mut self, row: usize, state: CheckState) -> bool {
        if !self.options.checkboxes {
            return false;
        }
        let Some(model_index) = self.items.get(row).map(RowItem::model_index) else {
            return false;
        };
        let stored = match &self.check_state_putter {
            Some(putter) => match Arc::make_mut(&mut self.objects).get_mut(model_index) {
                Some(model) => putter(model, state),
                None => return false,
            },
            None => state,
        };
        self.items[row].check_state = stored;
        if self.check_state_putter.is_some() {
            self.refresh_row(row);
        }
        tracing::trace!(target: targets::OBJECTS, row, state = ?stored, "check state changed");
        true
    }

    /// Checked objects in display order.
    pub fn checked_objects(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| item.check_state == CheckState::Checked)
            .filter_map(|item| self.objects.get(item.model_index()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Cell editing
    // ------------------------------------------------------------------

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn is_cell_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// The editor of the session in progress.
    pub fn cell_editor(&self) -> Option<&(dyn CellEditor + 'static)> {
        self.edit.as_ref().map(|session| session.editor.as_ref())
    }

    pub fn cell_editor_mut(&mut self) -> Option<&mut (dyn CellEditor + 'static)> {
        self.edit.as_mut().map(|session| session.editor.as_mut())
    }

    /// Display row and catalog column of the cell being edited.
    pub fn editing_cell(&self) -> Option<(usize, usize)> {
        self.edit.as_ref().map(|session| (session.row, session.column))
    }

    /// React to a pointer release. Returns `true` if an edit started.
    pub fn handle_pointer_up(&mut self, event: &PointerEvent) -> bool {
        if !should_start_edit(self.options.cell_edit_activation, event) {
            return false;
        }
        let (Some(row), Some(position)) = (event.row, event.column) else {
            return false;
        };
        let Some(&column) = self.columns.get(position) else {
            return false;
        };
        self.edit_sub_item(row, column)
    }

    /// React to a key press. Returns `true` if the key was consumed.
    ///
    /// While editing, Enter commits, Escape cancels and Tab commits and
    /// moves to the next editable column (Shift+Tab to the previous one).
    /// Otherwise F2 edits the primary cell of the focused row.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if let Some((model_index, column)) = self.edit.as_ref().map(|s| (s.model_index, s.column)) {
            return match event.key {
                Key::Tab if event.is_simple_tab() => {
                    if !self.finish_cell_edit() || self.options.view != ViewMode::Details {
                        return true;
                    }
                    let order = self.display_order();
                    let backwards = event.modifiers.shift;
                    let next = next_editable_column(&order, column, backwards, |c| {
                        self.all_columns[c].is_editable()
                    });
                    if let Some(next) = next {
                        self.deferred.post(DeferredWork::StartEdit {
                            model_index,
                            column: next,
                        });
                    }
                    true
                }
                Key::Enter => {
                    self.finish_cell_edit();
                    true
                }
                Key::Escape => {
                    self.cancel_cell_edit();
                    true
                }
                _ => false,
            };
        }

        if event.key == Key::F2 && event.modifiers.is_empty() {
            let target = self.focused_row.zip(self.primary_column());
            if let Some((row, column)) = target {
                return self.edit_sub_item(row, column);
            }
        }
        false
    }

    /// Scrolling commits any edit in progress.
    pub fn handle_scroll(&mut self) {
        if self.is_cell_editing() {
            self.finish_cell_edit();
        }
    }

    pub fn handle_editor_focus_lost(&mut self) {
        if self.is_cell_editing() {
            self.finish_cell_edit();
        }
    }

    /// Begin editing display row `row` in catalog column `column`.
    ///
    /// Refused when editing is switched off, the column is hidden or not
    /// editable, or an edit in progress fails validation.
    pub fn edit_sub_item(&mut self, row: usize, column: usize) -> bool {
        if self.options.cell_edit_activation == CellEditActivation::None {
            return false;
        }
        let editable = self.all_columns.get(column).is_some_and(Column::is_editable);
        if !editable || !self.columns.contains(&column) || row >= self.items.len() {
            return false;
        }
        if self.is_cell_editing() && !self.finish_cell_edit() {
            return false;
        }
        self.start_cell_edit(row, column)
    }

    fn start_cell_edit(&mut self, row: usize, column: usize) -> bool {
        let model_index = self.items[row].model_index();
        let Some(model) = self.objects.get(model_index) else {
            return false;
        };
        self.edit_state = EditState::Activating;

        let target = &self.all_columns[column];
        let value = target.get_value(model);
        let kind = EditorKind::for_value(&value);
        let autocomplete = if kind == EditorKind::Text {
            autocomplete_source(
                target,
                self.items
                    .iter()
                    .filter_map(|item| self.objects.get(item.model_index())),
            )
        } else {
            Vec::new()
        };
        let request = EditorRequest {
            kind,
            column,
            model_index,
            autocomplete,
        };
        let mut editor = self.editor_factory.create_editor(&request);
        let bounds = self.cell_bounds(row, column).unwrap_or_default();
        editor.set_bounds(bounds);
        if !editor.set_value(&value) {
            let text = match &value {
                AspectValue::Text(text) => text.clone(),
                other => target.value_to_string(other),
            };
            editor.set_text(&text);
        }

        let mut args = CellEditEventArgs {
            row,
            model_index,
            column,
            value: value.clone(),
            new_value: value,
            bounds,
            editor: Some(editor),
            cancelled: false,
        };
        if self.signals.cell_edit_starting.emit(&mut args) {
            tracing::trace!(target: targets::EDIT, row, column, "edit refused by handler");
            self.edit_state = EditState::Idle;
            return false;
        }
        let Some(mut session) = EditSession::from_args(args) else {
            self.edit_state = EditState::Idle;
            return false;
        };
        session.editor.focus();
        tracing::debug!(target: targets::EDIT, row, column, kind = ?kind, "editing cell");
        self.edit = Some(session);
        self.edit_state = EditState::Editing;
        true
    }

    /// Try to commit the edit in progress.
    ///
    /// Returns `false` if a validating handler rejected the value; the
    /// editor then stays open and focused. Returns `true` otherwise, including
    /// when there was nothing to commit.
    pub fn finish_cell_edit(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return true;
        };
        let mut args = session.into_args(false);
        if self.signals.cell_edit_validating.emit(&mut args) {
            tracing::debug!(target: targets::EDIT, "value rejected, editor stays open");
            return match EditSession::from_args(args) {
                Some(mut session) => {
                    session.editor.focus();
                    self.edit = Some(session);
                    self.edit_state = EditState::Editing;
                    false
                }
                None => {
                    self.edit_state = EditState::Idle;
                    true
                }
            };
        }

        self.edit_state = EditState::Committing;
        if let Some(editor) = &args.editor {
            args.new_value = editor.value();
        }
        args.cancelled = false;
        if !self.signals.cell_edit_finishing.emit(&mut args) {
            let column = &self.all_columns[args.column];
            if let Some(model) = Arc::make_mut(&mut self.objects).get_mut(args.model_index) {
                column.put_value(model, args.new_value.clone());
            }
            if let Some(row) = self.row_of_model_index(args.model_index) {
                self.refresh_row(row);
            }
            tracing::debug!(target: targets::EDIT, column = args.column, "committed edit");
        }
        self.edit_state = EditState::Idle;
        true
    }

    /// Abandon the edit in progress without writing anything.
    pub fn cancel_cell_edit(&mut self) {
        let Some(session) = self.edit.take() else {
            return;
        };
        self.edit_state = EditState::Cancelling;
        let mut args = session.into_args(true);
        self.signals.cell_edit_finishing.emit(&mut args);
        tracing::debug!(target: targets::EDIT, column = args.column, "cancelled edit");
        self.edit_state = EditState::Idle;
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Capture view mode, sort, grouping and column layout.
    pub fn save_state(&self) -> ListState {
        let columns = self
            .all_columns
            .iter()
            .enumerate()
            .map(|(index, column)| ColumnState {
                visible: column.is_visible(),
                display_index: if self.columns.contains(&index) {
                    column.display_index()
                } else {
                    column.last_display_index()
                },
                width: column.width(),
            })
            .collect();
        ListState {
            version: STATE_VERSION,
            column_count: self.all_columns.len(),
            view: self.options.view,
            sort_column: self.last_sort_column.map_or(-1, to_i32),
            showing_groups: self.options.show_groups,
            sort_order: self.last_sort_order,
            columns,
        }
    }

    pub fn save_state_bytes(&self) -> Result<Vec<u8>, StateError> {
        self.save_state().to_bytes()
    }

    /// Apply a snapshot from [`save_state`](Self::save_state).
    ///
    /// Returns `false` and changes nothing if the snapshot does not fit the
    /// column catalog.
    pub fn restore_state(&mut self, state: &ListState) -> bool {
        if state.validate(self.all_columns.len()).is_err() {
            return false;
        }
        self.cancel_cell_edit();
        for (column, saved) in self.all_columns.iter_mut().zip(&state.columns) {
            column.set_visible(saved.visible);
            column.set_last_display_index(saved.display_index);
            column.set_width(saved.width);
        }
        self.last_sort_column = state.sort_column_index();
        self.last_sort_order = state.sort_order;
        self.options.show_groups = state.showing_groups;
        // Rebuild even when the view is unchanged so restored positions apply.
        self.options.view = state.view;
        self.apply_filtered_columns();
        tracing::debug!(target: targets::STATE, view = ?state.view, "restored state");
        true
    }

    /// Decode and apply a snapshot from [`save_state_bytes`](Self::save_state_bytes).
    pub fn restore_state_bytes(&mut self, bytes: &[u8]) -> bool {
        match ListState::from_bytes(bytes) {
            Ok(state) => self.restore_state(&state),
            Err(err) => {
                tracing::debug!(target: targets::STATE, error = %err, "unreadable snapshot");
                false
            }
        }
    }
}

static_assertions::assert_impl_all!(ListHandle<String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(ObjectListView<String>: Send);
