//! The datagrid coordinator.
//!
//! [`Datagrid`] owns every provider of a grid and wires their notifications:
//!
//! - sort, filter and page changes trigger a consolidated refresh
//! - selection changes are forwarded as `selected_changed` or
//!   `single_selected_changed` depending on the mode
//! - header and row changes re-stabilize the columns when structurally needed
//! - every column resize re-measures the body's scrollbar gutter
//!
//! Column stabilization is gated by a "columns stable" flag. The flag is
//! cleared when the header identity changes and when rows first appear, and
//! a pass only runs while the grid is attached and has rows.
//!
//! # Example
//!
//! ```ignore
//! use horizon_datagrid::{Datagrid, GridConfig};
//! use horizon_datagrid::state::Comparator;
//!
//! let grid = Datagrid::with_config(renderer, measurer, GridConfig::new().page_size(10));
//! grid.refresh.connect(|state| {
//!     let query = serde_json::to_string(state).unwrap();
//!     backend.fetch(query);
//! });
//!
//! grid.set_headers(vec![name_header, status_header]);
//! grid.attach(table_wrapper);
//!
//! let rows: Vec<_> = items
//!     .into_iter()
//!     .map(|(item, cells)| grid.create_row(item, cells, false))
//!     .collect();
//! grid.set_rows(&rows);
//!
//! grid.sort().toggle(Comparator::property("name"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_debug, grid_trace, grid_warn, Signal, Subscription};
use parking_lot::Mutex;

use crate::columns::ColumnWidthEngine;
use crate::config::GridConfig;
use crate::dom::{ElementHandle, Measurer, Renderer};
use crate::row::DatagridRow;
use crate::row_action::RowActionGate;
use crate::scrollbar::ScrollbarTracker;
use crate::selection::{GridItem, Selection, SelectionMode, SelectionSnapshot};
use crate::state::{ConsolidatedState, FilterState, GridStateAggregator, PageState, SortState};

struct Layout<E> {
    /// Whether the current headers and rows have been measured.
    columns_stable: bool,
    row_count: usize,
    table_wrapper: Option<E>,
}

/// A datagrid: column layout, row actions, selection and query state.
pub struct Datagrid<E: ElementHandle, T: GridItem> {
    config: GridConfig,
    columns: Arc<ColumnWidthEngine<E>>,
    gate: Arc<RowActionGate<E>>,
    selection: Arc<Selection<T>>,
    aggregator: Arc<GridStateAggregator<T>>,
    scrollbar: Arc<ScrollbarTracker<E>>,
    layout: Mutex<Layout<E>>,
    /// Non-empty exactly while attached.
    subscriptions: Mutex<Vec<Subscription>>,

    /// Emitted with a [`ConsolidatedState`] whenever the data should be refetched.
    pub refresh: Arc<Signal<ConsolidatedState<T>>>,

    /// Emitted with the selected items in multi mode.
    pub selected_changed: Arc<Signal<Vec<T>>>,

    /// Emitted with the selected item in single mode.
    pub single_selected_changed: Arc<Signal<Option<T>>>,
}

impl<E: ElementHandle, T: GridItem> Datagrid<E, T> {
    /// Creates a detached grid with the default configuration.
    pub fn new(renderer: Arc<dyn Renderer<E>>, measurer: Arc<dyn Measurer<E>>) -> Self {
        Self::with_config(renderer, measurer, GridConfig::default())
    }

    /// Creates a detached grid.
    pub fn with_config(
        renderer: Arc<dyn Renderer<E>>,
        measurer: Arc<dyn Measurer<E>>,
        config: GridConfig,
    ) -> Self {
        let columns = Arc::new(ColumnWidthEngine::new(renderer, measurer.clone(), &config));
        let aggregator = GridStateAggregator::new(
            Arc::new(SortState::new()),
            Arc::new(FilterState::new()),
            Arc::new(PageState::new(config.page_size)),
        );
        Self {
            gate: Arc::new(RowActionGate::new(columns.clone())),
            columns,
            selection: Arc::new(Selection::new()),
            refresh: aggregator.refresh.clone(),
            aggregator: Arc::new(aggregator),
            scrollbar: Arc::new(ScrollbarTracker::new(measurer)),
            layout: Mutex::new(Layout {
                columns_stable: false,
                row_count: 0,
                table_wrapper: None,
            }),
            subscriptions: Mutex::new(Vec::new()),
            selected_changed: Arc::new(Signal::new()),
            single_selected_changed: Arc::new(Signal::new()),
            config,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connects the providers and measures the columns inside `table_wrapper`.
    ///
    /// An initial refresh is emitted. Returns `false` if already attached.
    pub fn attach(&self, table_wrapper: E) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        if !subscriptions.is_empty() {
            grid_warn!(target: targets::COORDINATOR, "datagrid already attached");
            return false;
        }

        let aggregator = Arc::downgrade(&self.aggregator);
        for changed in [
            &self.aggregator.sort().changed,
            &self.aggregator.filters().changed,
            &self.aggregator.page().changed,
        ] {
            let aggregator = aggregator.clone();
            subscriptions.push(changed.subscribe(move |_| {
                if let Some(aggregator) = aggregator.upgrade() {
                    aggregator.trigger();
                }
            }));
        }

        let selection = Arc::downgrade(&self.selection);
        let selected_changed = Arc::downgrade(&self.selected_changed);
        let single_selected_changed = Arc::downgrade(&self.single_selected_changed);
        subscriptions.push(self.selection.changed.subscribe(move |snapshot| {
            let Some(selection) = selection.upgrade() else {
                return;
            };
            match (selection.mode(), snapshot) {
                (SelectionMode::Single, SelectionSnapshot::Single(item)) => {
                    if let Some(signal) = single_selected_changed.upgrade() {
                        signal.emit(item.clone());
                    }
                }
                (SelectionMode::Multi, SelectionSnapshot::Multi(items)) => {
                    if let Some(signal) = selected_changed.upgrade() {
                        signal.emit(items.clone());
                    }
                }
                _ => {}
            }
        }));

        let scrollbar = Arc::downgrade(&self.scrollbar);
        subscriptions.push(self.columns.resized.subscribe(move |_| {
            if let Some(scrollbar) = scrollbar.upgrade() {
                scrollbar.compute();
            }
        }));
        drop(subscriptions);

        self.layout.lock().table_wrapper = Some(table_wrapper);
        grid_debug!(target: targets::COORDINATOR, "datagrid attached");

        self.aggregator.trigger();
        self.stabilize_columns();
        true
    }

    /// Releases every subscription taken by [`attach`](Self::attach).
    ///
    /// Returns `false` if the grid was not attached.
    pub fn detach(&self) -> bool {
        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        if subscriptions.is_empty() {
            return false;
        }
        for mut subscription in subscriptions {
            if let Err(err) = subscription.unsubscribe() {
                grid_trace!(target: targets::COORDINATOR, error = %err, "subscription already released");
            }
        }
        self.layout.lock().table_wrapper = None;
        self.columns.release_table_wrapper();
        grid_debug!(target: targets::COORDINATOR, "datagrid detached");
        true
    }

    /// Whether the grid is attached.
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.lock().is_empty()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Replaces the column headers.
    ///
    /// The same sequence is ignored. A pure reordering keeps the measured
    /// widths unless `stabilize_on_reorder` is configured. Any other change
    /// resets the widths, requests a refresh and re-stabilizes.
    pub fn set_headers(&self, headers: Vec<E>) {
        if headers.is_empty() {
            grid_trace!(target: targets::COORDINATOR, "ignoring empty header set");
            return;
        }

        let previous = self.columns.headers();
        if previous == headers {
            return;
        }

        let reordered = is_permutation(&previous, &headers);
        if reordered && !self.config.stabilize_on_reorder && self.columns.reorder_headers(headers.clone()) {
            return;
        }

        grid_debug!(target: targets::COORDINATOR, count = headers.len(), reordered, "headers changed");
        self.layout.lock().columns_stable = false;
        self.columns.set_headers(headers);
        if !reordered && self.is_attached() {
            self.aggregator.trigger();
        }
        self.stabilize_columns();
    }

    /// The current column headers.
    pub fn headers(&self) -> Vec<E> {
        self.columns.headers()
    }

    /// Replaces the displayed rows.
    ///
    /// Rows appearing in an empty grid invalidate the column widths. An empty
    /// grid is never measured, not even by the row action gate.
    pub fn set_rows(&self, rows: &[Arc<DatagridRow<E, T>>]) {
        let items: Vec<T> = rows.iter().map(|row| row.item().clone()).collect();
        {
            let mut layout = self.layout.lock();
            if layout.row_count == 0 && !items.is_empty() {
                layout.columns_stable = false;
            }
            layout.row_count = items.len();
        }
        if items.is_empty() {
            self.columns.release_table_wrapper();
        }
        self.selection.set_displayed(items);
        self.stabilize_columns();
    }

    /// Number of displayed rows.
    pub fn row_count(&self) -> usize {
        self.layout.lock().row_count
    }

    /// Creates and attaches a row for `item`.
    pub fn create_row(&self, item: T, cells: Vec<E>, has_actions: bool) -> Arc<DatagridRow<E, T>> {
        let row = Arc::new(DatagridRow::new(
            item,
            cells,
            has_actions,
            self.columns.clone(),
            self.selection.clone(),
            self.gate.clone(),
        ));
        row.attach();
        row
    }

    /// Measures the columns if they are not stable yet.
    ///
    /// Nothing happens while detached, without rows, or when the widths are
    /// already stable. Returns `true` if a pass ran.
    pub fn stabilize_columns(&self) -> bool {
        let wrapper = {
            let mut layout = self.layout.lock();
            if layout.columns_stable {
                return false;
            }
            if layout.row_count == 0 {
                grid_trace!(target: targets::COORDINATOR, "no rows yet, deferring stabilization");
                return false;
            }
            let Some(wrapper) = layout.table_wrapper.clone() else {
                return false;
            };
            layout.columns_stable = true;
            wrapper
        };

        let stabilized = self.columns.stabilize(&wrapper);
        if !stabilized {
            self.layout.lock().columns_stable = false;
        }
        stabilized
    }

    /// Whether the column widths are stable.
    pub fn columns_stable(&self) -> bool {
        self.layout.lock().columns_stable
    }

    /// Sets the body element whose scrollbar gutter is tracked.
    pub fn set_body(&self, body: Option<E>) {
        self.scrollbar.set_body(body);
        self.scrollbar.compute();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Switches to multi selection and selects `items`.
    pub fn set_selected(&self, items: Vec<T>) {
        self.selection.set_mode(SelectionMode::Multi);
        self.selection.set_current(items);
    }

    /// The selected items.
    pub fn selected(&self) -> Vec<T> {
        self.selection.current()
    }

    /// Switches to single selection and selects `item` if given.
    pub fn set_single_selected(&self, item: Option<T>) {
        self.selection.set_mode(SelectionMode::Single);
        if item.is_some() {
            self.selection.set_current_single(item);
        }
    }

    /// The single selected item.
    pub fn single_selected(&self) -> Option<T> {
        self.selection.current_single()
    }

    /// Whether every displayed item is selected.
    pub fn all_selected(&self) -> bool {
        self.selection.is_all_selected()
    }

    /// Selects every displayed item, or deselects them all.
    pub fn toggle_all(&self) {
        self.selection.toggle_all();
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Emits a consolidated refresh now.
    pub fn trigger_refresh(&self) {
        self.aggregator.trigger();
    }

    /// The configuration this grid was built with.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The column width engine.
    pub fn columns(&self) -> &Arc<ColumnWidthEngine<E>> {
        &self.columns
    }

    /// The row action gate.
    pub fn row_actions(&self) -> &Arc<RowActionGate<E>> {
        &self.gate
    }

    /// The selection.
    pub fn selection(&self) -> &Arc<Selection<T>> {
        &self.selection
    }

    /// The sort state.
    pub fn sort(&self) -> &Arc<SortState<T>> {
        self.aggregator.sort()
    }

    /// The filter state.
    pub fn filters(&self) -> &Arc<FilterState<T>> {
        self.aggregator.filters()
    }

    /// The page state.
    pub fn page(&self) -> &Arc<PageState> {
        self.aggregator.page()
    }

    /// The state aggregator.
    pub fn aggregator(&self) -> &Arc<GridStateAggregator<T>> {
        &self.aggregator
    }

    /// The scrollbar tracker.
    pub fn scrollbar(&self) -> &Arc<ScrollbarTracker<E>> {
        &self.scrollbar
    }

}

impl<E: ElementHandle, T: GridItem> Drop for Datagrid<E, T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<E: ElementHandle, T: GridItem> fmt::Debug for Datagrid<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = self.layout.lock();
        f.debug_struct("Datagrid")
            .field("columns", &self.columns)
            .field("columns_stable", &layout.columns_stable)
            .field("row_count", &layout.row_count)
            .field("attached", &layout.table_wrapper.is_some())
            .field("state", &self.aggregator)
            .finish_non_exhaustive()
    }
}

/// Whether `b` holds exactly the elements of `a`, in any order.
fn is_permutation<E: ElementHandle>(a: &[E], b: &[E]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<&E, isize> = HashMap::with_capacity(a.len());
    for element in a {
        *counts.entry(element).or_default() += 1;
    }
    for element in b {
        match counts.get_mut(element) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    true
}

static_assertions::assert_impl_all!(Datagrid<u32, String>: Send, Sync);
