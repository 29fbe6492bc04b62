//! Datagrid rows.
//!
//! A [`DatagridRow`] owns one item and the cell handles that display it.
//! While attached, it follows the column width engine: every `resized`
//! notification re-applies the column widths to its cells.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_trace, grid_warn, Signal, Subscription};
use parking_lot::{Mutex, RwLock};

use crate::columns::ColumnWidthEngine;
use crate::dom::ElementHandle;
use crate::row_action::RowActionGate;
use crate::selection::{GridItem, Selection, SelectionMode};

/// One row of a datagrid.
pub struct DatagridRow<E: ElementHandle, T: GridItem> {
    item: T,
    cells: Arc<RwLock<Vec<E>>>,
    columns: Arc<ColumnWidthEngine<E>>,
    selection: Arc<Selection<T>>,
    gate: Arc<RowActionGate<E>>,
    has_actions: bool,
    /// Selection flag used while the grid has no selection mode.
    selected: AtomicBool,
    resize_subscription: Mutex<Option<Subscription>>,

    /// Emitted when [`toggle`](Self::toggle) changes the selection.
    pub selected_changed: Signal<bool>,
}

impl<E: ElementHandle, T: GridItem> DatagridRow<E, T> {
    /// Creates a detached row.
    pub fn new(
        item: T,
        cells: Vec<E>,
        has_actions: bool,
        columns: Arc<ColumnWidthEngine<E>>,
        selection: Arc<Selection<T>>,
        gate: Arc<RowActionGate<E>>,
    ) -> Self {
        Self {
            item,
            cells: Arc::new(RwLock::new(cells)),
            columns,
            selection,
            gate,
            has_actions,
            selected: AtomicBool::new(false),
            resize_subscription: Mutex::new(None),
            selected_changed: Signal::new(),
        }
    }

    /// The item displayed by this row.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// The cell handles, aligned with the headers by position.
    pub fn cells(&self) -> Vec<E> {
        self.cells.read().clone()
    }

    /// Replaces the cells and constrains them to the column widths.
    pub fn set_cells(&self, cells: Vec<E>) {
        *self.cells.write() = cells;
        self.columns.apply_cell_widths(&self.cells.read());
    }

    /// Whether the row offers actions.
    pub fn has_actions(&self) -> bool {
        self.has_actions
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts following column width changes.
    ///
    /// Widths are applied once immediately. A row with actions is counted by
    /// the row action gate until detached. Returns `false` if already attached.
    pub fn attach(&self) -> bool {
        let mut slot = self.resize_subscription.lock();
        if slot.is_some() {
            grid_warn!(target: targets::COORDINATOR, "row already attached");
            return false;
        }

        let columns = Arc::downgrade(&self.columns);
        let cells = self.cells.clone();
        *slot = Some(self.columns.resized.subscribe(move |_| {
            if let Some(columns) = columns.upgrade() {
                columns.apply_cell_widths(&cells.read());
            }
        }));
        drop(slot);

        self.columns.apply_cell_widths(&self.cells.read());
        if self.has_actions {
            self.gate.register();
        }
        true
    }

    /// Stops following column width changes.
    ///
    /// Returns `false` if the row was not attached.
    pub fn detach(&self) -> bool {
        let Some(mut subscription) = self.resize_subscription.lock().take() else {
            return false;
        };
        if let Err(err) = subscription.unsubscribe() {
            grid_trace!(target: targets::COORDINATOR, error = %err, "row subscription already gone");
        }
        if self.has_actions {
            self.gate.deregister();
        }
        true
    }

    /// Whether the row follows column width changes.
    pub fn is_attached(&self) -> bool {
        self.resize_subscription.lock().is_some()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Whether the row is selected.
    ///
    /// Uses the row's own flag when the grid has no selection mode.
    pub fn is_selected(&self) -> bool {
        match self.selection.mode() {
            SelectionMode::None => self.selected.load(Ordering::SeqCst),
            SelectionMode::Single | SelectionMode::Multi => self.selection.is_selected(&self.item),
        }
    }

    /// Selects or deselects the row.
    pub fn set_selected(&self, selected: bool) {
        match self.selection.mode() {
            SelectionMode::None => self.selected.store(selected, Ordering::SeqCst),
            SelectionMode::Single | SelectionMode::Multi => {
                self.selection.set_selected(&self.item, selected)
            }
        }
    }

    /// Sets the selection to `selected`, or flips it when `None`.
    ///
    /// Returns `true` and emits `selected_changed` if the value changed.
    pub fn toggle(&self, selected: Option<bool>) -> bool {
        let current = self.is_selected();
        let selected = selected.unwrap_or(!current);
        if selected == current {
            return false;
        }
        self.set_selected(selected);
        self.selected_changed.emit(selected);
        true
    }

}

impl<E: ElementHandle, T: GridItem> Drop for DatagridRow<E, T> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<E: ElementHandle, T: GridItem + fmt::Debug> fmt::Debug for DatagridRow<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatagridRow")
            .field("item", &self.item)
            .field("cells", &*self.cells.read())
            .field("has_actions", &self.has_actions)
            .field("attached", &self.is_attached())
            .finish()
    }
}

static_assertions::assert_impl_all!(DatagridRow<u32, String>: Send, Sync);
