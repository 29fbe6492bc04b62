//! Selection state for datagrid items.
//!
//! This module provides [`Selection`], which tracks the selection mode and
//! the selected items of a datagrid.
//!
//! Items are compared with `PartialEq`. "All selected" is always relative to
//! the items currently displayed, so it keeps working under paging and
//! filtering.
//!
//! # Example
//!
//! ```
//! use horizon_datagrid::{Selection, SelectionMode, SelectionSnapshot};
//!
//! let selection = Selection::new();
//! selection.set_mode(SelectionMode::Multi);
//! selection.set_displayed(vec!["a", "b"]);
//!
//! selection.changed.connect(|snapshot| {
//!     if let SelectionSnapshot::Multi(items) = snapshot {
//!         println!("{} selected", items.len());
//!     }
//! });
//!
//! selection.set_selected(&"a", true);
//! assert!(selection.is_selected(&"a"));
//!
//! selection.toggle_all();
//! assert!(selection.is_all_selected());
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_debug, grid_trace, Signal};
use parking_lot::RwLock;

/// Values a datagrid can display and select.
pub trait GridItem: Clone + PartialEq + Send + Sync + 'static {}

impl<T> GridItem for T where T: Clone + PartialEq + Send + Sync + 'static {}

/// How items can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Selection is not tracked here; rows keep a local flag.
    #[default]
    None,
    /// At most one item is selected.
    Single,
    /// Any number of items can be selected.
    Multi,
}

/// The selection as delivered by [`Selection::changed`].
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionSnapshot<T> {
    /// The single selected item, if any.
    Single(Option<T>),
    /// The selected items in selection order.
    Multi(Vec<T>),
}

struct SelectionInner<T> {
    mode: SelectionMode,
    current_single: Option<T>,
    current: Vec<T>,
    displayed: Vec<T>,
}

impl<T: GridItem> SelectionInner<T> {
    fn snapshot(&self) -> SelectionSnapshot<T> {
        match self.mode {
            SelectionMode::Single => SelectionSnapshot::Single(self.current_single.clone()),
            SelectionMode::None | SelectionMode::Multi => {
                SelectionSnapshot::Multi(self.current.clone())
            }
        }
    }

    fn is_all_selected(&self) -> bool {
        self.mode == SelectionMode::Multi
            && !self.displayed.is_empty()
            && self.displayed.iter().all(|item| self.current.contains(item))
    }
}

/// Tracks the selection mode and the selected items.
pub struct Selection<T: GridItem> {
    inner: RwLock<SelectionInner<T>>,

    /// Emitted after every effective mutation.
    pub changed: Arc<Signal<SelectionSnapshot<T>>>,
}

impl<T: GridItem> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: GridItem> Selection<T> {
    /// Creates an empty selection in [`SelectionMode::None`].
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SelectionInner {
                mode: SelectionMode::None,
                current_single: None,
                current: Vec::new(),
                displayed: Vec::new(),
            }),
            changed: Arc::new(Signal::new()),
        }
    }

    // =========================================================================
    // Mode
    // =========================================================================

    /// The current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.inner.read().mode
    }

    /// Switches the selection mode.
    ///
    /// Previous selections do not carry over to the new mode.
    pub fn set_mode(&self, mode: SelectionMode) {
        let mut inner = self.inner.write();
        if inner.mode == mode {
            return;
        }
        grid_debug!(target: targets::SELECTION, from = ?inner.mode, to = ?mode, "selection mode changed");
        inner.mode = mode;
        inner.current_single = None;
        inner.current.clear();
    }

    // =========================================================================
    // Displayed Items
    // =========================================================================

    /// Replaces the set of items currently displayed.
    pub fn set_displayed(&self, items: Vec<T>) {
        self.inner.write().displayed = items;
    }

    /// The items currently displayed.
    pub fn displayed(&self) -> Vec<T> {
        self.inner.read().displayed.clone()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks if an item is selected in the current mode.
    ///
    /// Always `false` in [`SelectionMode::None`].
    pub fn is_selected(&self, item: &T) -> bool {
        let inner = self.inner.read();
        match inner.mode {
            SelectionMode::None => false,
            SelectionMode::Single => inner.current_single.as_ref() == Some(item),
            SelectionMode::Multi => inner.current.contains(item),
        }
    }

    /// Returns `true` in multi mode when every displayed item is selected.
    pub fn is_all_selected(&self) -> bool {
        self.inner.read().is_all_selected()
    }

    /// The selected items.
    pub fn current(&self) -> Vec<T> {
        self.inner.read().current.clone()
    }

    /// The single selected item.
    pub fn current_single(&self) -> Option<T> {
        self.inner.read().current_single.clone()
    }

    /// The selection in the shape of the current mode.
    pub fn snapshot(&self) -> SelectionSnapshot<T> {
        self.inner.read().snapshot()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Selects or deselects one item.
    ///
    /// In single mode, selecting replaces the current item and deselecting
    /// only clears it if `item` is the current one. Ignored in
    /// [`SelectionMode::None`].
    pub fn set_selected(&self, item: &T, selected: bool) {
        self.mutate(|inner| match inner.mode {
            SelectionMode::None => {
                grid_trace!(target: targets::SELECTION, "selection disabled, ignoring");
                false
            }
            SelectionMode::Single => {
                if selected {
                    if inner.current_single.as_ref() == Some(item) {
                        return false;
                    }
                    inner.current_single = Some(item.clone());
                    true
                } else if inner.current_single.as_ref() == Some(item) {
                    inner.current_single = None;
                    true
                } else {
                    false
                }
            }
            SelectionMode::Multi => {
                let position = inner.current.iter().position(|i| i == item);
                match (selected, position) {
                    (true, None) => {
                        inner.current.push(item.clone());
                        true
                    }
                    (false, Some(index)) => {
                        inner.current.remove(index);
                        true
                    }
                    _ => false,
                }
            }
        });
    }

    /// Replaces the selected items.
    pub fn set_current(&self, items: Vec<T>) {
        self.mutate(|inner| {
            if inner.current == items {
                return false;
            }
            inner.current = items;
            true
        });
    }

    /// Replaces the single selected item.
    pub fn set_current_single(&self, item: Option<T>) {
        self.mutate(|inner| {
            if inner.current_single == item {
                return false;
            }
            inner.current_single = item;
            true
        });
    }

    /// Selects every displayed item, or deselects them all if they already are.
    ///
    /// A partial selection becomes a full one. Selected items that are not
    /// displayed are kept. Only meaningful in multi mode.
    pub fn toggle_all(&self) {
        self.mutate(|inner| {
            if inner.mode != SelectionMode::Multi {
                grid_trace!(target: targets::SELECTION, "toggle_all outside multi mode, ignoring");
                return false;
            }
            if inner.is_all_selected() {
                let SelectionInner {
                    current, displayed, ..
                } = inner;
                current.retain(|item| !displayed.contains(item));
            } else {
                let missing: Vec<T> = inner
                    .displayed
                    .iter()
                    .filter(|item| !inner.current.contains(item))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    return false;
                }
                inner.current.extend(missing);
            }
            true
        });
    }

    /// Deselects everything.
    pub fn clear(&self) {
        self.mutate(|inner| {
            if inner.current.is_empty() && inner.current_single.is_none() {
                return false;
            }
            inner.current.clear();
            inner.current_single = None;
            true
        });
    }

    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut SelectionInner<T>) -> bool,
    {
        let snapshot = {
            let mut inner = self.inner.write();
            if !f(&mut *inner) {
                return;
            }
            inner.snapshot()
        };
        self.changed.emit(snapshot);
    }
}

impl<T: GridItem + fmt::Debug> fmt::Debug for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Selection")
            .field("mode", &inner.mode)
            .field("current_single", &inner.current_single)
            .field("current", &inner.current)
            .field("displayed", &inner.displayed.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Selection<String>: Send, Sync);
