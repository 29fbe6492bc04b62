//! Pagination state.
//!
//! Pages are 1-based. A page size of `0` disables paging: the page block is
//! left out of the consolidated state.

use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_debug, Property, Signal};
use serde::Serialize;

/// The page block of a consolidated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    /// Index of the first item of the page.
    pub from: usize,
    /// Index of the last item of the page.
    pub to: usize,
    /// Page size.
    pub size: usize,
}

/// Page size, current page and total item count.
pub struct PageState {
    size: Property<usize>,
    current: Property<usize>,
    total_items: Property<Option<usize>>,

    /// Emitted when the page window moves or resizes.
    pub changed: Arc<Signal<()>>,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PageState {
    /// Creates a state on page 1 with the given size.
    pub fn new(size: usize) -> Self {
        Self {
            size: Property::new(size),
            current: Property::new(1),
            total_items: Property::new(None),
            changed: Arc::new(Signal::new()),
        }
    }

    // =========================================================================
    // Size
    // =========================================================================

    /// The page size. `0` means paging is disabled.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// Changes the page size.
    ///
    /// The current page moves so that the first item of the old page stays
    /// visible.
    pub fn set_size(&self, size: usize) {
        let old = self.size.get();
        if old == size {
            return;
        }
        let current = if size == 0 {
            1
        } else {
            (self.first_item() / size).saturating_add(1)
        };
        self.current.set_silent(current);
        self.size.set_silent(size);
        grid_debug!(target: targets::STATE, size, current, "page size changed");
        self.changed.emit(());
    }

    // =========================================================================
    // Current Page
    // =========================================================================

    /// The current page, starting at 1.
    pub fn current(&self) -> usize {
        self.current.get()
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn set_current(&self, page: usize) {
        let mut page = page.max(1);
        if let Some(last) = self.last_page() {
            page = page.min(last);
        }
        if self.current.set(page) {
            grid_debug!(target: targets::STATE, page, "current page changed");
            self.changed.emit(());
        }
    }

    /// Moves to the next page, if there is one.
    pub fn next(&self) {
        let current = self.current();
        if self.last_page().is_none_or(|last| current < last) {
            self.set_current(current.saturating_add(1));
        }
    }

    /// Moves to the previous page, if there is one.
    pub fn previous(&self) {
        let current = self.current();
        if current > 1 {
            self.set_current(current - 1);
        }
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Total number of items, if known.
    pub fn total_items(&self) -> Option<usize> {
        self.total_items.get()
    }

    /// Records the total number of items.
    ///
    /// This does not notify by itself: it only emits if the current page no
    /// longer exists and has to move back.
    pub fn set_total_items(&self, total: Option<usize>) {
        self.total_items.set(total);
        if let Some(last) = self.last_page()
            && self.current() > last
        {
            self.set_current(last);
        }
    }

    /// The last page, if the total is known.
    pub fn last_page(&self) -> Option<usize> {
        let total = self.total_items()?;
        let size = self.size();
        if size == 0 {
            return Some(1);
        }
        Some(total.div_ceil(size).max(1))
    }

    /// Index of the first item on the current page.
    pub fn first_item(&self) -> usize {
        (self.current() - 1).saturating_mul(self.size())
    }

    /// Index of the last item on the current page.
    pub fn last_item(&self) -> usize {
        let size = self.size();
        let total = self.total_items();
        if size == 0 {
            return total.map_or(0, |t| t.saturating_sub(1));
        }
        let first = self.first_item();
        let last = first.saturating_add(size - 1);
        match total {
            Some(total) => last.min(total.saturating_sub(1)).max(first),
            None => last,
        }
    }

    /// The page block to send downstream, if paging is enabled.
    pub fn descriptor(&self) -> Option<PageDescriptor> {
        let size = self.size();
        (size > 0).then(|| PageDescriptor {
            from: self.first_item(),
            to: self.last_item(),
            size,
        })
    }

}

impl fmt::Debug for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageState")
            .field("size", &self.size())
            .field("current", &self.current())
            .field("total_items", &self.total_items())
            .finish()
    }
}

static_assertions::assert_impl_all!(PageState: Send, Sync);
