//! Prelude module for Horizon Datagrid.
//!
//! ```ignore
//! use horizon_datagrid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The coordinator and its configuration (`Datagrid`, `GridConfig`)
//! - Rendering capabilities (`Renderer`, `Measurer`, `ElementHandle`)
//! - Selection and query state types
//! - Signal/slot system (`Signal`, `Subscription`)

// ============================================================================
// Coordination
// ============================================================================

pub use crate::config::GridConfig;
pub use crate::coordinator::Datagrid;
pub use crate::row::DatagridRow;

// ============================================================================
// Rendering Environment
// ============================================================================

pub use crate::dom::{ElementHandle, Measurer, Renderer};

// ============================================================================
// Layout
// ============================================================================

pub use crate::columns::{ColumnWidth, ColumnWidthEngine};
pub use crate::row_action::RowActionGate;

// ============================================================================
// Selection and Query State
// ============================================================================

pub use crate::selection::{GridItem, Selection, SelectionMode, SelectionSnapshot};
pub use crate::state::{
    Comparator, ConsolidatedState, Filter, FilterId, FilterState, ItemComparator, ItemFilter,
    PageDescriptor, PageState, SortDescriptor, SortState,
};

// ============================================================================
// Signal/Slot and Property System
// ============================================================================

pub use horizon_datagrid_core::{Property, Signal, Subscription};
