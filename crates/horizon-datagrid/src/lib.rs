//! Horizon Datagrid - the coordination core of a tabular data widget.
//!
//! This crate re-exports the core signal/property APIs and adds the grid
//! itself:
//!
//! - **Column widths**: [`ColumnWidthEngine`] measures and fixes column widths,
//!   preserving widths authored outside the grid
//! - **Row actions**: [`RowActionGate`] serializes layout-affecting overlays
//! - **Selection**: [`Selection`] in none, single or multi mode
//! - **Query state**: sort, filter and page slices consolidated by
//!   [`state::GridStateAggregator`]
//! - **Coordination**: [`Datagrid`] wires it all together
//!
//! The rendering environment is reached only through the injected
//! [`Renderer`] and [`Measurer`] capabilities.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_datagrid::{Datagrid, Measurer, Renderer};
//!
//! struct Headless;
//!
//! impl Renderer<u32> for Headless {
//!     fn set_class(&self, _: &u32, _: &str, _: bool) {}
//!     fn set_style(&self, _: &u32, _: &str, _: Option<&str>) {}
//! }
//!
//! impl Measurer<u32> for Headless {
//!     fn user_defined_width(&self, _: &u32) -> f32 { 0.0 }
//!     fn scroll_width(&self, header: &u32) -> f32 { 100.0 + *header as f32 }
//!     fn scrollbar_gutter_width(&self, _: &u32) -> f32 { 0.0 }
//! }
//!
//! let dom = Arc::new(Headless);
//! let grid: Datagrid<u32, &str> = Datagrid::new(dom.clone(), dom);
//! grid.set_headers(vec![1, 2]);
//! grid.attach(0);
//!
//! let rows = vec![grid.create_row("first", vec![11, 12], false)];
//! grid.set_rows(&rows);
//!
//! assert!(grid.columns_stable());
//! assert_eq!(grid.columns().widths()[1].pixels, 102.0);
//! ```

pub use horizon_datagrid_core::*;

pub mod columns;
pub mod config;
pub mod coordinator;
pub mod dom;
mod error;
pub mod prelude;
pub mod row;
pub mod row_action;
pub mod scrollbar;
pub mod selection;
pub mod state;

pub use columns::{ColumnWidth, ColumnWidthEngine};
pub use config::GridConfig;
pub use coordinator::Datagrid;
pub use dom::{ElementHandle, Measurer, Renderer};
pub use error::{Error, Result};
pub use row::DatagridRow;
pub use row_action::RowActionGate;
pub use scrollbar::ScrollbarTracker;
pub use selection::{GridItem, Selection, SelectionMode, SelectionSnapshot};
