//! Column width stabilization.
//!
//! [`ColumnWidthEngine`] owns one [`ColumnWidth`] record per header and keeps
//! header and cell widths aligned. A stabilization pass runs in four phases:
//!
//! 1. **Clear**: remove the inline widths this engine wrote on non-strict headers.
//! 2. **Probe**: a header with a user-defined width becomes a strict column.
//! 3. **Measure**: the compute class is toggled on the table wrapper so the
//!    environment lays the table out once, and the natural width of every
//!    non-strict header is read.
//! 4. **Apply**: strict headers get the fixed-width marker and keep their own
//!    width; the others get the measured width as an inline style.
//!
//! Every pass ends with a `resized` notification so rows can re-apply
//! [`ColumnWidthEngine::apply_cell_widths`].
//!
//! # Example
//!
//! ```ignore
//! use horizon_datagrid::{ColumnWidthEngine, GridConfig};
//!
//! let engine = ColumnWidthEngine::new(renderer, measurer, &GridConfig::default());
//! engine.set_headers(vec![name_header, status_header]);
//! engine.stabilize(&table_wrapper);
//!
//! let row_cells = vec![name_cell, status_cell];
//! engine.apply_cell_widths(&row_cells);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::{span_names, targets};
use horizon_datagrid_core::{grid_debug, grid_trace, PerfSpan, Signal};
use parking_lot::Mutex;

use crate::config::GridConfig;
use crate::dom::{px, ElementHandle, Measurer, Renderer};

/// The resolved width of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidth {
    /// Width in pixels.
    pub pixels: f32,
    /// `true` if the width was authored outside the engine and must never be
    /// overwritten by measurement.
    pub strict: bool,
}

impl ColumnWidth {
    /// A user-authored width.
    pub fn strict(pixels: f32) -> Self {
        Self { pixels, strict: true }
    }

    /// A measured width, recomputed on every pass.
    pub fn flexible(pixels: f32) -> Self {
        Self {
            pixels,
            strict: false,
        }
    }

    /// The width as an inline style value.
    pub fn css_value(&self) -> String {
        px(self.pixels)
    }
}

struct EngineInner<E> {
    headers: Vec<E>,
    /// Index-aligned with `headers` when non-empty. Empty means not stabilized.
    widths: Vec<ColumnWidth>,
    /// The wrapper used by the last pass.
    table_wrapper: Option<E>,
}

/// Computes and applies column widths for a datagrid.
pub struct ColumnWidthEngine<E: ElementHandle> {
    renderer: Arc<dyn Renderer<E>>,
    measurer: Arc<dyn Measurer<E>>,
    compute_width_class: String,
    strict_width_class: String,
    width_property: String,
    inner: Mutex<EngineInner<E>>,

    /// Emitted after every pass that changed the width records.
    pub resized: Arc<Signal<()>>,
}

impl<E: ElementHandle> ColumnWidthEngine<E> {
    /// Creates an engine writing through `renderer` and reading through `measurer`.
    pub fn new(
        renderer: Arc<dyn Renderer<E>>,
        measurer: Arc<dyn Measurer<E>>,
        config: &GridConfig,
    ) -> Self {
        Self {
            renderer,
            measurer,
            compute_width_class: config.compute_width_class.clone(),
            strict_width_class: config.strict_width_class.clone(),
            width_property: config.width_property.clone(),
            inner: Mutex::new(EngineInner {
                headers: Vec::new(),
                widths: Vec::new(),
                table_wrapper: None,
            }),
            resized: Arc::new(Signal::new()),
        }
    }

    // =========================================================================
    // Headers
    // =========================================================================

    /// Replaces the header set.
    ///
    /// An empty list is ignored. Otherwise the widths written on the previous
    /// headers are cleared and the engine goes back to the unstabilized state.
    pub fn set_headers(&self, headers: Vec<E>) {
        if headers.is_empty() {
            grid_trace!(target: targets::COLUMNS, "ignoring empty header set");
            return;
        }

        let mut inner = self.inner.lock();
        self.clear_header_widths(&inner.headers, &inner.widths);
        grid_debug!(
            target: targets::COLUMNS,
            previous = inner.headers.len(),
            count = headers.len(),
            "headers replaced"
        );
        inner.headers = headers;
        inner.widths.clear();
    }

    /// Applies a pure reordering of the current headers.
    ///
    /// Width records follow their header, so no measurement happens. Returns
    /// `false` and changes nothing if the engine is not stabilized or if
    /// `headers` is not a permutation of the current header set.
    pub fn reorder_headers(&self, headers: Vec<E>) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.widths.is_empty() || headers.len() != inner.headers.len() {
                return false;
            }

            let mut positions: HashMap<&E, Vec<usize>> = HashMap::new();
            for (index, header) in inner.headers.iter().enumerate().rev() {
                positions.entry(header).or_default().push(index);
            }

            let mut permutation = Vec::with_capacity(headers.len());
            for header in &headers {
                match positions.get_mut(header).and_then(Vec::pop) {
                    Some(previous) => permutation.push(previous),
                    None => return false,
                }
            }

            let widths: Vec<ColumnWidth> = permutation
                .into_iter()
                .filter_map(|previous| inner.widths.get(previous).copied())
                .collect();
            for (header, width) in headers.iter().zip(&widths) {
                self.apply_header_width(header, width);
            }
            grid_debug!(target: targets::COLUMNS, count = headers.len(), "headers reordered");
            inner.headers = headers;
            inner.widths = widths;
        }

        self.resized.emit(());
        true
    }

    /// The current headers.
    pub fn headers(&self) -> Vec<E> {
        self.inner.lock().headers.clone()
    }

    /// Number of headers.
    pub fn header_count(&self) -> usize {
        self.inner.lock().headers.len()
    }

    // =========================================================================
    // Stabilization
    // =========================================================================

    /// Measures and fixes the width of every column.
    ///
    /// Returns `false` without doing anything when there are no headers.
    /// Every call re-measures; callers are expected to gate calls.
    pub fn stabilize(&self, table_wrapper: &E) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.headers.is_empty() {
                grid_trace!(target: targets::COLUMNS, "no headers, skipping stabilization");
                return false;
            }

            let _perf = PerfSpan::new(span_names::STABILIZE);
            inner.table_wrapper = Some(table_wrapper.clone());

            self.clear_header_widths(&inner.headers, &inner.widths);

            let mut widths: Vec<ColumnWidth> = inner
                .headers
                .iter()
                .map(|header| {
                    let user_width = self.measurer.user_defined_width(header);
                    if user_width > 0.0 {
                        ColumnWidth::strict(user_width)
                    } else {
                        ColumnWidth::flexible(0.0)
                    }
                })
                .collect();

            self.renderer
                .set_class(table_wrapper, &self.compute_width_class, true);
            for (header, width) in inner.headers.iter().zip(widths.iter_mut()) {
                if !width.strict {
                    width.pixels = self.measurer.scroll_width(header);
                }
            }
            self.renderer
                .set_class(table_wrapper, &self.compute_width_class, false);

            for (header, width) in inner.headers.iter().zip(&widths) {
                self.apply_header_width(header, width);
            }

            grid_debug!(
                target: targets::COLUMNS,
                columns = widths.len(),
                strict = widths.iter().filter(|w| w.strict).count(),
                "columns stabilized"
            );
            inner.widths = widths;
        }

        self.resized.emit(());
        true
    }

    /// Runs [`stabilize`](Self::stabilize) again against the last table wrapper.
    ///
    /// Returns `false` if there is no wrapper to measure in, either because
    /// no pass ran yet or because it was released with
    /// [`release_table_wrapper`](Self::release_table_wrapper).
    pub fn restabilize(&self) -> bool {
        let wrapper = self.inner.lock().table_wrapper.clone();
        match wrapper {
            Some(wrapper) => self.stabilize(&wrapper),
            None => {
                grid_trace!(target: targets::COLUMNS, "no table wrapper, nothing to redo");
                false
            }
        }
    }

    /// Forgets the wrapper remembered by the last pass.
    ///
    /// Width records are kept. Until the next [`stabilize`](Self::stabilize),
    /// [`restabilize`](Self::restabilize) does nothing.
    pub fn release_table_wrapper(&self) {
        if self.inner.lock().table_wrapper.take().is_some() {
            grid_trace!(target: targets::COLUMNS, "table wrapper released");
        }
    }

    /// Returns `true` once a pass has produced width records for the current headers.
    pub fn is_stabilized(&self) -> bool {
        !self.inner.lock().widths.is_empty()
    }

    /// A copy of the width records.
    pub fn widths(&self) -> Vec<ColumnWidth> {
        self.inner.lock().widths.clone()
    }

    // =========================================================================
    // Cells
    // =========================================================================

    /// Constrains one row's cells to the resolved column widths.
    ///
    /// Does nothing before the first stabilization. Cells without a matching
    /// record are left alone.
    pub fn apply_cell_widths(&self, cells: &[E]) {
        let inner = self.inner.lock();
        if inner.widths.is_empty() {
            return;
        }
        for (cell, width) in cells.iter().zip(&inner.widths) {
            self.renderer
                .set_class(cell, &self.strict_width_class, width.strict);
            self.renderer
                .set_style(cell, &self.width_property, Some(&width.css_value()));
        }
    }

    fn clear_header_widths(&self, headers: &[E], widths: &[ColumnWidth]) {
        for (header, width) in headers.iter().zip(widths) {
            // Strict widths belong to the user.
            if !width.strict {
                self.renderer.set_style(header, &self.width_property, None);
            }
        }
    }

    fn apply_header_width(&self, header: &E, width: &ColumnWidth) {
        if width.strict {
            self.renderer.set_class(header, &self.strict_width_class, true);
        } else {
            self.renderer.set_class(header, &self.strict_width_class, false);
            self.renderer
                .set_style(header, &self.width_property, Some(&width.css_value()));
        }
    }
}

impl<E: ElementHandle> fmt::Debug for ColumnWidthEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ColumnWidthEngine")
            .field("headers", &inner.headers)
            .field("widths", &inner.widths)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ColumnWidthEngine<u32>: Send, Sync);
