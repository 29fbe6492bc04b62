//! Logging facilities for Horizon Datagrid.
//!
//! Horizon Datagrid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!     // Your application code...
//! }
//! ```
//!
//! Use the constants in [`targets`] to filter by subsystem, e.g.
//! `RUST_LOG=horizon_datagrid::columns=debug`.

/// Span names used throughout Horizon Datagrid for tracing.
pub mod span_names {
    /// Column width stabilization span.
    pub const STABILIZE: &str = "horizon_datagrid::stabilize";
    /// Consolidated state refresh span.
    pub const REFRESH: &str = "horizon_datagrid::refresh";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_datagrid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_datagrid_core::signal";
    /// Column width engine target.
    pub const COLUMNS: &str = "horizon_datagrid::columns";
    /// Row action gate target.
    pub const ROW_ACTIONS: &str = "horizon_datagrid::row_actions";
    /// Selection target.
    pub const SELECTION: &str = "horizon_datagrid::selection";
    /// Sort/filter/page state target.
    pub const STATE: &str = "horizon_datagrid::state";
    /// Grid coordinator target.
    pub const COORDINATOR: &str = "horizon_datagrid::coordinator";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as a column
/// stabilization pass.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_datagrid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with consistent target
/// naming. The first form logs to [`targets::CORE`]; the second takes an
/// explicit target from [`targets`].
#[macro_export]
macro_rules! grid_trace {
    (target: $target:expr, $($arg:tt)*) => {
        tracing::trace!(target: $target, $($arg)*)
    };
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! grid_debug {
    (target: $target:expr, $($arg:tt)*) => {
        tracing::debug!(target: $target, $($arg)*)
    };
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}

#[macro_export]
macro_rules! grid_warn {
    (target: $target:expr, $($arg:tt)*) => {
        tracing::warn!(target: $target, $($arg)*)
    };
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::CORE, $($arg)*)
    };
}
