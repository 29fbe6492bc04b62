//! Consolidated query state.
//!
//! [`GridStateAggregator`] combines the sort, filter and page slices into one
//! [`ConsolidatedState`] and emits it as a refresh request. A remote data
//! source typically serializes it straight into a query:
//!
//! ```
//! use std::sync::Arc;
//! use horizon_datagrid::state::{Comparator, Filter, FilterState, GridStateAggregator, PageState, SortState};
//!
//! let sort = Arc::new(SortState::<String>::new());
//! let filters = Arc::new(FilterState::new());
//! let page = Arc::new(PageState::new(10));
//! let aggregator = GridStateAggregator::new(sort.clone(), filters.clone(), page);
//!
//! sort.set_comparator(Comparator::property("name"));
//! filters.add(Filter::property("status", "open"));
//!
//! let json = serde_json::to_string(&aggregator.consolidate()).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"page":{"from":0,"to":9,"size":10},"sort":{"by":"name","reverse":false},"filters":[{"property":"status","value":"open"}]}"#
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::{span_names, targets};
use horizon_datagrid_core::{grid_debug, Signal};
use serde::Serialize;

use super::filter::{Filter, FilterState};
use super::page::{PageDescriptor, PageState};
use super::sort::{SortDescriptor, SortState};

/// A snapshot of sort, filter and page state.
///
/// Blocks are absent when the corresponding feature is inactive; a default
/// grid consolidates to `{}`.
#[derive(Serialize)]
#[serde(bound = "")]
pub struct ConsolidatedState<T> {
    /// The item window, present while paging is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageDescriptor>,
    /// The sort order, present once a comparator is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDescriptor<T>>,
    /// Active filters in registration order. Never an empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter<T>>>,
}

impl<T> ConsolidatedState<T> {
    /// Returns `true` if no block is present.
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.sort.is_none() && self.filters.is_none()
    }
}

impl<T> Default for ConsolidatedState<T> {
    fn default() -> Self {
        Self {
            page: None,
            sort: None,
            filters: None,
        }
    }
}

impl<T> Clone for ConsolidatedState<T> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            sort: self.sort.clone(),
            filters: self.filters.clone(),
        }
    }
}

impl<T> PartialEq for ConsolidatedState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page && self.sort == other.sort && self.filters == other.filters
    }
}

impl<T> fmt::Debug for ConsolidatedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsolidatedState")
            .field("page", &self.page)
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .finish()
    }
}

/// Builds consolidated states from the sort, filter and page slices.
pub struct GridStateAggregator<T> {
    sort: Arc<SortState<T>>,
    filters: Arc<FilterState<T>>,
    page: Arc<PageState>,

    /// Emitted with every triggered snapshot.
    pub refresh: Arc<Signal<ConsolidatedState<T>>>,
}

impl<T: 'static> GridStateAggregator<T> {
    /// Creates an aggregator reading the given slices.
    pub fn new(sort: Arc<SortState<T>>, filters: Arc<FilterState<T>>, page: Arc<PageState>) -> Self {
        Self {
            sort,
            filters,
            page,
            refresh: Arc::new(Signal::new()),
        }
    }

    /// Snapshots the current state.
    pub fn consolidate(&self) -> ConsolidatedState<T> {
        let active = self.filters.active_filters();
        ConsolidatedState {
            page: self.page.descriptor(),
            sort: self.sort.descriptor(),
            filters: (!active.is_empty()).then_some(active),
        }
    }

    /// Emits a fresh snapshot on [`refresh`](Self::refresh).
    pub fn trigger(&self) {
        let state = {
            let _span = tracing::debug_span!(target: targets::STATE, span_names::REFRESH).entered();
            self.consolidate()
        };
        grid_debug!(
            target: targets::STATE,
            page = state.page.is_some(),
            sort = state.sort.is_some(),
            filters = state.filters.as_ref().map_or(0, Vec::len),
            "refresh requested"
        );
        self.refresh.emit(state);
    }

    /// The sort slice.
    pub fn sort(&self) -> &Arc<SortState<T>> {
        &self.sort
    }

    /// The filter slice.
    pub fn filters(&self) -> &Arc<FilterState<T>> {
        &self.filters
    }

    /// The page slice.
    pub fn page(&self) -> &Arc<PageState> {
        &self.page
    }

}

impl<T> fmt::Debug for GridStateAggregator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStateAggregator")
            .field("sort", &self.sort)
            .field("filters", &self.filters)
            .field("page", &self.page)
            .finish()
    }
}

static_assertions::assert_impl_all!(GridStateAggregator<String>: Send, Sync);
