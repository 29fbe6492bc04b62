//! Sort, filter and page state.
//!
//! Each slice is independently mutable and exposes a `changed` signal. The
//! [`GridStateAggregator`] reads all three and builds the
//! [`ConsolidatedState`] sent downstream on every refresh.

mod aggregator;
mod filter;
mod page;
mod sort;

pub use aggregator::{ConsolidatedState, GridStateAggregator};
pub use filter::{Filter, FilterId, FilterState, ItemFilter};
pub use page::{PageDescriptor, PageState};
pub use sort::{Comparator, ItemComparator, SortDescriptor, SortState};
