//! Scrollbar gutter tracking for the datagrid body.
//!
//! When the body's vertical scrollbar appears or disappears, the header row
//! has to be padded by the same amount to stay aligned with the cells.

use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_debug, Signal};
use parking_lot::Mutex;

use crate::dom::{ElementHandle, Measurer};

struct TrackerState<E> {
    body: Option<E>,
    width: f32,
}

/// Tracks the width of the body's scrollbar gutter.
pub struct ScrollbarTracker<E: ElementHandle> {
    measurer: Arc<dyn Measurer<E>>,
    state: Mutex<TrackerState<E>>,

    /// Emitted when the gutter width changes.
    pub changed: Signal<f32>,
}

impl<E: ElementHandle> ScrollbarTracker<E> {
    /// Creates a tracker without a body element.
    pub fn new(measurer: Arc<dyn Measurer<E>>) -> Self {
        Self {
            measurer,
            state: Mutex::new(TrackerState {
                body: None,
                width: 0.0,
            }),
            changed: Signal::new(),
        }
    }

    /// Sets the body element to measure.
    pub fn set_body(&self, body: Option<E>) {
        self.state.lock().body = body;
    }

    /// The body element being measured.
    pub fn body(&self) -> Option<E> {
        self.state.lock().body.clone()
    }

    /// The last measured gutter width.
    pub fn width(&self) -> f32 {
        self.state.lock().width
    }

    /// Measures the gutter again, emitting `changed` if it moved.
    ///
    /// Returns the current width. Without a body this returns the last width.
    pub fn compute(&self) -> f32 {
        let width = {
            let mut state = self.state.lock();
            let Some(body) = state.body.as_ref() else {
                return state.width;
            };
            let width = self.measurer.scrollbar_gutter_width(body);
            if width == state.width {
                return width;
            }
            state.width = width;
            width
        };
        grid_debug!(target: targets::COLUMNS, width, "scrollbar gutter changed");
        self.changed.emit(width);
        width
    }

}

impl<E: ElementHandle> fmt::Debug for ScrollbarTracker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ScrollbarTracker")
            .field("body", &state.body)
            .field("width", &state.width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeDom;

    #[test]
    fn test_compute_emits_on_change() {
        let dom = FakeDom::new();
        let tracker = ScrollbarTracker::<u32>::new(dom.clone());
        let widths = Arc::new(Mutex::new(Vec::new()));
        let widths_clone = widths.clone();
        tracker.changed.connect(move |&w| widths_clone.lock().push(w));

        assert_eq!(tracker.compute(), 0.0);

        tracker.set_body(Some(7));
        dom.gutters.lock().insert(7, 15.0);
        assert_eq!(tracker.compute(), 15.0);
        assert_eq!(tracker.compute(), 15.0);

        dom.gutters.lock().insert(7, 0.0);
        tracker.compute();
        assert_eq!(*widths.lock(), vec![15.0, 0.0]);
    }
}
