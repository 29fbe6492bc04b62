//! Mutual exclusion for row action overlays.
//!
//! Opening an action menu can make a scrollbar appear or disappear, which
//! changes the width available to the columns. [`RowActionGate`] makes sure
//! only one overlay is live at a time and asks the [`ColumnWidthEngine`] to
//! re-stabilize whenever the gate is taken or truly released.
//!
//! At most one action waits while the gate is locked. A newer request
//! replaces the waiting one.

use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::grid_debug;
use horizon_datagrid_core::grid_warn;
use horizon_datagrid_core::logging::targets;
use parking_lot::Mutex;

use crate::columns::ColumnWidthEngine;
use crate::dom::ElementHandle;

type Action = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct GateState {
    locked: bool,
    pending: Option<Action>,
}

/// Single-slot gate serializing layout-affecting row actions.
pub struct RowActionGate<E: ElementHandle> {
    columns: Arc<ColumnWidthEngine<E>>,
    actionable: Mutex<usize>,
    state: Mutex<GateState>,
}

impl<E: ElementHandle> RowActionGate<E> {
    /// Creates an unlocked gate re-stabilizing `columns`.
    pub fn new(columns: Arc<ColumnWidthEngine<E>>) -> Self {
        Self {
            columns,
            actionable: Mutex::new(0),
            state: Mutex::new(GateState::default()),
        }
    }

    /// Records a row that offers at least one action.
    pub fn register(&self) {
        *self.actionable.lock() += 1;
    }

    /// Forgets a row registered with [`register`](Self::register).
    pub fn deregister(&self) {
        let mut count = self.actionable.lock();
        match count.checked_sub(1) {
            Some(next) => *count = next,
            None => grid_warn!(target: targets::ROW_ACTIONS, "deregister without matching register"),
        }
    }

    /// Number of registered actionable rows.
    pub fn actionable_count(&self) -> usize {
        *self.actionable.lock()
    }

    /// Whether an actions column needs to be reserved.
    pub fn has_actionable_rows(&self) -> bool {
        self.actionable_count() > 0
    }

    /// Runs `action` now if the gate is free, otherwise keeps it as the
    /// pending action.
    pub fn open<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.state.lock();
            if state.locked {
                if state.pending.replace(Box::new(action)).is_some() {
                    grid_debug!(target: targets::ROW_ACTIONS, "replaced pending row action");
                }
                return;
            }
            state.locked = true;
        }

        grid_debug!(target: targets::ROW_ACTIONS, "row action opened");
        action();
        self.columns.restabilize();
    }

    /// Finishes the live action.
    ///
    /// A pending action takes over without releasing the gate. Otherwise the
    /// gate unlocks and the columns are re-stabilized. Closing a free gate is
    /// harmless.
    pub fn close(&self) {
        let pending = {
            let mut state = self.state.lock();
            let pending = state.pending.take();
            if pending.is_none() {
                state.locked = false;
            }
            pending
        };

        match pending {
            Some(action) => {
                grid_debug!(target: targets::ROW_ACTIONS, "running pending row action");
                action();
            }
            None => {
                grid_debug!(target: targets::ROW_ACTIONS, "row action gate released");
                self.columns.restabilize();
            }
        }
    }

    /// Whether an action currently holds the gate.
    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    /// Whether an action is waiting for the gate.
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }
}

impl<E: ElementHandle> fmt::Debug for RowActionGate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RowActionGate")
            .field("actionable", &*self.actionable.lock())
            .field("locked", &state.locked)
            .field("pending", &state.pending.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(RowActionGate<u32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::dom::fake::FakeDom;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        gate: RowActionGate<u32>,
        passes: Arc<AtomicUsize>,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    fn fixture() -> Fixture {
        let dom = FakeDom::new();
        let columns = Arc::new(ColumnWidthEngine::new(
            dom.clone(),
            dom.clone(),
            &GridConfig::default(),
        ));
        columns.set_headers(vec![1, 2]);
        columns.stabilize(&100);

        let passes = Arc::new(AtomicUsize::new(0));
        let passes_clone = passes.clone();
        columns.resized.connect(move |_| {
            passes_clone.fetch_add(1, Ordering::SeqCst);
        });

        Fixture {
            gate: RowActionGate::new(columns),
            passes,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> Box<dyn FnOnce() + Send> {
        let log = log.clone();
        Box::new(move || log.lock().push(name))
    }

    #[test]
    fn test_register_deregister() {
        let f = fixture();
        assert!(!f.gate.has_actionable_rows());
        f.gate.register();
        f.gate.register();
        assert_eq!(f.gate.actionable_count(), 2);
        f.gate.deregister();
        f.gate.deregister();
        f.gate.deregister();
        assert_eq!(f.gate.actionable_count(), 0);
    }

    #[test]
    fn test_open_close_sequence() {
        let f = fixture();

        f.gate.open(push(&f.log, "a"));
        assert!(f.gate.is_locked());
        assert_eq!(*f.log.lock(), vec!["a"]);
        assert_eq!(f.passes.load(Ordering::SeqCst), 1);

        f.gate.open(push(&f.log, "b"));
        assert!(f.gate.has_pending());
        assert_eq!(*f.log.lock(), vec!["a"]);

        f.gate.close();
        assert_eq!(*f.log.lock(), vec!["a", "b"]);
        assert!(f.gate.is_locked());
        assert!(!f.gate.has_pending());
        assert_eq!(f.passes.load(Ordering::SeqCst), 1);

        f.gate.close();
        assert!(!f.gate.is_locked());
        assert_eq!(f.passes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_last_pending_wins() {
        let f = fixture();
        f.gate.open(push(&f.log, "a"));
        f.gate.open(push(&f.log, "b"));
        f.gate.open(push(&f.log, "c"));
        f.gate.close();
        assert_eq!(*f.log.lock(), vec!["a", "c"]);
    }

    #[test]
    fn test_close_when_free() {
        let f = fixture();
        f.gate.close();
        assert!(!f.gate.is_locked());
        assert_eq!(f.passes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_action_may_reenter_gate() {
        let f = Arc::new(fixture());
        let f_clone = f.clone();
        f.gate.open(move || {
            f_clone.gate.open(push(&f_clone.log, "nested"));
        });
        assert!(f.gate.has_pending());
        f.gate.close();
        assert_eq!(*f.log.lock(), vec!["nested"]);
    }
}
