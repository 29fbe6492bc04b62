//! Filter state.
//!
//! Filters are registered once and keep a stable [`FilterId`]. Only active
//! filters take part in the consolidated state: a property filter is active
//! when its value is non-empty, a custom filter decides for itself.

use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_debug, grid_trace, Signal};
use parking_lot::RwLock;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a filter registered with a [`FilterState`].
    pub struct FilterId;
}

/// A user-supplied filter.
pub trait ItemFilter<T>: Send + Sync {
    /// Whether the filter currently restricts anything.
    fn is_active(&self) -> bool;

    /// Whether `item` passes the filter.
    fn accepts(&self, item: &T) -> bool;

    /// A serializable description for consumers of the consolidated state.
    fn describe(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// A filter on the grid items.
pub enum Filter<T> {
    /// Built-in string filter on a named property.
    Property {
        /// Name of the item property to match.
        property: String,
        /// Text to look for. An empty value makes the filter inactive.
        value: String,
    },
    /// Custom filter.
    Custom(Arc<dyn ItemFilter<T>>),
}

impl<T> Filter<T> {
    /// A built-in property filter.
    pub fn property(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Property {
            property: property.into(),
            value: value.into(),
        }
    }

    /// A custom filter.
    pub fn custom(filter: impl ItemFilter<T> + 'static) -> Self {
        Self::Custom(Arc::new(filter))
    }

    /// Whether the filter currently restricts anything.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Property { value, .. } => !value.is_empty(),
            Self::Custom(filter) => filter.is_active(),
        }
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Property { property, value } => Self::Property {
                property: property.clone(),
                value: value.clone(),
            },
            Self::Custom(filter) => Self::Custom(filter.clone()),
        }
    }
}

impl<T> PartialEq for Filter<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Property { property, value },
                Self::Property {
                    property: other_property,
                    value: other_value,
                },
            ) => property == other_property && value == other_value,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property { property, value } => f
                .debug_struct("Property")
                .field("property", property)
                .field("value", value)
                .finish(),
            Self::Custom(filter) => f.debug_tuple("Custom").field(&filter.describe()).finish(),
        }
    }
}

/// Property filters flatten to `{"property": .., "value": ..}`.
impl<T> Serialize for Filter<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Property { property, value } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("property", property)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Custom(filter) => filter.describe().serialize(serializer),
        }
    }
}

struct FilterInner<T> {
    filters: SlotMap<FilterId, Filter<T>>,
    order: Vec<FilterId>,
}

/// The filters registered on a datagrid.
pub struct FilterState<T> {
    inner: RwLock<FilterInner<T>>,

    /// Emitted when a change affects the set of active filters.
    pub changed: Arc<Signal<()>>,
}

impl<T: 'static> Default for FilterState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> FilterState<T> {
    /// Creates a state without filters.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(FilterInner {
                filters: SlotMap::with_key(),
                order: Vec::new(),
            }),
            changed: Arc::new(Signal::new()),
        }
    }

    /// Registers a filter.
    pub fn add(&self, filter: Filter<T>) -> FilterId {
        let active = filter.is_active();
        let id = {
            let mut inner = self.inner.write();
            let id = inner.filters.insert(filter);
            inner.order.push(id);
            id
        };
        grid_debug!(target: targets::STATE, ?id, active, "filter registered");
        if active {
            self.changed.emit(());
        }
        id
    }

    /// Replaces a registered filter. Returns `false` for an unknown id.
    pub fn update(&self, id: FilterId, filter: Filter<T>) -> bool {
        let affected = {
            let mut inner = self.inner.write();
            let Some(slot) = inner.filters.get_mut(id) else {
                grid_trace!(target: targets::STATE, ?id, "update of unknown filter");
                return false;
            };
            let affected = slot.is_active() || filter.is_active();
            *slot = filter;
            affected
        };
        if affected {
            self.changed.emit(());
        }
        true
    }

    /// Sets the value of a property filter.
    ///
    /// Returns `false` for an unknown id or a custom filter.
    pub fn set_value(&self, id: FilterId, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = {
            let mut inner = self.inner.write();
            match inner.filters.get_mut(id) {
                Some(Filter::Property { value: current, .. }) => {
                    if *current == value {
                        false
                    } else {
                        *current = value;
                        true
                    }
                }
                _ => return false,
            }
        };
        if changed {
            self.changed.emit(());
        }
        true
    }

    /// Unregisters a filter.
    pub fn remove(&self, id: FilterId) -> Option<Filter<T>> {
        let removed = {
            let mut inner = self.inner.write();
            let removed = inner.filters.remove(id)?;
            inner.order.retain(|other| *other != id);
            removed
        };
        grid_debug!(target: targets::STATE, ?id, "filter removed");
        if removed.is_active() {
            self.changed.emit(());
        }
        Some(removed)
    }

    /// A registered filter.
    pub fn get(&self, id: FilterId) -> Option<Filter<T>> {
        self.inner.read().filters.get(id).cloned()
    }

    /// Number of registered filters, active or not.
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    /// Returns `true` if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active filters in registration order.
    pub fn active_filters(&self) -> Vec<Filter<T>> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.filters.get(*id))
            .filter(|filter| filter.is_active())
            .cloned()
            .collect()
    }

    /// Announces that a custom filter changed its own state.
    pub fn invalidate(&self) {
        self.changed.emit(());
    }

}

impl<T> fmt::Debug for FilterState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_list()
            .entries(inner.order.iter().filter_map(|id| inner.filters.get(*id)))
            .finish()
    }
}

static_assertions::assert_impl_all!(FilterState<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct MinLength {
        min: usize,
        enabled: AtomicBool,
    }

    impl ItemFilter<String> for MinLength {
        fn is_active(&self) -> bool {
            self.enabled.load(Ordering::SeqCst)
        }

        fn accepts(&self, item: &String) -> bool {
            item.len() >= self.min
        }

        fn describe(&self) -> serde_json::Value {
            serde_json::json!({ "minLength": self.min })
        }
    }

    fn counter(filters: &FilterState<String>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        filters.changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_property_filter_activity() {
        assert!(!Filter::<String>::property("status", "").is_active());
        assert!(Filter::<String>::property("status", "open").is_active());
    }

    #[test]
    fn test_inactive_filters_do_not_emit() {
        let filters = FilterState::<String>::new();
        let count = counter(&filters);

        let id = filters.add(Filter::property("status", ""));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(filters.active_filters().is_empty());

        assert!(filters.set_value(id, "open"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(filters.active_filters(), vec![Filter::property("status", "open")]);

        assert!(filters.set_value(id, "open"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registration_order() {
        let filters = FilterState::<String>::new();
        let a = filters.add(Filter::property("a", "1"));
        filters.add(Filter::property("b", "2"));
        filters.remove(a);
        filters.add(Filter::property("c", "3"));

        let keys: Vec<_> = filters
            .active_filters()
            .into_iter()
            .map(|f| match f {
                Filter::Property { property, .. } => property,
                Filter::Custom(_) => unreachable!(),
            })
            .collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert_eq!(filters.len(), 2);
    }

    #[test]
    fn test_custom_filter() {
        let filters = FilterState::<String>::new();
        let count = counter(&filters);
        let min_length = Arc::new(MinLength {
            min: 3,
            enabled: AtomicBool::new(false),
        });
        let id = filters.add(Filter::Custom(min_length.clone()));
        assert!(filters.active_filters().is_empty());
        assert!(!filters.set_value(id, "x"));

        min_length.enabled.store(true, Ordering::SeqCst);
        filters.invalidate();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let active = filters.active_filters();
        assert_eq!(active.len(), 1);
        assert_eq!(
            serde_json::to_value(&active[0]).unwrap(),
            serde_json::json!({ "minLength": 3 })
        );
        assert!(min_length.accepts(&"abcd".to_string()));
    }

    #[test]
    fn test_unknown_ids() {
        let filters = FilterState::<String>::new();
        let id = filters.add(Filter::property("a", ""));
        assert!(filters.remove(id).is_some());
        assert!(filters.remove(id).is_none());
        assert!(!filters.update(id, Filter::property("a", "b")));
        assert!(filters.get(id).is_none());
    }

    #[test]
    fn test_update_emits_when_activity_affected() {
        let filters = FilterState::<String>::new();
        let count = counter(&filters);
        let id = filters.add(Filter::property("a", ""));

        assert!(filters.update(id, Filter::property("b", "")));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(filters.update(id, Filter::property("b", "x")));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
