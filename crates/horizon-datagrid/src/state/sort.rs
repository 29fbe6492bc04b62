//! Sort state.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use horizon_datagrid_core::logging::targets;
use horizon_datagrid_core::{grid_debug, Property, Signal};
use parking_lot::RwLock;
use serde::{Serialize, Serializer};

/// A user-supplied ordering of items.
///
/// Closures `Fn(&T, &T) -> Ordering` implement this trait.
pub trait ItemComparator<T>: Send + Sync {
    /// Compares two items.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// A serializable description for consumers of the consolidated state.
    fn describe(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

impl<T, F> ItemComparator<T> for F
where
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// How items are ordered.
///
/// The built-in property comparator is a distinct variant, so consumers get
/// the property key instead of an opaque object.
pub enum Comparator<T> {
    /// Order by the named property.
    Property(String),
    /// Order with a custom comparator.
    Custom(Arc<dyn ItemComparator<T>>),
}

impl<T> Comparator<T> {
    /// A built-in property comparator.
    pub fn property(key: impl Into<String>) -> Self {
        Self::Property(key.into())
    }

    /// A custom comparator.
    pub fn custom(comparator: impl ItemComparator<T> + 'static) -> Self {
        Self::Custom(Arc::new(comparator))
    }

    /// The property key of a built-in comparator.
    pub fn property_key(&self) -> Option<&str> {
        match self {
            Self::Property(key) => Some(key),
            Self::Custom(_) => None,
        }
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Property(key) => Self::Property(key.clone()),
            Self::Custom(comparator) => Self::Custom(comparator.clone()),
        }
    }
}

/// Property comparators are equal by key, custom ones by identity.
impl<T> PartialEq for Comparator<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Property(a), Self::Property(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(key) => f.debug_tuple("Property").field(key).finish(),
            Self::Custom(comparator) => f
                .debug_tuple("Custom")
                .field(&comparator.describe())
                .finish(),
        }
    }
}

impl<T> Serialize for Comparator<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Property(key) => serializer.serialize_str(key),
            Self::Custom(comparator) => comparator.describe().serialize(serializer),
        }
    }
}

/// The sort block of a consolidated state.
#[derive(Serialize)]
#[serde(bound = "")]
pub struct SortDescriptor<T> {
    /// Property key or custom comparator.
    pub by: Comparator<T>,
    /// Descending order.
    pub reverse: bool,
}

impl<T> Clone for SortDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            by: self.by.clone(),
            reverse: self.reverse,
        }
    }
}

impl<T> PartialEq for SortDescriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.by == other.by && self.reverse == other.reverse
    }
}

impl<T> fmt::Debug for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("by", &self.by)
            .field("reverse", &self.reverse)
            .finish()
    }
}

/// The current sort comparator and direction.
pub struct SortState<T> {
    comparator: RwLock<Option<Comparator<T>>>,
    reverse: Property<bool>,

    /// Emitted when the comparator or the direction changes.
    pub changed: Arc<Signal<()>>,
}

impl<T: 'static> Default for SortState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> SortState<T> {
    /// Creates an unsorted state.
    pub fn new() -> Self {
        Self {
            comparator: RwLock::new(None),
            reverse: Property::new(false),
            changed: Arc::new(Signal::new()),
        }
    }

    /// The current comparator.
    pub fn comparator(&self) -> Option<Comparator<T>> {
        self.comparator.read().clone()
    }

    /// Whether the order is reversed.
    pub fn reverse(&self) -> bool {
        self.reverse.get()
    }

    /// Sorts with `comparator`, keeping the current direction.
    pub fn set_comparator(&self, comparator: Comparator<T>) {
        {
            let mut current = self.comparator.write();
            if current.as_ref() == Some(&comparator) {
                return;
            }
            grid_debug!(target: targets::STATE, comparator = ?comparator, "sort comparator changed");
            *current = Some(comparator);
        }
        self.changed.emit(());
    }

    /// Sets the direction.
    pub fn set_reverse(&self, reverse: bool) {
        if self.reverse.set(reverse) {
            self.changed.emit(());
        }
    }

    /// Sorts by `comparator`, flipping the direction if it is already the
    /// current comparator, and starting ascending otherwise.
    pub fn toggle(&self, comparator: Comparator<T>) {
        {
            let mut current = self.comparator.write();
            if current.as_ref() == Some(&comparator) {
                let reverse = !self.reverse.get();
                self.reverse.set_silent(reverse);
            } else {
                *current = Some(comparator);
                self.reverse.set_silent(false);
            }
        }
        self.changed.emit(());
    }

    /// Removes sorting.
    pub fn clear(&self) {
        let had_comparator = self.comparator.write().take().is_some();
        let was_reversed = self.reverse.set(false);
        if had_comparator || was_reversed {
            self.changed.emit(());
        }
    }

    /// The sort block to send downstream, if sorting is active.
    pub fn descriptor(&self) -> Option<SortDescriptor<T>> {
        self.comparator().map(|by| SortDescriptor {
            by,
            reverse: self.reverse(),
        })
    }

}

impl<T> fmt::Debug for SortState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortState")
            .field("comparator", &*self.comparator.read())
            .field("reverse", &self.reverse)
            .finish()
    }
}

static_assertions::assert_impl_all!(SortState<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn counter(sort: &SortState<String>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        sort.changed.connect(move |_| {
            count_clone.fetch_add(1, AtomicOrdering::SeqCst);
        });
        count
    }

    #[test]
    fn test_set_comparator_emits_on_change() {
        let sort = SortState::<String>::new();
        let count = counter(&sort);

        sort.set_comparator(Comparator::property("name"));
        sort.set_comparator(Comparator::property("name"));
        sort.set_reverse(false);
        sort.set_reverse(true);

        assert_eq!(count.load(AtomicOrdering::SeqCst), 2);
        let descriptor = sort.descriptor().unwrap();
        assert_eq!(descriptor.by.property_key(), Some("name"));
        assert!(descriptor.reverse);
    }

    #[test]
    fn test_toggle() {
        let sort = SortState::<String>::new();
        sort.toggle(Comparator::property("name"));
        assert!(!sort.reverse());
        sort.toggle(Comparator::property("name"));
        assert!(sort.reverse());
        sort.toggle(Comparator::property("age"));
        assert!(!sort.reverse());
        assert_eq!(sort.comparator(), Some(Comparator::property("age")));
    }

    #[test]
    fn test_custom_comparators_compare_by_identity() {
        let by_len = Comparator::<String>::custom(|a: &String, b: &String| a.len().cmp(&b.len()));
        let other = Comparator::<String>::custom(|a: &String, b: &String| a.len().cmp(&b.len()));
        assert_eq!(by_len, by_len.clone());
        assert_ne!(by_len, other);

        if let Comparator::Custom(c) = &by_len {
            assert_eq!(c.compare(&"ab".to_string(), &"a".to_string()), Ordering::Greater);
        }
    }

    #[test]
    fn test_clear() {
        let sort = SortState::<String>::new();
        let count = counter(&sort);
        sort.clear();
        assert_eq!(count.load(AtomicOrdering::SeqCst), 0);

        sort.toggle(Comparator::property("name"));
        sort.clear();
        assert!(sort.descriptor().is_none());
        assert_eq!(count.load(AtomicOrdering::SeqCst), 2);
    }

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = SortDescriptor::<String> {
            by: Comparator::property("name"),
            reverse: false,
        };
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            serde_json::json!({"by": "name", "reverse": false})
        );
    }
}
