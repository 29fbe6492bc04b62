//! Property system for Horizon Datagrid.
//!
//! Properties are the data backbone of the datagrid providers: a provider
//! stores its state in [`Property`] values and emits its change signal only
//! when [`Property::set`] reports an actual change.
//!
//! # Example
//!
//! ```
//! use horizon_datagrid_core::{Property, Signal};
//!
//! struct PageSize {
//!     value: Property<usize>,
//!     changed: Signal<usize>,
//! }
//!
//! impl PageSize {
//!     fn set(&self, size: usize) {
//!         if self.value.set(size) {
//!             self.changed.emit(size);
//!         }
//!     }
//! }
//!
//! let page = PageSize { value: Property::new(0), changed: Signal::new() };
//! page.set(10);
//! assert_eq!(page.value.get(), 10);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed.
///
/// # Thread Safety
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// when `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_set_reports_change() {
        let prop = Property::new(42);
        assert_eq!(prop.get(), 42);

        assert!(!prop.set(42));
        assert!(prop.set(100));
        assert_eq!(prop.get(), 100);
    }

    #[test]
    fn test_property_replace() {
        let prop = Property::new(String::from("a"));
        assert_eq!(prop.replace("a".into()), None);
        assert_eq!(prop.replace("b".into()), Some("a".to_string()));
        assert_eq!(prop.with(|v| v.len()), 1);
    }

    #[test]
    fn test_property_set_silent() {
        let prop = Property::<Option<usize>>::default();
        prop.set_silent(Some(3));
        assert_eq!(prop.get(), Some(3));
    }
}
