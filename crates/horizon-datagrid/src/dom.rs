//! Rendering environment capabilities.
//!
//! The datagrid never touches a concrete rendering tree. Everything it needs
//! from the environment goes through two injected capabilities:
//!
//! - [`Renderer`]: writes class membership and inline style properties
//! - [`Measurer`]: reads user-defined widths, natural widths and scrollbar gutters
//!
//! Elements are opaque [`ElementHandle`]s chosen by the embedder: a node id,
//! an index into an arena, or a reference-counted pointer wrapper.

use std::fmt::Debug;
use std::hash::Hash;

/// An opaque handle to an element of the rendering environment.
///
/// Two handles compare equal iff they refer to the same element.
pub trait ElementHandle: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> ElementHandle for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Writes visual state back to the environment.
///
/// Implementations must not call back into the datagrid.
pub trait Renderer<E: ElementHandle>: Send + Sync {
    /// Add (`present = true`) or remove a class on an element.
    fn set_class(&self, element: &E, class: &str, present: bool);

    /// Set an inline style property, or remove it with `None`.
    fn set_style(&self, element: &E, property: &str, value: Option<&str>);
}

/// Reads layout information from the environment.
pub trait Measurer<E: ElementHandle>: Send + Sync {
    /// Width explicitly authored for the element outside the datagrid
    /// (stylesheets, inline styles). `0.0` means none.
    fn user_defined_width(&self, element: &E) -> f32;

    /// Natural content width of the element. `0.0` if unavailable.
    fn scroll_width(&self, element: &E) -> f32;

    /// Width taken by the element's vertical scrollbar.
    fn scrollbar_gutter_width(&self, element: &E) -> f32;
}

/// Formats a pixel width as a style value, e.g. `120px`.
pub fn px(pixels: f32) -> String {
    format!("{pixels}px")
}

#[cfg(test)]
pub(crate) mod fake {
    //! Recording renderer and scripted measurer for unit tests.

    use std::collections::HashMap;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{Measurer, Renderer};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Class(u32, String, bool),
        Style(u32, String, Option<String>),
    }

    #[derive(Default)]
    pub struct FakeDom {
        pub calls: Mutex<Vec<Call>>,
        pub user_widths: Mutex<HashMap<u32, f32>>,
        pub scroll_widths: Mutex<HashMap<u32, f32>>,
        pub gutters: Mutex<HashMap<u32, f32>>,
        /// Classes currently present, to observe the measurement window.
        pub classes: Mutex<HashMap<u32, Vec<String>>>,
        /// `(element, classes present at read time)` for every scroll width read.
        pub scroll_reads: Mutex<Vec<(u32, Vec<String>)>>,
    }

    impl FakeDom {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn user_width(&self, element: u32, width: f32) {
            self.user_widths.lock().insert(element, width);
        }

        pub fn natural_width(&self, element: u32, width: f32) {
            self.scroll_widths.lock().insert(element, width);
        }

        pub fn take_calls(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock())
        }

        pub fn style_of(&self, element: u32) -> Option<String> {
            self.calls.lock().iter().rev().find_map(|call| match call {
                Call::Style(e, _, value) if *e == element => Some(value.clone()),
                _ => None,
            })?
        }
    }

    impl Renderer<u32> for FakeDom {
        fn set_class(&self, element: &u32, class: &str, present: bool) {
            let mut classes = self.classes.lock();
            let entry = classes.entry(*element).or_default();
            entry.retain(|c| c != class);
            if present {
                entry.push(class.to_string());
            }
            self.calls
                .lock()
                .push(Call::Class(*element, class.to_string(), present));
        }

        fn set_style(&self, element: &u32, property: &str, value: Option<&str>) {
            self.calls.lock().push(Call::Style(
                *element,
                property.to_string(),
                value.map(str::to_string),
            ));
        }
    }

    impl Measurer<u32> for FakeDom {
        fn user_defined_width(&self, element: &u32) -> f32 {
            self.user_widths.lock().get(element).copied().unwrap_or(0.0)
        }

        fn scroll_width(&self, element: &u32) -> f32 {
            let present: Vec<String> = self.classes.lock().values().flatten().cloned().collect();
            self.scroll_reads.lock().push((*element, present));
            self.scroll_widths.lock().get(element).copied().unwrap_or(0.0)
        }

        fn scrollbar_gutter_width(&self, element: &u32) -> f32 {
            self.gutters.lock().get(element).copied().unwrap_or(0.0)
        }
    }
}
