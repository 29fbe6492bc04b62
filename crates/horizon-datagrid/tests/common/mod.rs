//! Shared fixtures for the datagrid integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use horizon_datagrid::{Measurer, Renderer};
use parking_lot::Mutex;

pub type Element = &'static str;

/// A scripted rendering environment.
///
/// Measurements come from the configured maps. Class membership and inline
/// styles are kept per element, and the compute class count tells how many
/// measurement passes ran.
#[derive(Default)]
pub struct TestDom {
    user_widths: Mutex<HashMap<Element, f32>>,
    natural_widths: Mutex<HashMap<Element, f32>>,
    gutters: Mutex<HashMap<Element, f32>>,
    classes: Mutex<HashMap<Element, HashSet<String>>>,
    styles: Mutex<HashMap<(Element, String), String>>,
    passes: Mutex<usize>,
}

impl TestDom {
    pub fn new() -> Arc<Self> {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Arc::new(Self::default())
    }

    pub fn set_user_width(&self, element: Element, width: f32) {
        self.user_widths.lock().insert(element, width);
    }

    pub fn set_natural_width(&self, element: Element, width: f32) {
        self.natural_widths.lock().insert(element, width);
    }

    pub fn set_gutter(&self, element: Element, width: f32) {
        self.gutters.lock().insert(element, width);
    }

    pub fn width_of(&self, element: Element) -> Option<String> {
        self.styles
            .lock()
            .get(&(element, "width".to_string()))
            .cloned()
    }

    pub fn has_class(&self, element: Element, class: &str) -> bool {
        self.classes
            .lock()
            .get(element)
            .is_some_and(|classes| classes.contains(class))
    }

    pub fn passes(&self) -> usize {
        *self.passes.lock()
    }
}

impl Renderer<Element> for TestDom {
    fn set_class(&self, element: &Element, class: &str, present: bool) {
        if present && class == horizon_datagrid::config::COMPUTE_WIDTH_CLASS {
            *self.passes.lock() += 1;
        }
        let mut classes = self.classes.lock();
        let entry = classes.entry(*element).or_default();
        if present {
            entry.insert(class.to_string());
        } else {
            entry.remove(class);
        }
    }

    fn set_style(&self, element: &Element, property: &str, value: Option<&str>) {
        let key = (*element, property.to_string());
        let mut styles = self.styles.lock();
        match value {
            Some(value) => {
                styles.insert(key, value.to_string());
            }
            None => {
                styles.remove(&key);
            }
        }
    }
}

impl Measurer<Element> for TestDom {
    fn user_defined_width(&self, element: &Element) -> f32 {
        self.user_widths.lock().get(element).copied().unwrap_or(0.0)
    }

    fn scroll_width(&self, element: &Element) -> f32 {
        self.natural_widths.lock().get(element).copied().unwrap_or(0.0)
    }

    fn scrollbar_gutter_width(&self, element: &Element) -> f32 {
        self.gutters.lock().get(element).copied().unwrap_or(0.0)
    }
}
