//! Minimal page model: bound elements and document meta tags

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Debug, Default)]
struct ElementInner {
    dataset: HashMap<String, String>,
    text: String,
    renders: u64,
}

/// An element bound to a hook
///
/// Clones share the same underlying node, so a hook and the host page see
/// the same data attributes and rendered text.
#[derive(Debug, Clone)]
pub struct Element {
    id: String,
    hook: String,
    inner: Arc<Mutex<ElementInner>>,
}

impl Element {
    /// Create an element with the given id and hook name
    pub fn new(id: impl Into<String>, hook: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hook: hook.into(),
            inner: Arc::new(Mutex::new(ElementInner::default())),
        }
    }

    /// Builder-style data attribute setter
    pub fn with_data(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_data(key, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the hook this element is bound to
    pub fn hook(&self) -> &str {
        &self.hook
    }

    // A poisoned lock only means a hook panicked mid-render; the data is still usable.
    fn lock(&self) -> MutexGuard<'_, ElementInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read a data attribute
    pub fn data(&self, key: &str) -> Option<String> {
        self.lock().dataset.get(key).cloned()
    }

    /// Set a single data attribute
    pub fn set_data(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().dataset.insert(key.into(), value.into());
    }

    /// Replace all data attributes, as the host does when it patches the element
    pub fn replace_data(&self, dataset: HashMap<String, String>) {
        self.lock().dataset = dataset;
    }

    /// Snapshot of all data attributes
    pub fn dataset(&self) -> HashMap<String, String> {
        self.lock().dataset.clone()
    }

    /// Write the element's rendered text
    pub fn render(&self, text: impl Into<String>) {
        let mut inner = self.lock();
        inner.text = text.into();
        inner.renders += 1;
    }

    /// Currently rendered text
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Number of renders since the element was created
    pub fn render_count(&self) -> u64 {
        self.lock().renders
    }
}

/// The host page's document-level data
#[derive(Debug, Clone, Default)]
pub struct Document {
    meta: HashMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `<meta name=... content=...>` entry
    pub fn with_meta(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.meta.insert(name.into(), content.into());
        self
    }

    /// Content of the meta tag with the given name
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }
}
