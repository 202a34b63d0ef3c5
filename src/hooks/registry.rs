//! Hook registry keyed by hook name

use std::collections::BTreeMap;

use super::{Countdown, Hook};
use crate::error::HookError;

/// Produces a fresh hook instance for each mounted element
pub type HookFactory = fn() -> Box<dyn Hook>;

/// Name under which the countdown hook is registered
pub const COUNTDOWN_HOOK: &str = "Countdown";

/// Mapping from hook name to factory, filled once at startup
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    factories: BTreeMap<String, HookFactory>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every hook this crate ships
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(COUNTDOWN_HOOK, new_countdown);
        registry
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, factory: HookFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Instantiate the hook registered under `name`
    pub fn create(&self, name: &str) -> Result<Box<dyn Hook>, HookError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| HookError::UnknownHook(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered hook names, sorted
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

fn new_countdown() -> Box<dyn Hook> {
    Box::new(Countdown::new())
}
