//! Element-bound client hooks
//!
//! A hook receives the host's lifecycle notifications for one element:
//! `mounted` when the element is attached, `updated` when the host patches
//! its data, `destroyed` when it is removed.

pub mod countdown;
pub mod registry;

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::{
    dom::Element,
    error::HookError,
    runtime::{Clock, Scheduler, Timings},
    socket::LiveSocket,
};

pub use countdown::Countdown;
pub use registry::{HookFactory, HookRegistry};

/// Lifecycle phase reported by a hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Counting,
    Finished,
}

/// Everything a hook may touch while bound to an element
#[derive(Clone)]
pub struct HookContext {
    pub element: Element,
    pub socket: LiveSocket,
    pub scheduler: Scheduler,
    pub clock: Arc<dyn Clock>,
    pub timings: Timings,
}

impl HookContext {
    /// Push an event to the server on behalf of this element
    pub fn push_event(&self, event: &str, payload: serde_json::Value) -> bool {
        self.socket.push_event(self.element.id(), event, payload)
    }
}

/// Lifecycle callbacks for one bound element
pub trait Hook: Send {
    /// The element was attached to the page
    fn mounted(&mut self, ctx: &HookContext) -> Result<(), HookError>;

    /// The host supplied new data for the element
    fn updated(&mut self, ctx: &HookContext) -> Result<(), HookError>;

    /// The element was removed. Must be safe to call more than once.
    fn destroyed(&mut self, ctx: &HookContext);

    fn phase(&self) -> Phase;
}
