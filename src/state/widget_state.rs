//! Reported state of a mounted element

use serde::{Deserialize, Serialize};

use crate::hooks::Phase;

/// Snapshot of one mounted element and its hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetStatus {
    pub id: String,
    pub hook: String,
    pub phase: Phase,
    /// Text the hook last rendered
    pub text: String,
    pub target: Option<String>,
}

impl WidgetStatus {
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}
