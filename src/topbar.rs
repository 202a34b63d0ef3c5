//! Navigation progress bar
//!
//! Shown while a live navigation or form submit is in flight. The bar only
//! appears if loading lasts longer than the show delay, so fast navigations
//! never flash it.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::runtime::{Scheduler, TimerHandle};

/// Window event fired when a live navigation starts loading
pub const PAGE_LOADING_START: &str = "phx:page-loading-start";
/// Window event fired when a live navigation finished loading
pub const PAGE_LOADING_STOP: &str = "phx:page-loading-stop";

/// Page-level events the progress bar reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    LoadingStart,
    LoadingStop,
}

impl PageEvent {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            PAGE_LOADING_START => Some(Self::LoadingStart),
            PAGE_LOADING_STOP => Some(Self::LoadingStop),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadingStart => PAGE_LOADING_START,
            Self::LoadingStop => PAGE_LOADING_STOP,
        }
    }
}

/// Bar appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopbarConfig {
    /// Gradient stops as (position, color)
    pub bar_colors: Vec<(f32, String)>,
    pub shadow_color: String,
}

impl Default for TopbarConfig {
    fn default() -> Self {
        Self {
            bar_colors: vec![(0.0, "#29d".to_string())],
            shadow_color: "rgba(0, 0, 0, .3)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarState {
    Hidden,
    /// Show requested, waiting out the delay
    Pending,
    Visible,
}

#[derive(Debug)]
struct BarInner {
    state: BarState,
    pending: Option<TimerHandle>,
    generation: u64,
}

/// Delayed-show progress bar
#[derive(Debug, Clone)]
pub struct ProgressBar {
    config: TopbarConfig,
    inner: Arc<Mutex<BarInner>>,
    scheduler: Scheduler,
}

impl ProgressBar {
    pub fn new(config: TopbarConfig) -> Self {
        Self {
            config,
            inner: Arc::new(Mutex::new(BarInner {
                state: BarState::Hidden,
                pending: None,
                generation: 0,
            })),
            scheduler: Scheduler::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BarInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn config(&self) -> &TopbarConfig {
        &self.config
    }

    pub fn state(&self) -> BarState {
        self.lock().state
    }

    /// Show the bar after `delay` unless hidden first
    pub fn show(&self, delay: Duration) {
        let mut inner = self.lock();
        if inner.state != BarState::Hidden {
            return;
        }
        if delay.is_zero() {
            inner.state = BarState::Visible;
            debug!("Progress bar shown");
            return;
        }

        inner.state = BarState::Pending;
        let generation = inner.generation;
        let shared = Arc::clone(&self.inner);
        inner.pending = Some(self.scheduler.schedule(delay, move || {
            let mut inner = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if inner.generation == generation && inner.state == BarState::Pending {
                inner.state = BarState::Visible;
                inner.pending = None;
                debug!("Progress bar shown");
            }
        }));
    }

    /// Hide the bar and drop any pending show
    pub fn hide(&self) {
        let mut inner = self.lock();
        if let Some(pending) = inner.pending.take() {
            pending.cancel();
        }
        inner.generation += 1;
        if inner.state == BarState::Visible {
            debug!("Progress bar hidden");
        }
        inner.state = BarState::Hidden;
    }
}
