//! Main application context

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::WidgetStatus;
use crate::{
    config::Config,
    dom::{Document, Element},
    error::{ClientError, HookError},
    hooks::{countdown::TARGET_ATTR, Hook, HookContext, HookRegistry, Phase},
    runtime::{Clock, Scheduler, Timings},
    socket::{LiveSocket, PushedEvent, SocketParams},
    topbar::{PageEvent, ProgressBar, TopbarConfig},
};

struct MountedHook {
    hook: Box<dyn Hook>,
    ctx: HookContext,
}

/// Application context passed to everything that needs the live client
///
/// Owns the socket, the hook registry, the progress bar and the hooks of
/// every mounted element.
pub struct AppState {
    socket: LiveSocket,
    registry: HookRegistry,
    progress_bar: ProgressBar,
    progress_delay: Duration,
    scheduler: Scheduler,
    clock: Arc<dyn Clock>,
    timings: Timings,
    widgets: Mutex<BTreeMap<String, MountedHook>>,
    /// Server metadata
    pub start_time: Instant,
    /// Last event that left the outbound queue
    last_event: Mutex<Option<PushedEvent>>,
}

impl AppState {
    /// Wire the live client for a page
    ///
    /// Returns the context and the receiving end of the socket's outbound queue.
    pub fn new(
        config: &Config,
        document: &Document,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<PushedEvent>), ClientError> {
        let params = SocketParams::from_document(document)?;
        let (socket, outbound_rx) = LiveSocket::new(config.socket_path.clone(), params);
        if let Some(latency) = config.latency() {
            socket.enable_latency_sim(latency);
        }

        let state = Self {
            socket,
            registry: HookRegistry::with_defaults(),
            progress_bar: ProgressBar::new(TopbarConfig::default()),
            progress_delay: config.progress_delay(),
            scheduler: Scheduler::new(),
            clock,
            timings: config.timings(),
            widgets: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
            last_event: Mutex::new(None),
        };

        Ok((state, outbound_rx))
    }

    fn widgets(&self) -> MutexGuard<'_, BTreeMap<String, MountedHook>> {
        self.widgets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Connect the live socket
    pub fn connect(&self) {
        self.socket.connect();
    }

    pub fn socket(&self) -> &LiveSocket {
        &self.socket
    }

    /// Socket accessor for interactive debugging, absent from release builds
    #[cfg(debug_assertions)]
    pub fn debug_socket(&self) -> &LiveSocket {
        &self.socket
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn progress_bar(&self) -> &ProgressBar {
        &self.progress_bar
    }

    /// Attach an element and run its hook's `mounted` callback
    ///
    /// An element whose hook rejects its data stays attached, so a later
    /// update can fix it.
    pub fn mount(&self, element: Element) -> Result<Phase, HookError> {
        let mut widgets = self.widgets();
        if widgets.contains_key(element.id()) {
            return Err(HookError::DuplicateElement(element.id().to_string()));
        }

        let mut hook = self.registry.create(element.hook())?;
        let ctx = HookContext {
            element: element.clone(),
            socket: self.socket.clone(),
            scheduler: self.scheduler,
            clock: Arc::clone(&self.clock),
            timings: self.timings,
        };

        info!("Mounting {} hook on element {}", element.hook(), element.id());
        let result = hook.mounted(&ctx);
        let phase = hook.phase();
        widgets.insert(element.id().to_string(), MountedHook { hook, ctx });

        if let Err(e) = &result {
            warn!("Hook rejected element {}: {}", element.id(), e);
        }
        result.map(|()| phase)
    }

    /// Replace an element's data and run its hook's `updated` callback
    pub fn update(&self, id: &str, data: HashMap<String, String>) -> Result<Phase, HookError> {
        let mut widgets = self.widgets();
        let mounted = widgets
            .get_mut(id)
            .ok_or_else(|| HookError::UnknownElement(id.to_string()))?;

        debug!("Updating element {}", id);
        mounted.ctx.element.replace_data(data);
        mounted.hook.updated(&mounted.ctx).map_err(|e| {
            warn!("Hook rejected update for {}: {}", id, e);
            e
        })?;
        Ok(mounted.hook.phase())
    }

    /// Detach an element and run its hook's `destroyed` callback
    pub fn remove(&self, id: &str) -> Result<(), HookError> {
        let mut mounted = self
            .widgets()
            .remove(id)
            .ok_or_else(|| HookError::UnknownElement(id.to_string()))?;

        mounted.hook.destroyed(&mounted.ctx);
        info!("Removed element {}", id);
        Ok(())
    }

    /// Route a window event by name; unknown names are ignored
    pub fn dispatch_page_event(&self, name: &str) -> Option<PageEvent> {
        let event = PageEvent::from_name(name)?;
        self.handle_page_event(event);
        Some(event)
    }

    pub fn handle_page_event(&self, event: PageEvent) {
        debug!("Page event {}", event.name());
        match event {
            PageEvent::LoadingStart => self.progress_bar.show(self.progress_delay),
            PageEvent::LoadingStop => self.progress_bar.hide(),
        }
    }

    /// Status of every mounted element, ordered by id
    pub fn widget_statuses(&self) -> Vec<WidgetStatus> {
        self.widgets()
            .iter()
            .map(|(id, mounted)| WidgetStatus {
                id: id.clone(),
                hook: mounted.ctx.element.hook().to_string(),
                phase: mounted.hook.phase(),
                text: mounted.ctx.element.text(),
                target: mounted.ctx.element.data(TARGET_ATTR),
            })
            .collect()
    }

    pub fn widget_status(&self, id: &str) -> Option<WidgetStatus> {
        self.widget_statuses().into_iter().find(|status| status.id == id)
    }

    /// Remember the most recent event handed to the transport
    pub fn record_event(&self, event: PushedEvent) {
        if let Ok(mut last) = self.last_event.lock() {
            *last = Some(event);
        }
    }

    pub fn last_event(&self) -> Option<PushedEvent> {
        self.last_event.lock().ok().and_then(|last| last.clone())
    }

    /// Seconds since the context was created
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Tear down every hook and disconnect, as when the page unloads
    pub fn shutdown(&self) {
        let mut widgets = std::mem::take(&mut *self.widgets());
        for (id, mounted) in widgets.iter_mut() {
            mounted.hook.destroyed(&mounted.ctx);
            debug!("Destroyed {} on shutdown", id);
        }
        self.progress_bar.hide();
        self.socket.disconnect();
        info!("Live client shut down ({} elements removed)", widgets.len());
    }
}
