//! Live Countdown - client glue for a server-driven live UI
//!
//! This is the main entry point: it builds the page context, connects the
//! live socket and serves the host control surface.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use live_countdown::{
    api::create_router,
    config::Config,
    dom::{Document, Element},
    hooks::{countdown::TARGET_ATTR, registry::COUNTDOWN_HOOK},
    runtime::SystemClock,
    socket::CSRF_META,
    state::AppState,
    tasks::outbound_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("live_countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting live-countdown v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, socket={}, tick={}ms, notify_delay={}ms",
        config.host, config.port, config.socket_path, config.tick_ms, config.notify_delay_ms
    );

    let document = Document::new().with_meta(CSRF_META, config.csrf_token.clone());
    let (state, outbound_rx) = AppState::new(&config, &document, Arc::new(SystemClock))?;
    let state = Arc::new(state);

    tokio::spawn(outbound_task(Arc::clone(&state), outbound_rx));

    // Connect if there are any live elements on the page
    state.connect();

    #[cfg(debug_assertions)]
    {
        state.debug_socket().enable_debug();
        info!("Debug build: socket push logging enabled");
    }

    if let Some(target) = &config.target {
        let element = Element::new("countdown", COUNTDOWN_HOOK).with_data(TARGET_ATTR, target.clone());
        state.mount(element)?;
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Host surface running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /elements          - Mount an element {{id, hook, data}}");
    info!("  PUT    /elements/:id      - Replace an element's data");
    info!("  DELETE /elements/:id      - Remove an element");
    info!("  POST   /navigation/start  - Page loading started");
    info!("  POST   /navigation/stop   - Page loading stopped");
    info!("  GET    /status            - Socket, progress bar and element status");
    info!("  GET    /health            - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            if let Err(e) = signal {
                tracing::error!("Signal handling failed: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Shutdown complete");
    Ok(())
}
