//! Live Countdown - client glue for a server-driven live UI
//!
//! Wires a live socket client into a page, provides the `Countdown` hook that
//! renders time left until an element's target, and shows a progress bar
//! while live navigation is loading.

pub mod config;
pub mod dom;
pub mod error;
pub mod format;
pub mod hooks;
pub mod runtime;
pub mod socket;
pub mod state;
pub mod topbar;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ClientError, HookError};
pub use format::format_duration;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
