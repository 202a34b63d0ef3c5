//! State management module
//!
//! Holds the application context that owns the socket, the hook registry,
//! the progress bar and every mounted element.

pub mod app_state;
pub mod widget_state;

// Re-export main types
pub use app_state::AppState;
pub use widget_state::WidgetStatus;
