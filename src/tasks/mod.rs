//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod outbound;

// Re-export main functions
pub use outbound::outbound_task;
