//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::runtime::{Timings, NOTIFY_DELAY_MS, PROGRESS_SHOW_DELAY_MS, TICK_INTERVAL_MS};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "live-countdown")]
#[command(about = "Live socket client with a countdown hook and navigation progress bar")]
#[command(version)]
pub struct Config {
    /// Port for the host control surface
    #[arg(short, long, default_value = "4100")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Live socket endpoint path
    #[arg(long, default_value = "/live")]
    pub socket_path: String,

    /// CSRF token placed in the page's csrf-token meta tag
    #[arg(long, env = "LIVE_CSRF_TOKEN", default_value = "dev-csrf-token")]
    pub csrf_token: String,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value_t = TICK_INTERVAL_MS)]
    pub tick_ms: u64,

    /// Delay between a countdown finishing and notifying the server, in milliseconds
    #[arg(long, default_value_t = NOTIFY_DELAY_MS)]
    pub notify_delay_ms: u64,

    /// Delay before the progress bar appears during navigation, in milliseconds
    #[arg(long, default_value_t = PROGRESS_SHOW_DELAY_MS)]
    pub progress_delay_ms: u64,

    /// Mount a countdown to this RFC 3339 timestamp at startup
    #[arg(short, long)]
    pub target: Option<String>,

    /// Simulate this much outbound latency, in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            tick: Duration::from_millis(self.tick_ms),
            notify_delay: Duration::from_millis(self.notify_delay_ms),
        }
    }

    pub fn progress_delay(&self) -> Duration {
        Duration::from_millis(self.progress_delay_ms)
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency_ms.map(Duration::from_millis)
    }
}
