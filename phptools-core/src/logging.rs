//! Structured logging using **tracing**.
//!
//! The JSON subscriber writes to stderr so stdout stays clean for reports and
//! generated code.

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at program start. Filtering follows `RUST_LOG`
/// (e.g. `RUST_LOG=phptools_core=debug`).
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs an error event.
pub fn log_error(message: &str) {
    error!(detail = %message);
}
