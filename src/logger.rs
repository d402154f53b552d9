//! Logging setup for estimators embedding the estimable components
//!
//! The library itself only emits `tracing` events (`debug!` per injected correction,
//! `trace!` per coordinate conversion). Binaries and tests that want to see them call
//! one of the helpers below once at startup.

use tracing::Level;

/// Initialize the tracing subscriber with the default INFO level
///
/// The level can be overridden through the `RUST_LOG` environment variable:
/// ```bash
/// RUST_LOG=estimable=debug cargo test
/// ```
///
/// # Example
/// ```no_run
/// use estimable::init_logger;
///
/// init_logger();
/// tracing::info!("Estimator started");
/// ```
pub fn init_logger() {
    init_logger_with_level(Level::INFO)
}

/// Initialize the tracing subscriber with a custom default level
///
/// Calling this more than once is harmless: later calls leave the first subscriber in place.
///
/// # Arguments
/// * `default_level` - The default log level (overrideable via RUST_LOG)
pub fn init_logger_with_level(default_level: Level) {
    use tracing_subscriber::fmt::time::SystemTime;

    // Err only means a global subscriber is already set (another test, or the host binary).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_timer(SystemTime)
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}
