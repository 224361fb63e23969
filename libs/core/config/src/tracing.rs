use crate::Environment;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the color-eyre panic and error hooks.
///
/// Call this at the top of main(), before anything fallible runs. A
/// second call is a no-op, so tests can call it freely.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global tracing subscriber.
///
/// Production emits flattened JSON for log aggregation; development gets
/// pretty human-readable output. Both modes carry
/// `tracing_error::ErrorLayer` so span traces attach to error reports.
/// `RUST_LOG` overrides the default filter (`info` in production,
/// `debug` in development).
///
/// Idempotent: if a subscriber is already installed (common in tests)
/// the call does nothing.
pub fn init_tracing(environment: &Environment) {
    let default_filter = if environment.is_production() {
        "info"
    } else {
        "debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = if environment.is_production() {
        let fmt = tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true);
        tracing_subscriber::registry()
            .with(fmt)
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
            .is_ok()
    } else {
        let fmt = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .pretty();
        tracing_subscriber::registry()
            .with(fmt)
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(environment = ?environment, "Tracing initialized");
    } else {
        tracing::debug!("Tracing already initialized, keeping existing subscriber");
    }
}
