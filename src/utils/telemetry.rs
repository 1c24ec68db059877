//! Telemetry and structured logging setup.
//!
//! Provides consistent logging across all components with configurable
//! verbosity via RUST_LOG.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initializes the telemetry/logging system.
///
/// Uses the RUST_LOG environment variable for configuration.
/// Defaults to INFO globally and DEBUG for this crate if not set.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forecast_desk=debug"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_file(false)
            .with_line_number(false)
            .compact(),
    );

    subscriber.init();
}

/// Initializes telemetry with JSON output (for log aggregation).
pub fn init_telemetry_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forecast_desk=debug"));

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE));

    subscriber.init();
}
