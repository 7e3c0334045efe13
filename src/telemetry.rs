use crate::config::ObservabilityConfig;
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured logging.
///
/// Logs go to stderr so stdout carries only operator-facing output (and the
/// JSON outcome stream in `--json` mode). `RUST_LOG` overrides the configured
/// level.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let json_layer = config.json_logs.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.json_logs).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::debug!("Telemetry initialized");
    Ok(())
}

/// Generate an id that ties together the log lines of one scanning session
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span carrying the session id and the capture mechanism feeding it
pub fn create_session_span(session_id: &str, input: &str) -> tracing::Span {
    tracing::info_span!(
        "scan_session",
        session.id = session_id,
        input = input
    )
}

pub fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown complete");
}
