//! Logging for Silence
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer in text or JSON form

use silence_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging from configuration
///
/// `RUST_LOG` takes precedence over the configured `log_filter`, which in
/// turn takes precedence over `default_filter`.
///
/// # Errors
///
/// Returns an error if the filter directives are invalid or a global
/// subscriber has already been installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let directives = filter_directives(config, default_filter);
    let filter =
        EnvFilter::try_new(&directives).map_err(|e| anyhow::anyhow!("invalid log filter '{directives}': {e}"))?;
    let format = config.map(|c| c.format).unwrap_or_default();

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!(filter = %directives, ?format, "logging initialized");

    Ok(())
}

/// Pick the filter directives to use
fn filter_directives(config: Option<&TelemetryConfig>, default_filter: &str) -> String {
    if let Ok(from_env) = std::env::var(EnvFilter::DEFAULT_ENV)
        && !from_env.trim().is_empty()
    {
        return from_env;
    }

    config
        .map(|c| c.log_filter.trim())
        .filter(|filter| !filter.is_empty())
        .unwrap_or(default_filter)
        .to_string()
}
