#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod stt;
pub mod telemetry;

use serde::Deserialize;

pub use stt::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level Silence configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Speech-to-text provider configuration
    #[serde(default)]
    pub stt: SttConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
