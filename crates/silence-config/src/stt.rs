use std::time::Duration;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Per-request timeout applied when a provider does not set one
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Top-level STT configuration
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttConfig {
    /// Provider configurations keyed by name, tried in file order
    #[serde(default)]
    pub providers: IndexMap<String, SttProviderConfig>,
    /// Total time budget for one pass over the provider chain
    #[serde(default, deserialize_with = "duration_str::deserialize_option_duration")]
    pub deadline: Option<Duration>,
}

/// Configuration for a single STT provider
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SttProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: SttProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Endpoint override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier sent upstream (`ElevenLabs` only)
    #[serde(default)]
    pub model_id: Option<String>,
    /// Per-request timeout
    #[serde(
        default = "default_provider_timeout",
        deserialize_with = "duration_str::deserialize_duration"
    )]
    pub timeout: Duration,
}

impl SttProviderConfig {
    /// Provider config with an API key and every other field at its default
    pub fn new(provider_type: SttProviderType, api_key: impl Into<String>) -> Self {
        Self {
            provider_type,
            api_key: Some(SecretString::from(api_key.into())),
            base_url: None,
            model_id: None,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Point the provider at a different endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Override the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Supported STT providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SttProviderType {
    /// `ElevenLabs` speech-to-text (multipart upload)
    Elevenlabs,
    /// Chutes hosted Whisper (base64 JSON upload)
    Chutes,
}

fn default_provider_timeout() -> Duration {
    DEFAULT_PROVIDER_TIMEOUT
}
