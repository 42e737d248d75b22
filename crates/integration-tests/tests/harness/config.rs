//! Programmatic configuration builder for integration tests

use std::time::Duration;

use silence_config::{Config, SttProviderConfig, SttProviderType};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Add an `ElevenLabs` provider pointed at a mock backend
    pub fn with_elevenlabs(self, name: &str, base_url: &str) -> Self {
        self.with_provider(name, SttProviderType::Elevenlabs, base_url)
    }

    /// Add a Chutes provider pointed at a mock backend
    pub fn with_chutes(self, name: &str, url: &str) -> Self {
        self.with_provider(name, SttProviderType::Chutes, url)
    }

    /// Bound the whole chain run
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.config.stt.deadline = Some(deadline);
        self
    }

    fn with_provider(mut self, name: &str, provider_type: SttProviderType, url: &str) -> Self {
        let provider = SttProviderConfig::new(provider_type, "test-key")
            .with_base_url(url.parse().expect("valid URL"))
            .with_timeout(Duration::from_secs(5));

        self.config.stt.providers.insert(name.to_owned(), provider);
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
