use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, SttProviderType};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::from_toml(&raw)?;

        tracing::debug!(
            path = %path.display(),
            providers = config.stt.providers.len(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is configured or a provider entry is invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_has_providers()?;
        self.validate_stt_config()?;
        Ok(())
    }

    fn validate_has_providers(&self) -> anyhow::Result<()> {
        if self.stt.providers.is_empty() {
            anyhow::bail!("at least one STT provider must be configured under [stt.providers]");
        }

        Ok(())
    }

    fn validate_stt_config(&self) -> anyhow::Result<()> {
        if self.stt.deadline.is_some_and(|deadline| deadline.is_zero()) {
            anyhow::bail!("stt.deadline must be greater than 0");
        }

        for (name, provider) in &self.stt.providers {
            let has_key = provider
                .api_key
                .as_ref()
                .is_some_and(|key| !key.expose_secret().trim().is_empty());

            if !has_key {
                anyhow::bail!("STT provider '{name}' requires a non-empty api_key");
            }

            if provider.timeout.is_zero() {
                anyhow::bail!("STT provider '{name}' timeout must be greater than 0");
            }

            if provider.model_id.is_some() && provider.provider_type != SttProviderType::Elevenlabs {
                anyhow::bail!("STT provider '{name}': model_id is only supported for type \"elevenlabs\"");
            }
        }

        Ok(())
    }
}
