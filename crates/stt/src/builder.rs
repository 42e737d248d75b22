use std::sync::Arc;

use secrecy::SecretString;
use silence_config::{SttConfig, SttProviderConfig, SttProviderType};

use crate::{
    chain::ProviderChain,
    error::SttError,
    provider::{SttProvider, chutes::ChutesProvider, elevenlabs::ElevenLabsProvider},
};

/// Builder for constructing the provider chain from configuration
pub(crate) struct ChainBuilder<'a> {
    config: &'a SttConfig,
}

impl<'a> ChainBuilder<'a> {
    pub fn new(config: &'a SttConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::error::Result<ProviderChain> {
        let mut providers: Vec<Arc<dyn SttProvider>> = Vec::with_capacity(self.config.providers.len());

        for (name, provider_config) in &self.config.providers {
            tracing::debug!("Initializing STT provider: {name}");

            let api_key = resolve_api_key(name, provider_config)?;
            let base_url = provider_config.base_url.as_ref().map(ToString::to_string);

            let provider: Arc<dyn SttProvider> = match provider_config.provider_type {
                SttProviderType::Elevenlabs => {
                    let mut provider = ElevenLabsProvider::new(name.clone(), api_key, base_url)
                        .with_timeout(provider_config.timeout);

                    if let Some(model_id) = &provider_config.model_id {
                        provider = provider.with_model_id(model_id.clone());
                    }

                    Arc::new(provider)
                }
                SttProviderType::Chutes => {
                    Arc::new(ChutesProvider::new(name.clone(), api_key, base_url).with_timeout(provider_config.timeout))
                }
            };

            providers.push(provider);
        }

        if providers.is_empty() {
            tracing::debug!("No STT providers configured");
        } else {
            tracing::debug!("STT chain initialized with {} provider(s)", providers.len());
        }

        let chain = ProviderChain::new(providers);

        Ok(match self.config.deadline {
            Some(deadline) => chain.with_deadline(deadline),
            None => chain,
        })
    }
}

fn resolve_api_key(name: &str, config: &SttProviderConfig) -> crate::error::Result<SecretString> {
    config
        .api_key
        .clone()
        .ok_or_else(|| SttError::ConfigError(format!("API key required for STT provider '{name}'")))
}
