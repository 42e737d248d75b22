#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

pub mod audio;
mod builder;
mod chain;
mod error;
mod http_client;
mod provider;
mod types;

use builder::ChainBuilder;

pub use audio::{AudioFormat, AudioMetadata, pcm_to_wav};
pub use chain::ProviderChain;
pub use error::{ProviderFailure, Result, SttError};
pub use provider::{
    SttProvider,
    chutes::{ChutesProvider, DEFAULT_CHUTES_API_URL},
    elevenlabs::{DEFAULT_ELEVENLABS_API_URL, DEFAULT_ELEVENLABS_MODEL, ElevenLabsProvider},
};
pub use types::{AUTO_LANGUAGE, TranscriptionOptions, TranscriptionResult};

/// Build the transcription provider chain from configuration
///
/// # Errors
///
/// Returns an error if a configured provider cannot be initialized
pub fn build_chain(config: &silence_config::Config) -> anyhow::Result<ProviderChain> {
    let chain = ChainBuilder::new(&config.stt)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize STT chain: {e}"))?;

    tracing::info!(
        providers = ?chain.provider_names(),
        deadline = ?chain.deadline(),
        "transcription chain ready"
    );

    Ok(chain)
}
