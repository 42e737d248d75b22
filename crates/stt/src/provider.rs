pub(crate) mod chutes;
pub(crate) mod elevenlabs;

use async_trait::async_trait;

use crate::{
    error::{Result, SttError},
    types::{TranscriptionOptions, TranscriptionResult},
};

/// Trait for STT provider implementations
///
/// A provider makes exactly one upstream call per invocation and never
/// retries; failover is the chain's job.
#[async_trait]
pub trait SttProvider: Send + Sync {
    /// Transcribe audio to text
    async fn transcribe(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<TranscriptionResult>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Reject payloads no provider can transcribe
pub(crate) fn ensure_audio(provider: &str, audio: &[u8]) -> Result<()> {
    if audio.is_empty() {
        return Err(SttError::RequestConstructionFailed(format!(
            "{provider}: audio payload is empty"
        )));
    }

    Ok(())
}
