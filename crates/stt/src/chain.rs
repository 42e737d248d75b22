//! Ordered provider fallback
//!
//! Providers are tried strictly in construction order; the first success
//! wins and later providers are not called

use std::{fmt, sync::Arc, time::Duration};

use tokio::time::Instant;

use crate::{
    error::{ProviderFailure, Result, SttError},
    provider::SttProvider,
    types::{TranscriptionOptions, TranscriptionResult},
};

/// Immutable, ordered list of providers with first-success semantics
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn SttProvider>>,
    deadline: Option<Duration>,
}

impl fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl ProviderChain {
    /// Chain over `providers`, tried in the given order
    pub fn new(providers: Vec<Arc<dyn SttProvider>>) -> Self {
        Self {
            providers,
            deadline: None,
        }
    }

    /// Bound the total time of one [`ProviderChain::transcribe`] call
    ///
    /// Each attempt gets whatever is left of the budget on top of its own
    /// per-request timeout. Providers not reached before the budget runs out
    /// are skipped.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in attempt order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    /// Transcribe with the first provider that succeeds
    ///
    /// # Errors
    ///
    /// [`SttError::NoProvidersConfigured`] for an empty chain, otherwise
    /// [`SttError::AllProvidersFailed`] with every attempt in order
    pub async fn transcribe(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<TranscriptionResult> {
        if self.providers.is_empty() {
            return Err(SttError::NoProvidersConfigured);
        }

        let started = Instant::now();
        let mut attempts = Vec::with_capacity(self.providers.len());

        for (index, provider) in self.providers.iter().enumerate() {
            let ordinal = index + 1;

            let outcome = match self.deadline {
                None => provider.transcribe(audio, options).await,
                Some(deadline) => {
                    let remaining = deadline.saturating_sub(started.elapsed());

                    if remaining.is_zero() {
                        tracing::warn!(
                            ordinal,
                            skipped = self.providers.len() - index,
                            "transcription deadline of {deadline:?} spent, skipping remaining providers"
                        );
                        break;
                    }

                    tokio::time::timeout(remaining, provider.transcribe(audio, options))
                        .await
                        .unwrap_or_else(|_| {
                            Err(SttError::NetworkFailure(format!(
                                "transcription deadline of {deadline:?} exceeded"
                            )))
                        })
                }
            };

            match outcome {
                Ok(result) => {
                    tracing::debug!(
                        ordinal,
                        provider = provider.name(),
                        chars = result.text.len(),
                        "transcription succeeded"
                    );
                    return Ok(result);
                }
                Err(error) => {
                    tracing::warn!(ordinal, provider = provider.name(), "transcription provider failed: {error}");

                    attempts.push(ProviderFailure {
                        ordinal,
                        provider: provider.name().to_string(),
                        error: Box::new(error),
                    });
                }
            }
        }

        let error = SttError::AllProvidersFailed { attempts };
        tracing::error!("{error}");

        Err(error)
    }
}
