use serde::{Deserialize, Serialize};

use crate::audio::AudioMetadata;

/// Language code requesting provider-side detection
pub const AUTO_LANGUAGE: &str = "auto";

/// Per-request transcription options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionOptions {
    /// `"auto"` or an ISO-639-1 / ISO-639-3 code
    pub language_code: String,
    /// Layout of the audio bytes
    pub metadata: AudioMetadata,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self::new(AudioMetadata::default())
    }
}

impl TranscriptionOptions {
    /// Options for audio in the given layout with language auto-detection
    pub fn new(metadata: AudioMetadata) -> Self {
        Self {
            language_code: AUTO_LANGUAGE.to_string(),
            metadata,
        }
    }

    /// Request a specific language
    #[must_use]
    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }

    /// Language to send upstream, `None` when the provider should detect it
    pub fn language_hint(&self) -> Option<&str> {
        let code = self.language_code.trim();
        (!code.is_empty() && !code.eq_ignore_ascii_case(AUTO_LANGUAGE)).then_some(code)
    }
}

/// Normalized transcription result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Transcribed text as returned by the provider
    pub text: String,
    /// Detected language, empty when the provider does not detect one
    pub language_code: String,
}
