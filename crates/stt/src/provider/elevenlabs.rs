use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use silence_config::DEFAULT_PROVIDER_TIMEOUT;

use crate::{
    audio::{AudioFormat, prepare_wav},
    error::{Result, SttError},
    http_client::{decode, http_client, send},
    types::{TranscriptionOptions, TranscriptionResult},
};

use super::{SttProvider, ensure_audio};

pub const DEFAULT_ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";

pub const DEFAULT_ELEVENLABS_MODEL: &str = "scribe_v1";

/// `ElevenLabs` speech-to-text provider
///
/// Canonical PCM is uploaded raw with `file_format=pcm_s16le_16`; anything
/// else goes up as a WAV container with `file_format=other`.
pub struct ElevenLabsProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model_id: String,
    timeout: Duration,
    name: String,
}

impl ElevenLabsProvider {
    pub fn new(name: String, api_key: SecretString, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_ELEVENLABS_API_URL.to_string());

        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model_id: DEFAULT_ELEVENLABS_MODEL.to_string(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            name,
        }
    }

    #[must_use]
    pub fn with_model_id(mut self, model_id: String) -> Self {
        self.model_id = model_id;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the multipart upload for one request
    fn form(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<Form> {
        let (payload, file_format, filename, mime) = if options.metadata.is_canonical_pcm() {
            let file_format = AudioFormat::PcmS16le16.to_string();
            (audio.to_vec(), file_format, "audio.pcm", "application/octet-stream")
        } else {
            let wav = prepare_wav(audio, &options.metadata)?.into_owned();
            (wav, "other".to_string(), "audio.wav", "audio/wav")
        };

        let file = Part::bytes(payload)
            .file_name(filename)
            .mime_str(mime)
            .map_err(|e| SttError::RequestConstructionFailed(format!("Invalid content type: {e}")))?;

        let mut form = Form::new()
            .text("model_id", self.model_id.clone())
            .text("file_format", file_format)
            .part("file", file);

        if let Some(language) = options.language_hint() {
            form = form.text("language_code", language.to_string());
        }

        Ok(form)
    }
}

#[derive(serde::Deserialize)]
struct ElevenLabsResponse {
    text: String,
    language_code: String,
    #[serde(default)]
    language_probability: Option<f64>,
    #[serde(default)]
    words: Vec<IgnoredAny>,
}

#[async_trait]
impl SttProvider for ElevenLabsProvider {
    async fn transcribe(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<TranscriptionResult> {
        ensure_audio(&self.name, audio)?;

        let url = format!("{}/speech-to-text", self.base_url);
        let form = self.form(audio, options)?;

        tracing::debug!(
            provider = %self.name,
            bytes = audio.len(),
            format = %options.metadata.format,
            language = options.language_hint().unwrap_or("auto"),
            "ElevenLabs transcription request"
        );

        let request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("xi-api-key", self.api_key.expose_secret())
            .multipart(form);

        let body = send("ElevenLabs", request).await?;
        let result: ElevenLabsResponse = decode("ElevenLabs", &body)?;

        tracing::debug!(
            provider = %self.name,
            language = %result.language_code,
            probability = result.language_probability,
            words = result.words.len(),
            "ElevenLabs transcription complete"
        );

        Ok(TranscriptionResult {
            text: result.text,
            language_code: result.language_code,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
