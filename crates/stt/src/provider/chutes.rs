use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use silence_config::DEFAULT_PROVIDER_TIMEOUT;

use crate::{
    audio::prepare_wav,
    error::Result,
    http_client::{decode, http_client, send},
    types::{TranscriptionOptions, TranscriptionResult},
};

use super::{SttProvider, ensure_audio};

pub const DEFAULT_CHUTES_API_URL: &str = "https://chutes-whisper-large-v3.chutes.ai/transcribe";

/// Chutes hosted Whisper provider
///
/// Always uploads a base64 WAV container and never reports a language.
pub struct ChutesProvider {
    client: Client,
    url: String,
    api_key: SecretString,
    timeout: Duration,
    name: String,
}

impl ChutesProvider {
    pub fn new(name: String, api_key: SecretString, base_url: Option<String>) -> Self {
        Self {
            client: http_client(),
            url: base_url.unwrap_or_else(|| DEFAULT_CHUTES_API_URL.to_string()),
            api_key,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            name,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(serde::Serialize)]
struct ChutesRequest<'a> {
    audio_b64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(serde::Deserialize)]
struct ChutesSegment {
    text: String,
    #[serde(default)]
    end: f64,
}

/// Join segment texts in order and trim the outer whitespace
fn join_segments(segments: &[ChutesSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}

#[async_trait]
impl SttProvider for ChutesProvider {
    async fn transcribe(&self, audio: &[u8], options: &TranscriptionOptions) -> Result<TranscriptionResult> {
        ensure_audio(&self.name, audio)?;

        let wav = prepare_wav(audio, &options.metadata)?;

        let body = ChutesRequest {
            audio_b64: base64::engine::general_purpose::STANDARD.encode(&wav),
            language: options.language_hint(),
        };

        tracing::debug!(
            provider = %self.name,
            bytes = wav.len(),
            language = body.language.unwrap_or("auto"),
            "Chutes transcription request"
        );

        let request = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body);

        let response = send("Chutes", request).await?;
        let segments: Vec<ChutesSegment> = decode("Chutes", &response)?;

        tracing::debug!(
            provider = %self.name,
            segments = segments.len(),
            audio_secs = segments.last().map_or(0.0, |segment| segment.end),
            "Chutes transcription complete"
        );

        Ok(TranscriptionResult {
            text: join_segments(&segments),
            language_code: String::new(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
