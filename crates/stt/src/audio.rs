//! Audio format metadata and WAV containerization

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{Result, SttError};

/// Size of the canonical RIFF/WAVE header written by [`pcm_to_wav`]
pub const WAV_HEADER_LEN: usize = 44;

/// Sample rate of canonical PCM uploads
pub const CANONICAL_SAMPLE_RATE: u32 = 16_000;

/// Encoding of an uploaded audio buffer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum AudioFormat {
    /// Raw signed 16-bit little-endian samples, no header
    #[default]
    #[strum(serialize = "pcm_s16le_16")]
    #[serde(rename = "pcm_s16le_16")]
    PcmS16le16,
    /// RIFF/WAVE container
    #[strum(serialize = "wav")]
    #[serde(rename = "wav")]
    Wav,
}

/// Format description for one request's audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioMetadata {
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for AudioMetadata {
    fn default() -> Self {
        Self::pcm_s16le_16()
    }
}

impl AudioMetadata {
    /// 16 kHz mono 16-bit layout tagged with the given format
    pub const fn new(format: AudioFormat) -> Self {
        Self {
            format,
            sample_rate: CANONICAL_SAMPLE_RATE,
            channels: 1,
            bits_per_sample: 16,
        }
    }

    /// Raw 16 kHz mono signed 16-bit PCM
    pub const fn pcm_s16le_16() -> Self {
        Self::new(AudioFormat::PcmS16le16)
    }

    /// WAV container holding 16 kHz mono 16-bit samples
    pub const fn wav() -> Self {
        Self::new(AudioFormat::Wav)
    }

    /// Raw PCM at 16 kHz, mono, 16-bit
    pub const fn is_canonical_pcm(&self) -> bool {
        matches!(self.format, AudioFormat::PcmS16le16)
            && self.sample_rate == CANONICAL_SAMPLE_RATE
            && self.channels == 1
            && self.bits_per_sample == 16
    }

    /// Bytes per frame (one sample for every channel)
    pub fn block_align(&self) -> u32 {
        u32::from(self.channels) * (u32::from(self.bits_per_sample) / 8)
    }

    /// Bytes of audio per second of playback
    pub fn bytes_per_second(&self) -> u64 {
        u64::from(self.sample_rate) * u64::from(self.block_align())
    }

    /// Playback length of `len` bytes of raw samples in whole seconds, rounded up
    ///
    /// Returns 0 when the layout describes zero-sized frames or a zero sample rate.
    pub fn duration_secs(&self, len: usize) -> u64 {
        let block_align = u64::from(self.block_align());
        if block_align == 0 || self.sample_rate == 0 {
            return 0;
        }

        let frames = len as u64 / block_align;
        frames.div_ceil(u64::from(self.sample_rate))
    }
}

/// Wrap raw PCM samples in a minimal 44-byte RIFF/WAVE header
///
/// The header describes uncompressed PCM (format code 1) using the sample
/// rate, channel count and bit depth from `metadata`; all fields are
/// little-endian.
///
/// # Errors
///
/// Returns [`SttError::RequestConstructionFailed`] if the layout has a zero
/// field or the payload is too large for a RIFF size field
pub fn pcm_to_wav(pcm: &[u8], metadata: &AudioMetadata) -> Result<Vec<u8>> {
    if metadata.sample_rate == 0 || metadata.channels == 0 || metadata.bits_per_sample == 0 {
        return Err(SttError::RequestConstructionFailed(format!(
            "invalid PCM layout: {} Hz, {} channel(s), {} bits",
            metadata.sample_rate, metadata.channels, metadata.bits_per_sample
        )));
    }

    let (riff_size, data_size) = riff_sizes(pcm.len())?;

    let block_align = u16::try_from(metadata.block_align()).map_err(|_| {
        SttError::RequestConstructionFailed(format!(
            "block align overflows: {} channel(s) x {} bits",
            metadata.channels, metadata.bits_per_sample
        ))
    })?;
    let byte_rate = u32::try_from(metadata.bytes_per_second())
        .map_err(|_| SttError::RequestConstructionFailed("byte rate overflows a WAV header".to_string()))?;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&metadata.channels.to_le_bytes());
    wav.extend_from_slice(&metadata.sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&metadata.bits_per_sample.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);

    Ok(wav)
}

/// RIFF chunk size and data chunk size for a payload of `len` bytes
fn riff_sizes(len: usize) -> Result<(u32, u32)> {
    let too_large = || SttError::RequestConstructionFailed(format!("PCM payload of {len} bytes is too large"));

    let data_size = u32::try_from(len).map_err(|_| too_large())?;
    let riff_size = data_size.checked_add(36).ok_or_else(too_large)?;

    Ok((riff_size, data_size))
}

/// Audio as a WAV container: borrowed when already WAV, containerized when PCM
///
/// # Errors
///
/// Returns an error if PCM containerization fails
pub fn prepare_wav<'a>(audio: &'a [u8], metadata: &AudioMetadata) -> Result<Cow<'a, [u8]>> {
    match metadata.format {
        AudioFormat::Wav => Ok(Cow::Borrowed(audio)),
        AudioFormat::PcmS16le16 => pcm_to_wav(audio, metadata).map(Cow::Owned),
    }
}
