//! Mono PCM waveform plus the sample conversions shared by the encoders and decoders

use crate::error::{Result, ToneCodecError};

/// Largest positive 16-bit sample magnitude used when scaling to PCM
pub const PCM16_MAX: f32 = 32767.0;

/// Mono 16-bit waveform with its sample rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(ToneCodecError::InvalidConfig(
                "sample rate must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Build a mono waveform from interleaved multi-channel samples
    ///
    /// Channels are averaged frame by frame. A trailing partial frame is ignored.
    pub fn from_interleaved(interleaved: &[i16], channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(ToneCodecError::UnsupportedChannelCount(channels));
        }
        Self::new(downmix_to_mono(interleaved, channels), sample_rate)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

/// Mix interleaved audio down to mono by averaging all channels of each frame
pub fn downmix_to_mono(interleaved: &[i16], channels: u16) -> Vec<i16> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Convert 16-bit samples to f32 in [-1.0, 1.0)
pub fn pcm16_to_f32(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32768.0).collect()
}

/// Divide by the peak magnitude and scale to the full 16-bit range
///
/// All-zero input stays all zero.
pub fn normalize_to_pcm16(samples: &[f32]) -> Vec<i16> {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak == 0.0 {
        return vec![0; samples.len()];
    }
    samples
        .iter()
        .map(|&s| (s / peak * PCM16_MAX) as i16)
        .collect()
}

/// Clamp to [-1.0, 1.0] and scale to the 16-bit range without normalizing
pub fn scale_to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * PCM16_MAX) as i16)
        .collect()
}

/// Mean absolute amplitude, 0.0 for an empty slice
pub(crate) fn mean_abs(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64).abs()).sum();
    (sum / samples.len() as f64) as f32
}

/// Peak absolute amplitude, 0.0 for an empty slice
pub(crate) fn peak_abs(samples: &[i16]) -> f32 {
    samples
        .iter()
        .map(|&s| (s as i32).abs())
        .max()
        .unwrap_or(0) as f32
}
