//! Run-length tokenizer for timing alphabets
//!
//! Produces alternating tone/silence runs with their lengths in samples. The
//! threshold is peak based: half of the loudest sample by default.

use crate::error::{Result, ToneCodecError};
use crate::waveform::{mean_abs, peak_abs};
use serde::{Deserialize, Serialize};

/// Default scan chunk (seconds), 2 ms
pub const DEFAULT_RUN_CHUNK_SECS: f32 = 0.002;

/// Default multiplier applied to the peak absolute amplitude
pub const DEFAULT_PEAK_THRESHOLD_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Tone,
    Silence,
}

/// Maximal stretch of uniform tone/silence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub state: RunState,
    /// Length in samples
    pub duration: usize,
}

impl Run {
    pub fn tone(duration: usize) -> Self {
        Self {
            state: RunState::Tone,
            duration,
        }
    }

    pub fn silence(duration: usize) -> Self {
        Self {
            state: RunState::Silence,
            duration,
        }
    }

    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        self.duration as f32 / sample_rate as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Scan chunk length in seconds, converted against the actual sample rate
    pub chunk_secs: f32,
    /// Multiplier on the peak absolute amplitude giving the tone threshold
    pub threshold_factor: f32,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            chunk_secs: DEFAULT_RUN_CHUNK_SECS,
            threshold_factor: DEFAULT_PEAK_THRESHOLD_FACTOR,
        }
    }
}

impl TokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.chunk_secs.is_finite() || self.chunk_secs <= 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "tokenizer chunk_secs must be positive".to_string(),
            ));
        }
        if !self.threshold_factor.is_finite() || self.threshold_factor <= 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "tokenizer threshold_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Chunk length in samples at the given rate, never zero
    pub fn chunk_samples(&self, sample_rate: u32) -> usize {
        ((sample_rate as f32 * self.chunk_secs) as usize).max(1)
    }
}

/// Tokenize a waveform into alternating tone and silence runs
///
/// The initial state comes from the first chunk; the last pending run is
/// always flushed. A waveform without energy is a single silence run.
pub fn tokenize(samples: &[i16], sample_rate: u32, config: &TokenizerConfig) -> Vec<Run> {
    if samples.is_empty() {
        return Vec::new();
    }

    let threshold = peak_abs(samples) * config.threshold_factor;
    if threshold <= 0.0 {
        return vec![Run::silence(samples.len())];
    }

    let chunk_size = config.chunk_samples(sample_rate);
    log::debug!(
        "tokenizing {} samples: threshold {:.1}, chunk {} samples",
        samples.len(),
        threshold,
        chunk_size
    );

    let mut runs = Vec::new();
    let mut current: Option<Run> = None;

    for chunk in samples.chunks(chunk_size) {
        let state = if mean_abs(chunk) >= threshold {
            RunState::Tone
        } else {
            RunState::Silence
        };

        match current.as_mut() {
            Some(run) if run.state == state => run.duration += chunk.len(),
            _ => {
                if let Some(finished) = current.take() {
                    runs.push(finished);
                }
                current = Some(Run {
                    state,
                    duration: chunk.len(),
                });
            }
        }
    }

    if let Some(last) = current {
        runs.push(last);
    }

    log::debug!("found {} runs", runs.len());
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 10_000;

    fn tone(len: usize) -> Vec<i16> {
        (0..len)
            .map(|i| if i % 2 == 0 { 8000 } else { -8000 })
            .collect()
    }

    #[test]
    fn test_chunk_samples_follow_rate() {
        let config = TokenizerConfig::default();
        assert_eq!(config.chunk_samples(10_000), 20);
        assert_eq!(config.chunk_samples(44_100), 88);
        assert_eq!(config.chunk_samples(100), 1);
    }

    #[test]
    fn test_empty_waveform_has_no_runs() {
        assert!(tokenize(&[], RATE, &TokenizerConfig::default()).is_empty());
    }

    #[test]
    fn test_silent_waveform_is_one_silence_run() {
        let runs = tokenize(&vec![0; 1000], RATE, &TokenizerConfig::default());
        assert_eq!(runs, vec![Run::silence(1000)]);
    }

    #[test]
    fn test_alternating_runs() {
        let mut samples = tone(400);
        samples.extend(vec![0; 200]);
        samples.extend(tone(1200));
        samples.extend(vec![0; 100]);

        let runs = tokenize(&samples, RATE, &TokenizerConfig::default());
        assert_eq!(
            runs,
            vec![
                Run::tone(400),
                Run::silence(200),
                Run::tone(1200),
                Run::silence(100),
            ]
        );
    }

    #[test]
    fn test_initial_state_from_first_chunk() {
        let mut samples = vec![0; 60];
        samples.extend(tone(40));

        let runs = tokenize(&samples, RATE, &TokenizerConfig::default());
        assert_eq!(runs, vec![Run::silence(60), Run::tone(40)]);
    }

    #[test]
    fn test_run_durations_cover_waveform() {
        let mut samples = tone(333);
        samples.extend(vec![0; 517]);
        samples.extend(tone(91));

        let runs = tokenize(&samples, RATE, &TokenizerConfig::default());
        let total: usize = runs.iter().map(|r| r.duration).sum();
        assert_eq!(total, samples.len());
        for pair in runs.windows(2) {
            assert_ne!(pair[0].state, pair[1].state);
        }
    }

    #[test]
    fn test_duration_secs() {
        assert_eq!(Run::tone(5000).duration_secs(RATE), 0.5);
    }
}
