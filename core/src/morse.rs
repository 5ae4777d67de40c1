//! Morse keying and duration classification
//!
//! Tone runs are bucketed into dots and dashes, silence runs into intra-character,
//! character and word gaps. All thresholds are in seconds and are converted
//! against the sample rate of the audio being decoded.

use crate::error::{Result, ToneCodecError};
use crate::runs::{Run, RunState};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

pub const DOT: char = '.';
pub const DASH: char = '-';
pub const CHAR_SEPARATOR: &str = " ";
pub const WORD_SEPARATOR: &str = "   ";

/// Tone runs longer than this are dashes (seconds)
pub const DEFAULT_TONE_DASH_SECS: f32 = 0.2;
/// Tone runs longer than this (and not dashes) are dots (seconds)
pub const DEFAULT_TONE_DOT_SECS: f32 = 0.05;
/// Silence runs longer than this end a word (seconds)
pub const DEFAULT_SILENCE_WORD_SECS: f32 = 1.5;
/// Silence runs longer than this (and not word gaps) end a character (seconds)
pub const DEFAULT_SILENCE_CHAR_SECS: f32 = 0.4;

pub const DEFAULT_MORSE_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_MORSE_FREQUENCY: f32 = 1000.0;
pub const DEFAULT_DOT_SECS: f32 = 0.1;
/// Extra silence at a character boundary, on top of the gap after the last tone
pub const DEFAULT_CHAR_GAP_SECS: f32 = 0.4;
/// Extra silence at a word boundary, on top of the two surrounding character gaps
pub const DEFAULT_WORD_GAP_SECS: f32 = 1.0;
pub const DEFAULT_MORSE_AMPLITUDE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationClass {
    Dot,
    Dash,
    IntraGap,
    CharGap,
    WordGap,
}

impl DurationClass {
    /// Raw code text for this class; intra-character gaps render as nothing
    pub fn as_code(&self) -> &'static str {
        match self {
            DurationClass::Dot => ".",
            DurationClass::Dash => "-",
            DurationClass::IntraGap => "",
            DurationClass::CharGap => CHAR_SEPARATOR,
            DurationClass::WordGap => WORD_SEPARATOR,
        }
    }

    pub fn is_mark(&self) -> bool {
        matches!(self, DurationClass::Dot | DurationClass::Dash)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationThresholds {
    pub tone_dash_secs: f32,
    pub tone_dot_secs: f32,
    pub silence_word_secs: f32,
    pub silence_char_secs: f32,
}

impl Default for DurationThresholds {
    fn default() -> Self {
        Self {
            tone_dash_secs: DEFAULT_TONE_DASH_SECS,
            tone_dot_secs: DEFAULT_TONE_DOT_SECS,
            silence_word_secs: DEFAULT_SILENCE_WORD_SECS,
            silence_char_secs: DEFAULT_SILENCE_CHAR_SECS,
        }
    }
}

impl DurationThresholds {
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.tone_dash_secs,
            self.tone_dot_secs,
            self.silence_word_secs,
            self.silence_char_secs,
        ];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ToneCodecError::InvalidConfig(
                "duration thresholds must be non-negative numbers".to_string(),
            ));
        }
        if self.tone_dot_secs > self.tone_dash_secs {
            return Err(ToneCodecError::InvalidConfig(
                "tone_dot_secs must not exceed tone_dash_secs".to_string(),
            ));
        }
        if self.silence_char_secs > self.silence_word_secs {
            return Err(ToneCodecError::InvalidConfig(
                "silence_char_secs must not exceed silence_word_secs".to_string(),
            ));
        }
        Ok(())
    }

    /// Classify one run, `None` for a tone too short to be a dot
    pub fn classify(&self, run: &Run, sample_rate: u32) -> Option<DurationClass> {
        let duration = run.duration as f64;
        let samples = |secs: f32| secs as f64 * sample_rate as f64;

        match run.state {
            RunState::Tone => {
                if duration > samples(self.tone_dash_secs) {
                    Some(DurationClass::Dash)
                } else if duration > samples(self.tone_dot_secs) {
                    Some(DurationClass::Dot)
                } else {
                    None
                }
            }
            RunState::Silence => {
                if duration > samples(self.silence_word_secs) {
                    Some(DurationClass::WordGap)
                } else if duration > samples(self.silence_char_secs) {
                    Some(DurationClass::CharGap)
                } else {
                    Some(DurationClass::IntraGap)
                }
            }
        }
    }
}

/// Turn classified runs into raw code over `.`, `-` and spaces
///
/// Unrecognized tones are logged and dropped. Gaps are only written between
/// two marks, so surrounding silence never produces separators.
pub fn runs_to_code(runs: &[Run], sample_rate: u32, thresholds: &DurationThresholds) -> String {
    let mut code = String::new();
    let mut pending_gap: Option<DurationClass> = None;

    for run in runs {
        match thresholds.classify(run, sample_rate) {
            Some(class) if class.is_mark() => {
                if !code.is_empty() {
                    if let Some(gap) = pending_gap {
                        code.push_str(gap.as_code());
                    }
                }
                pending_gap = None;
                code.push_str(class.as_code());
            }
            Some(gap) => {
                // Keep the widest gap seen since the last mark
                pending_gap = Some(match (pending_gap, gap) {
                    (Some(DurationClass::WordGap), _) | (_, DurationClass::WordGap) => {
                        DurationClass::WordGap
                    }
                    (Some(DurationClass::CharGap), _) | (_, DurationClass::CharGap) => {
                        DurationClass::CharGap
                    }
                    _ => DurationClass::IntraGap,
                });
            }
            None => {
                log::warn!(
                    "unrecognized tone of {:.3}s dropped",
                    run.duration_secs(sample_rate)
                );
            }
        }
    }

    code
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorseTiming {
    pub sample_rate: u32,
    /// Keying tone frequency in Hz
    pub frequency: f32,
    /// Dot length in seconds; a dash is three dots and every tone is followed by one dot of silence
    pub dot_secs: f32,
    pub char_gap_secs: f32,
    pub word_gap_secs: f32,
    /// Tone amplitude relative to full scale
    pub amplitude: f32,
}

impl Default for MorseTiming {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_MORSE_SAMPLE_RATE,
            frequency: DEFAULT_MORSE_FREQUENCY,
            dot_secs: DEFAULT_DOT_SECS,
            char_gap_secs: DEFAULT_CHAR_GAP_SECS,
            word_gap_secs: DEFAULT_WORD_GAP_SECS,
            amplitude: DEFAULT_MORSE_AMPLITUDE,
        }
    }
}

impl MorseTiming {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneCodecError::InvalidConfig(
                "morse sample_rate must be non-zero".to_string(),
            ));
        }
        let nyquist = self.sample_rate as f32 / 2.0;
        if !self.frequency.is_finite() || self.frequency <= 0.0 || self.frequency >= nyquist {
            return Err(ToneCodecError::InvalidConfig(format!(
                "morse frequency must be between 0 and {} Hz",
                nyquist
            )));
        }
        if !self.dot_secs.is_finite() || self.dot_secs <= 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "morse dot_secs must be positive".to_string(),
            ));
        }
        if [self.char_gap_secs, self.word_gap_secs]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ToneCodecError::InvalidConfig(
                "morse gaps must be non-negative".to_string(),
            ));
        }
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 || self.amplitude > 1.0 {
            return Err(ToneCodecError::InvalidConfig(
                "morse amplitude must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    fn samples(&self, secs: f32) -> usize {
        (self.sample_rate as f32 * secs) as usize
    }
}

/// Renders raw Morse code to a keyed sine tone
pub struct MorseKeyer {
    timing: MorseTiming,
}

impl MorseKeyer {
    pub fn new(timing: MorseTiming) -> Self {
        Self { timing }
    }

    /// Render code made of `.`, `-`, ` ` (character boundary) and `/` (word boundary)
    ///
    /// Any other character is ignored.
    pub fn key(&self, code: &str) -> Vec<f32> {
        let dot = self.timing.samples(self.timing.dot_secs);
        let dash = dot * 3;
        let char_gap = self.timing.samples(self.timing.char_gap_secs);
        let word_gap = self.timing.samples(self.timing.word_gap_secs);

        let mut samples = Vec::new();
        for symbol in code.chars() {
            match symbol {
                DOT => {
                    self.push_tone(&mut samples, dot);
                    samples.resize(samples.len() + dot, 0.0);
                }
                DASH => {
                    self.push_tone(&mut samples, dash);
                    samples.resize(samples.len() + dot, 0.0);
                }
                ' ' => samples.resize(samples.len() + char_gap, 0.0),
                '/' => samples.resize(samples.len() + word_gap, 0.0),
                _ => {}
            }
        }
        samples
    }

    fn push_tone(&self, samples: &mut Vec<f32>, len: usize) {
        let rate = self.timing.sample_rate as f32;
        let freq = self.timing.frequency;
        let amplitude = self.timing.amplitude;
        samples.extend((0..len).map(|i| amplitude * (2.0 * PI * freq * i as f32 / rate).sin()));
    }

    pub fn sample_rate(&self) -> u32 {
        self.timing.sample_rate
    }
}

impl Default for MorseKeyer {
    fn default() -> Self {
        Self::new(MorseTiming::default())
    }
}
