//! Dual-tone generator and correlation detector
//!
//! Each symbol is rendered as the sum of two unit-amplitude sinusoids at its
//! frequency pair, followed by silence. Detection picks the best-correlating
//! low-band and high-band frequencies independently and looks the pair up in
//! the symbol table.

use crate::error::{Result, ToneCodecError};
use crate::fft_correlation::{reference_tone, Correlator};
use crate::symbol_table::{DualToneTable, FrequencySignature};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Default sample rate for synthesized dual-tone audio
pub const DEFAULT_DTMF_SAMPLE_RATE: u32 = 44_100;

/// Default tone length per symbol (seconds)
pub const DEFAULT_DTMF_TONE_SECS: f32 = 0.5;

/// Default silence after each tone (seconds)
pub const DEFAULT_DTMF_GAP_SECS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtmfToneConfig {
    pub sample_rate: u32,
    /// Length of each dual tone in seconds
    pub tone_secs: f32,
    /// Silence appended after each tone in seconds
    pub gap_secs: f32,
}

impl Default for DtmfToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_DTMF_SAMPLE_RATE,
            tone_secs: DEFAULT_DTMF_TONE_SECS,
            gap_secs: DEFAULT_DTMF_GAP_SECS,
        }
    }
}

impl DtmfToneConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ToneCodecError::InvalidConfig(
                "dual-tone sample_rate must be non-zero".to_string(),
            ));
        }
        if !self.tone_secs.is_finite() || self.tone_secs <= 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "dual-tone tone_secs must be positive".to_string(),
            ));
        }
        if !self.gap_secs.is_finite() || self.gap_secs < 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "dual-tone gap_secs must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate, and reject a sample rate that cannot carry every band of `table`
    pub fn validate_for(&self, table: &DualToneTable) -> Result<()> {
        self.validate()?;
        let highest = table
            .low_band()
            .iter()
            .chain(table.high_band())
            .copied()
            .max()
            .unwrap_or(0);
        if self.sample_rate as u64 <= 2 * highest as u64 {
            return Err(ToneCodecError::InvalidConfig(format!(
                "dual-tone sample_rate {} Hz cannot carry {} Hz",
                self.sample_rate, highest
            )));
        }
        Ok(())
    }

    pub fn tone_samples(&self) -> usize {
        (self.sample_rate as f32 * self.tone_secs) as usize
    }

    pub fn gap_samples(&self) -> usize {
        (self.sample_rate as f32 * self.gap_secs) as usize
    }
}

/// Dual-tone modulator - renders frequency pairs to float samples
pub struct DtmfModulator {
    config: DtmfToneConfig,
}

impl DtmfModulator {
    pub fn new(config: DtmfToneConfig) -> Self {
        Self { config }
    }

    /// One tone followed by its silence gap
    pub fn modulate_signature(&self, signature: FrequencySignature) -> Vec<f32> {
        let tone_len = self.config.tone_samples();
        let rate = self.config.sample_rate as f32;
        let low = signature.low as f32;
        let high = signature.high as f32;

        let mut samples: Vec<f32> = (0..tone_len)
            .map(|i| {
                let t = i as f32 / rate;
                (2.0 * PI * low * t).sin() + (2.0 * PI * high * t).sin()
            })
            .collect();
        samples.resize(tone_len + self.config.gap_samples(), 0.0);
        samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

impl Default for DtmfModulator {
    fn default() -> Self {
        Self::new(DtmfToneConfig::default())
    }
}

/// Per-band correlation result for one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub signature: FrequencySignature,
    pub low_score: f32,
    pub high_score: f32,
}

/// Dual-tone demodulator - classifies one segment by correlation
pub struct DtmfDemodulator {
    table: DualToneTable,
}

impl DtmfDemodulator {
    pub fn new(table: DualToneTable) -> Self {
        Self { table }
    }

    /// Pick the strongest low and high frequencies independently
    pub fn detect(&self, segment: &[f32], sample_rate: u32) -> Result<Detection> {
        let correlator = Correlator::new(segment)?;
        let (low, low_score) =
            strongest(&correlator, self.table.low_band(), segment.len(), sample_rate)?;
        let (high, high_score) =
            strongest(&correlator, self.table.high_band(), segment.len(), sample_rate)?;

        Ok(Detection {
            signature: FrequencySignature::new(low, high),
            low_score,
            high_score,
        })
    }

    /// Classify a segment into a symbol
    ///
    /// A detected pair missing from the table is an error carrying `index`,
    /// never a guess at the nearest symbol.
    pub fn demodulate_segment(
        &self,
        segment: &[f32],
        sample_rate: u32,
        index: usize,
    ) -> Result<char> {
        let detection = self.detect(segment, sample_rate)?;
        log::debug!(
            "segment {}: {} Hz ({:.1}) + {} Hz ({:.1})",
            index,
            detection.signature.low,
            detection.low_score,
            detection.signature.high,
            detection.high_score
        );

        self.table
            .symbol(detection.signature)
            .ok_or(ToneCodecError::UnknownSignature {
                segment: index,
                low: detection.signature.low,
                high: detection.signature.high,
            })
    }
}

fn strongest(
    correlator: &Correlator,
    band: &[u32],
    len: usize,
    sample_rate: u32,
) -> Result<(u32, f32)> {
    let mut best = (0u32, 0.0f32);
    for &freq in band {
        let reference = reference_tone(len, sample_rate, freq as f32);
        let score = correlator.peak(&reference)?;
        if score > best.1 {
            best = (freq, score);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    fn short_config() -> DtmfToneConfig {
        DtmfToneConfig {
            sample_rate: RATE,
            tone_secs: 0.1,
            gap_secs: 0.05,
        }
    }

    #[test]
    fn test_modulate_length() {
        let modulator = DtmfModulator::new(short_config());
        let samples = modulator.modulate_signature(FrequencySignature::new(697, 1209));
        assert_eq!(samples.len(), 800 + 400);
        assert!(samples[800..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_modulate_peak_within_two() {
        let modulator = DtmfModulator::new(short_config());
        let samples = modulator.modulate_signature(FrequencySignature::new(941, 1633));
        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak <= 2.0 && peak > 1.5, "peak {}", peak);
    }

    #[test]
    fn test_detect_every_keypad_pair() {
        let table = DualToneTable::dtmf();
        let modulator = DtmfModulator::new(short_config());
        let demodulator = DtmfDemodulator::new(table.clone());

        for symbol in "1234567890*#ABCD".chars() {
            let signature = table.signature(symbol).unwrap();
            let samples = modulator.modulate_signature(signature);
            let tone = &samples[..short_config().tone_samples()];
            let detected = demodulator
                .demodulate_segment(tone, RATE, 0)
                .unwrap();
            assert_eq!(detected, symbol);
        }
    }

    #[test]
    fn test_unknown_pair_is_an_error() {
        // Table without '5' (770 Hz + 1336 Hz)
        let full = DualToneTable::dtmf();
        let entries: Vec<(char, FrequencySignature)> = "123467890*#ABCD"
            .chars()
            .map(|c| (c, full.signature(c).unwrap()))
            .collect();
        let table = DualToneTable::new(&entries).unwrap();
        let demodulator = DtmfDemodulator::new(table);
        let modulator = DtmfModulator::new(short_config());

        let samples = modulator.modulate_signature(FrequencySignature::new(770, 1336));
        let tone = &samples[..short_config().tone_samples()];
        let result = demodulator.demodulate_segment(tone, RATE, 3);
        assert!(matches!(
            result,
            Err(ToneCodecError::UnknownSignature {
                segment: 3,
                low: 770,
                high: 1336
            })
        ));
    }

    #[test]
    fn test_detection_scores_are_positive() {
        let demodulator = DtmfDemodulator::new(DualToneTable::dtmf());
        let modulator = DtmfModulator::new(short_config());
        let samples = modulator.modulate_signature(FrequencySignature::new(852, 1477));
        let detection = demodulator.detect(&samples[..800], RATE).unwrap();
        assert_eq!(detection.signature, FrequencySignature::new(852, 1477));
        assert!(detection.low_score > 300.0);
        assert!(detection.high_score > 300.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(DtmfToneConfig::default().validate().is_ok());
        let bad = DtmfToneConfig {
            tone_secs: 0.0,
            ..DtmfToneConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = DtmfToneConfig {
            sample_rate: 0,
            ..DtmfToneConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_rate_must_exceed_twice_highest_band() {
        let table = DualToneTable::dtmf();
        let at_limit = DtmfToneConfig {
            sample_rate: 2 * 1633,
            ..DtmfToneConfig::default()
        };
        assert!(at_limit.validate().is_ok());
        assert!(matches!(
            at_limit.validate_for(&table),
            Err(ToneCodecError::InvalidConfig(_))
        ));

        let above = DtmfToneConfig {
            sample_rate: 2 * 1633 + 1,
            ..DtmfToneConfig::default()
        };
        assert!(above.validate_for(&table).is_ok());
        assert!(DtmfToneConfig::default().validate_for(&table).is_ok());
    }
}
