//! Silence-based segmentation for dual-tone audio
//!
//! The waveform is scanned in fixed-size chunks against an adaptive threshold
//! (mean absolute amplitude of the whole waveform times a factor). A run of
//! quiet chunks longer than the minimum gap closes the current tone-active
//! segment; shorter dips are absorbed into it.

use crate::error::{Result, ToneCodecError};
use crate::waveform::mean_abs;
use serde::{Deserialize, Serialize};

/// Default scan chunk in samples
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Default minimum silence between two tones (seconds)
pub const DEFAULT_MIN_GAP_SECS: f32 = 0.02;

/// Default multiplier applied to the mean absolute amplitude
pub const DEFAULT_MEAN_THRESHOLD_FACTOR: f32 = 0.5;

/// Half-open sample range `[start, end)` of one tone-active region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Samples per scan chunk
    pub chunk_size: usize,
    /// Silence must last longer than this to split two segments
    pub min_gap_secs: f32,
    /// Multiplier on the mean absolute amplitude giving the silence threshold
    pub threshold_factor: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_gap_secs: DEFAULT_MIN_GAP_SECS,
            threshold_factor: DEFAULT_MEAN_THRESHOLD_FACTOR,
        }
    }
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ToneCodecError::InvalidConfig(
                "segmenter chunk_size must be positive".to_string(),
            ));
        }
        if !self.min_gap_secs.is_finite() || self.min_gap_secs < 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "segmenter min_gap_secs must be a non-negative number".to_string(),
            ));
        }
        if !self.threshold_factor.is_finite() || self.threshold_factor <= 0.0 {
            return Err(ToneCodecError::InvalidConfig(
                "segmenter threshold_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Split a waveform into ordered, non-overlapping tone-active segments
///
/// The last segment is always flushed, however short. A waveform with no
/// energy (or no samples) yields no segments.
pub fn split_on_silence(samples: &[i16], sample_rate: u32, config: &SegmenterConfig) -> Vec<Segment> {
    let threshold = mean_abs(samples) * config.threshold_factor;
    if threshold <= 0.0 {
        log::debug!("waveform has no energy, no segments");
        return Vec::new();
    }

    let chunk_size = config.chunk_size.max(1);
    let min_gap = sample_rate as f32 * config.min_gap_secs;
    log::debug!(
        "segmenting {} samples: threshold {:.1}, min gap {:.0} samples",
        samples.len(),
        threshold,
        min_gap
    );

    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    let mut silence_start = 0;
    let mut silent_len = 0usize;

    for (index, chunk) in samples.chunks(chunk_size).enumerate() {
        let offset = index * chunk_size;

        if mean_abs(chunk) < threshold {
            if silent_len == 0 {
                silence_start = offset;
            }
            silent_len += chunk.len();
            continue;
        }

        match start {
            Some(begin) if silent_len as f32 > min_gap => {
                segments.push(Segment {
                    start: begin,
                    end: silence_start,
                });
                start = Some(offset);
            }
            Some(_) => {}
            None => start = Some(offset),
        }
        silent_len = 0;
    }

    if let Some(begin) = start {
        let end = if silent_len > 0 {
            silence_start
        } else {
            samples.len()
        };
        segments.push(Segment { start: begin, end });
    }

    log::debug!("found {} segments", segments.len());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    fn burst(len: usize, amplitude: i16) -> Vec<i16> {
        (0..len)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect()
    }

    #[test]
    fn test_empty_waveform_has_no_segments() {
        let segments = split_on_silence(&[], RATE, &SegmenterConfig::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn test_silent_waveform_has_no_segments() {
        let segments = split_on_silence(&vec![0; 4000], RATE, &SegmenterConfig::default());
        assert!(segments.is_empty());
    }

    #[test]
    fn test_two_bursts_split_on_gap() {
        let mut samples = burst(1280, 10_000);
        samples.extend(vec![0; 640]);
        samples.extend(burst(1280, 10_000));
        samples.extend(vec![0; 640]);

        let segments = split_on_silence(&samples, RATE, &SegmenterConfig::default());
        assert_eq!(
            segments,
            vec![
                Segment { start: 0, end: 1280 },
                Segment { start: 1920, end: 3200 },
            ]
        );
    }

    #[test]
    fn test_short_dip_is_absorbed() {
        // 128 silent samples at 8 kHz is 16 ms, under the 20 ms gap
        let mut samples = burst(1280, 10_000);
        samples.extend(vec![0; 128]);
        samples.extend(burst(1280, 10_000));

        let segments = split_on_silence(&samples, RATE, &SegmenterConfig::default());
        assert_eq!(segments, vec![Segment { start: 0, end: 2688 }]);
    }

    #[test]
    fn test_leading_silence_is_skipped() {
        let mut samples = vec![0; 640];
        samples.extend(burst(1280, 10_000));

        let segments = split_on_silence(&samples, RATE, &SegmenterConfig::default());
        assert_eq!(segments, vec![Segment { start: 640, end: 1920 }]);
    }

    #[test]
    fn test_final_short_segment_is_flushed() {
        let mut samples = burst(1280, 10_000);
        samples.extend(vec![0; 640]);
        samples.extend(burst(128, 10_000));

        let segments = split_on_silence(&samples, RATE, &SegmenterConfig::default());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], Segment { start: 1920, end: 2048 });
    }

    #[test]
    fn test_min_gap_is_exclusive() {
        // 62.5 ms at 8 kHz is exactly 500 samples
        let config = SegmenterConfig {
            chunk_size: 250,
            min_gap_secs: 0.0625,
            ..SegmenterConfig::default()
        };
        let mut samples = burst(2500, 10_000);
        samples.extend(vec![0; 500]);
        samples.extend(burst(2500, 10_000));
        assert_eq!(split_on_silence(&samples, RATE, &config).len(), 1);

        let mut samples = burst(2500, 10_000);
        samples.extend(vec![0; 750]);
        samples.extend(burst(2500, 10_000));
        assert_eq!(split_on_silence(&samples, RATE, &config).len(), 2);
    }

    #[test]
    fn test_config_validation() {
        assert!(SegmenterConfig::default().validate().is_ok());
        let bad = SegmenterConfig {
            chunk_size: 0,
            ..SegmenterConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = SegmenterConfig {
            threshold_factor: f32::NAN,
            ..SegmenterConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
