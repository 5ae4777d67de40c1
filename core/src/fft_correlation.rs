//! FFT-based cross-correlation for real-valued signals
//!
//! Scoring a segment against a candidate frequency is the maximum absolute
//! value of the full cross-correlation (length `N + M - 1`, scipy `full` mode)
//! between the segment and a unit sine of the same length and sample rate.
//!
//! A [`Correlator`] keeps the forward spectrum of one segment so that every
//! candidate reference only costs one forward and one inverse transform.

use crate::error::{Result, ToneCodecError};
use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;

/// Unit-amplitude sine at a fixed frequency, tagged with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTone {
    pub frequency: f32,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl ReferenceTone {
    pub fn new(len: usize, sample_rate: u32, frequency: f32) -> Self {
        Self {
            frequency,
            sample_rate,
            samples: reference_tone(len, sample_rate, frequency),
        }
    }
}

/// Generate `len` samples of `sin(2π f t)` starting at phase zero
pub fn reference_tone(len: usize, sample_rate: u32, frequency: f32) -> Vec<f32> {
    let rate = sample_rate as f32;
    (0..len)
        .map(|n| (2.0 * PI * frequency * n as f32 / rate).sin())
        .collect()
}

/// Cross-correlates one fixed signal against any number of templates
pub struct Correlator {
    signal_len: usize,
    max_template_len: usize,
    fft_size: usize,
    spectrum: Vec<Complex<f32>>,
    r2c: Arc<dyn RealToComplex<f32>>,
    c2r: Arc<dyn ComplexToReal<f32>>,
}

impl Correlator {
    /// Prepare a correlator for templates no longer than the signal
    pub fn new(signal: &[f32]) -> Result<Self> {
        Self::with_max_template_len(signal, signal.len())
    }

    pub fn with_max_template_len(signal: &[f32], max_template_len: usize) -> Result<Self> {
        if signal.is_empty() || max_template_len == 0 {
            return Err(ToneCodecError::InvalidInputSize);
        }

        let fft_size = (signal.len() + max_template_len - 1).next_power_of_two();

        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(fft_size);
        let c2r = planner.plan_fft_inverse(fft_size);

        let mut padded = vec![0.0; fft_size];
        padded[..signal.len()].copy_from_slice(signal);
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut padded, &mut spectrum).map_err(|e| {
            ToneCodecError::FftError(format!("forward FFT failed for signal: {:?}", e))
        })?;

        Ok(Self {
            signal_len: signal.len(),
            max_template_len,
            fft_size,
            spectrum,
            r2c,
            c2r,
        })
    }

    /// Full cross-correlation, `signal.len() + template.len() - 1` values
    ///
    /// Index `k` holds the lag where the last template sample lines up with
    /// `signal[k]`.
    pub fn correlate(&self, template: &[f32]) -> Result<Vec<f32>> {
        if template.is_empty() {
            return Ok(Vec::new());
        }
        if template.len() > self.max_template_len {
            return Err(ToneCodecError::InvalidInputSize);
        }

        // Time-reversing the template turns the spectral product into a correlation
        let mut padded = vec![0.0; self.fft_size];
        for (slot, &value) in padded.iter_mut().zip(template.iter().rev()) {
            *slot = value;
        }

        let mut product = self.r2c.make_output_vec();
        self.r2c.process(&mut padded, &mut product).map_err(|e| {
            ToneCodecError::FftError(format!("forward FFT failed for template: {:?}", e))
        })?;

        for (bin, &signal_bin) in product.iter_mut().zip(self.spectrum.iter()) {
            *bin *= signal_bin;
        }
        // DC and Nyquist bins of a real spectrum carry no imaginary part
        if let Some(first) = product.first_mut() {
            first.im = 0.0;
        }
        if let Some(last) = product.last_mut() {
            last.im = 0.0;
        }

        let mut output = self.c2r.make_output_vec();
        self.c2r.process(&mut product, &mut output).map_err(|e| {
            ToneCodecError::FftError(format!("inverse FFT failed: {:?}", e))
        })?;

        let normalization = self.fft_size as f32;
        output.truncate(self.signal_len + template.len() - 1);
        output.iter_mut().for_each(|x| *x /= normalization);
        Ok(output)
    }

    /// Maximum absolute cross-correlation against a template
    pub fn peak(&self, template: &[f32]) -> Result<f32> {
        let correlation = self.correlate(template)?;
        Ok(correlation.iter().fold(0.0f32, |acc, &x| acc.max(x.abs())))
    }
}

/// Full cross-correlation of two signals
pub fn cross_correlate(signal: &[f32], template: &[f32]) -> Result<Vec<f32>> {
    if signal.is_empty() || template.is_empty() {
        return Ok(Vec::new());
    }
    Correlator::with_max_template_len(signal, template.len())?.correlate(template)
}

/// Correlation score of a segment against a reference tone
///
/// Fails when the reference was generated at a different sample rate.
pub fn correlate_with_reference(
    segment: &[f32],
    segment_rate: u32,
    reference: &ReferenceTone,
) -> Result<f32> {
    if reference.sample_rate != segment_rate {
        return Err(ToneCodecError::SampleRateMismatch {
            expected: segment_rate,
            actual: reference.sample_rate,
        });
    }
    if segment.is_empty() || reference.samples.is_empty() {
        return Ok(0.0);
    }
    Correlator::with_max_template_len(segment, reference.samples.len())?.peak(&reference.samples)
}

/// Correlation score of a segment against a unit sine at `frequency`
pub fn correlation_score(segment: &[f32], sample_rate: u32, frequency: f32) -> Result<f32> {
    let reference = ReferenceTone::new(segment.len(), sample_rate, frequency);
    correlate_with_reference(segment, sample_rate, &reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_full(signal: &[f32], template: &[f32]) -> Vec<f32> {
        let n = signal.len();
        let m = template.len();
        (0..n + m - 1)
            .map(|k| {
                // template[m-1] aligned with signal[k]
                (0..m)
                    .filter_map(|j| {
                        let idx = k as isize - (m as isize - 1) + j as isize;
                        if idx >= 0 && (idx as usize) < n {
                            Some(signal[idx as usize] * template[j])
                        } else {
                            None
                        }
                    })
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_full_length() {
        let result = cross_correlate(&[1.0; 100], &[1.0; 10]).unwrap();
        assert_eq!(result.len(), 109);
    }

    #[test]
    fn test_matches_direct_correlation() {
        let signal = vec![1.0, -2.0, 3.0, 0.5, -1.5, 2.0];
        let template = vec![0.5, 1.0, -1.0];
        let fast = cross_correlate(&signal, &template).unwrap();
        let slow = naive_full(&signal, &template);
        assert_eq!(fast.len(), slow.len());
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_impulse_template_locates_lag() {
        let signal = vec![0.0, 0.0, 5.0, 0.0, 0.0];
        let template = vec![1.0, 0.0, 0.0];
        let result = cross_correlate(&signal, &template).unwrap();
        let (idx, _) = result
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        // template[0] on signal[2] puts template[2] on signal[4]
        assert_eq!(idx, 4);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(cross_correlate(&[], &[1.0]).unwrap().is_empty());
        assert!(cross_correlate(&[1.0], &[]).unwrap().is_empty());
        assert!(Correlator::new(&[]).is_err());
    }

    #[test]
    fn test_template_longer_than_capacity() {
        let correlator = Correlator::new(&[1.0, 2.0]).unwrap();
        assert!(correlator.correlate(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_reference_tone_shape() {
        let tone = reference_tone(4, 4000, 1000.0);
        assert!(tone[0].abs() < 1e-6);
        assert!((tone[1] - 1.0).abs() < 1e-6);
        assert!(tone[2].abs() < 1e-5);
        assert!((tone[3] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_matching_frequency_scores_half_length() {
        let rate = 8000;
        let len = 4000;
        let segment = reference_tone(len, rate, 1000.0);
        let score = correlation_score(&segment, rate, 1000.0).unwrap();
        let expected = len as f32 / 2.0;
        assert!(
            (score - expected).abs() < expected * 0.02,
            "score {} expected about {}",
            score,
            expected
        );
    }

    #[test]
    fn test_score_is_phase_insensitive() {
        let rate = 8000;
        let len = 4000;
        let segment: Vec<f32> = (0..len)
            .map(|n| (2.0 * PI * 770.0 * n as f32 / rate as f32 + PI / 2.0).sin())
            .collect();
        let score = correlation_score(&segment, rate, 770.0).unwrap();
        assert!(score > len as f32 * 0.45, "score {}", score);
    }

    #[test]
    fn test_off_frequency_scores_low() {
        let rate = 8000;
        let len = 4000;
        let segment = reference_tone(len, rate, 697.0);
        let on = correlation_score(&segment, rate, 697.0).unwrap();
        let off = correlation_score(&segment, rate, 770.0).unwrap();
        assert!(off < on * 0.1, "on {} off {}", on, off);
    }

    #[test]
    fn test_mismatched_reference_rate() {
        let reference = ReferenceTone::new(100, 16_000, 1000.0);
        let result = correlate_with_reference(&[0.0; 100], 8000, &reference);
        assert!(matches!(
            result,
            Err(ToneCodecError::SampleRateMismatch {
                expected: 8000,
                actual: 16_000
            })
        ));
    }

    #[test]
    fn test_correlator_reuse() {
        let rate = 8000;
        let segment: Vec<f32> = reference_tone(2000, rate, 941.0)
            .iter()
            .zip(reference_tone(2000, rate, 1336.0))
            .map(|(a, b)| a + b)
            .collect();
        let correlator = Correlator::new(&segment).unwrap();
        let low = correlator.peak(&reference_tone(2000, rate, 941.0)).unwrap();
        let wrong = correlator.peak(&reference_tone(2000, rate, 697.0)).unwrap();
        assert!(low > wrong * 5.0, "low {} wrong {}", low, wrong);
    }
}
