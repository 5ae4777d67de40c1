//! WAV container reading and writing
//!
//! Input may be 8- or 16-bit integer PCM with any channel count; it is mixed
//! down to mono. Output is always mono 16-bit PCM.

use crate::error::CliError;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tonecodec_core::{ToneCodecError, Waveform};

pub fn read_waveform(path: &Path) -> Result<Waveform, CliError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    log::debug!(
        "{}: {} Hz, {} channels, {} bits",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );

    let interleaved: Vec<i16> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| (v as i16) << 8))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader.samples::<i16>().collect::<Result<_, _>>()?,
        _ => {
            return Err(ToneCodecError::UnsupportedSampleWidth(spec.bits_per_sample / 8).into());
        }
    };

    Ok(Waveform::from_interleaved(
        &interleaved,
        spec.channels,
        spec.sample_rate,
    )?)
}

pub fn write_waveform(path: &Path, waveform: &Waveform) -> Result<(), CliError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in waveform.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
