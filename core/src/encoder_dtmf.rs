use crate::assembler::UnknownPolicy;
use crate::dtmf::{DtmfModulator, DtmfToneConfig};
use crate::error::{Result, ToneCodecError};
use crate::symbol_table::DualToneTable;
use crate::waveform::{normalize_to_pcm16, Waveform};

/// Encoder rendering keypad symbols as dual tones
///
/// Every symbol becomes one fixed-length dual tone followed by a silence gap.
/// The concatenated signal is peak-normalized to 16-bit PCM.
pub struct EncoderDtmf {
    table: DualToneTable,
    modulator: DtmfModulator,
    unknown: UnknownPolicy,
}

impl EncoderDtmf {
    pub fn new() -> Self {
        Self {
            table: DualToneTable::dtmf(),
            modulator: DtmfModulator::default(),
            unknown: UnknownPolicy::Drop,
        }
    }

    pub fn with_table(
        table: DualToneTable,
        config: DtmfToneConfig,
        unknown: UnknownPolicy,
    ) -> Result<Self> {
        config.validate_for(&table)?;
        Ok(Self {
            table,
            modulator: DtmfModulator::new(config),
            unknown,
        })
    }

    /// Encode a symbol string into a mono waveform
    ///
    /// Symbols missing from the table are skipped (logged) or rejected,
    /// depending on the unknown-symbol policy.
    pub fn encode(&self, text: &str) -> Result<Waveform> {
        let mut samples = Vec::new();
        let mut encoded = 0usize;

        for symbol in text.chars() {
            match self.table.signature(symbol) {
                Some(signature) => {
                    samples.extend(self.modulator.modulate_signature(signature));
                    encoded += 1;
                }
                None => match self.unknown {
                    UnknownPolicy::Drop => log::warn!("no tone pair for {:?}, skipped", symbol),
                    UnknownPolicy::Error => return Err(ToneCodecError::UnknownSymbol(symbol)),
                },
            }
        }

        log::debug!("encoded {} symbols into {} samples", encoded, samples.len());
        Waveform::new(normalize_to_pcm16(&samples), self.modulator.sample_rate())
    }
}

impl Default for EncoderDtmf {
    fn default() -> Self {
        Self::new()
    }
}
