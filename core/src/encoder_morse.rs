use crate::assembler::{text_to_code, UnknownPolicy};
use crate::error::Result;
use crate::morse::{MorseKeyer, MorseTiming};
use crate::symbol_table::MorseTable;
use crate::waveform::{scale_to_pcm16, Waveform};

/// Encoder keying text as Morse code on a single sine tone
pub struct EncoderMorse {
    table: MorseTable,
    keyer: MorseKeyer,
    unknown: UnknownPolicy,
}

impl EncoderMorse {
    pub fn new() -> Self {
        Self {
            table: MorseTable::international(),
            keyer: MorseKeyer::default(),
            unknown: UnknownPolicy::Drop,
        }
    }

    pub fn with_table(table: MorseTable, timing: MorseTiming, unknown: UnknownPolicy) -> Result<Self> {
        timing.validate()?;
        Ok(Self {
            table,
            keyer: MorseKeyer::new(timing),
            unknown,
        })
    }

    /// Raw dot/dash code for the text
    pub fn code(&self, text: &str) -> Result<String> {
        text_to_code(text, &self.table, self.unknown)
    }

    pub fn encode(&self, text: &str) -> Result<Waveform> {
        let code = self.code(text)?;
        let samples = self.keyer.key(&code);
        log::debug!("keyed {:?} into {} samples", code, samples.len());
        Waveform::new(scale_to_pcm16(&samples), self.keyer.sample_rate())
    }
}

impl Default for EncoderMorse {
    fn default() -> Self {
        Self::new()
    }
}
