use crate::assembler::{code_to_text, UnknownPolicy};
use crate::error::Result;
use crate::morse::{runs_to_code, DurationThresholds};
use crate::runs::{tokenize, Run, TokenizerConfig};
use crate::symbol_table::MorseTable;
use crate::waveform::Waveform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorseDecodeConfig {
    pub tokenizer: TokenizerConfig,
    pub thresholds: DurationThresholds,
    /// Applies to code groups that are not in the table
    pub unknown: UnknownPolicy,
}

impl MorseDecodeConfig {
    pub fn validate(&self) -> Result<()> {
        self.tokenizer.validate()?;
        self.thresholds.validate()
    }
}

/// Decoder recovering text from keyed Morse audio
///
/// Decoding runs in two layers: the waveform is tokenized into tone/silence
/// runs, then each run is classified by duration into marks and gaps.
pub struct DecoderMorse {
    table: MorseTable,
    config: MorseDecodeConfig,
}

impl DecoderMorse {
    pub fn new() -> Self {
        Self {
            table: MorseTable::international(),
            config: MorseDecodeConfig::default(),
        }
    }

    pub fn with_table(table: MorseTable, config: MorseDecodeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn runs(&self, waveform: &Waveform) -> Vec<Run> {
        tokenize(waveform.samples(), waveform.sample_rate(), &self.config.tokenizer)
    }

    /// Raw code over `.`, `-`, one space between characters and three between words
    pub fn decode_to_code(&self, waveform: &Waveform) -> Result<String> {
        let runs = self.runs(waveform);
        Ok(runs_to_code(&runs, waveform.sample_rate(), &self.config.thresholds))
    }

    pub fn decode(&self, waveform: &Waveform) -> Result<String> {
        let code = self.decode_to_code(waveform)?;
        log::debug!("raw code {:?}", code);
        code_to_text(&code, &self.table, self.config.unknown)
    }
}

impl Default for DecoderMorse {
    fn default() -> Self {
        Self::new()
    }
}
