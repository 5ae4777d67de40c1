//! Optional JSON overrides for thresholds and timings
//!
//! Every field is optional; missing fields keep the library defaults.
//!
//! ```json
//! { "segmenter": { "min_gap_secs": 0.03 }, "morse": { "dot_secs": 0.08 } }
//! ```

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tonecodec_core::{
    DtmfToneConfig, MorseDecodeConfig, MorseTiming, SegmenterConfig, UnknownPolicy,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dtmf: DtmfToneConfig,
    pub segmenter: SegmenterConfig,
    pub morse: MorseTiming,
    pub morse_decode: MorseDecodeConfig,
    /// Policy for symbols missing from the alphabet when encoding
    pub unknown: UnknownPolicy,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject unknown symbols and code groups everywhere
    pub fn make_strict(&mut self) {
        self.unknown = UnknownPolicy::Error;
        self.morse_decode.unknown = UnknownPolicy::Error;
    }
}
