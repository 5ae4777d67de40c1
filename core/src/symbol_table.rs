//! Immutable symbol tables for the dual-tone and timing alphabets
//!
//! Tables are built once and handed to encoders and decoders explicitly, so an
//! alternate alphabet can be substituted without touching their internals.

use crate::error::{Result, ToneCodecError};
use std::collections::HashMap;

/// Standard DTMF low band (Hz)
pub const DTMF_LOW_FREQS: [u32; 4] = [697, 770, 852, 941];

/// Standard DTMF high band (Hz)
pub const DTMF_HIGH_FREQS: [u32; 4] = [1209, 1336, 1477, 1633];

/// Keypad layout, rows follow the low band and columns the high band
const DTMF_KEYPAD: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Word separator used in raw Morse code text
pub const MORSE_WORD_SEPARATOR: &str = "/";

const INTERNATIONAL_MORSE: [(char, &str); 36] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
];

/// Low/high frequency pair identifying one dual-tone symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrequencySignature {
    pub low: u32,
    pub high: u32,
}

impl FrequencySignature {
    pub fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }
}

/// Bijective mapping between dual-tone symbols and frequency pairs
#[derive(Debug, Clone)]
pub struct DualToneTable {
    by_symbol: HashMap<char, FrequencySignature>,
    by_signature: HashMap<FrequencySignature, char>,
    low_band: Vec<u32>,
    high_band: Vec<u32>,
}

impl DualToneTable {
    /// Build a table from explicit entries
    ///
    /// Fails when a symbol or a signature appears twice, when the table is empty,
    /// or when the low and high bands share a frequency.
    pub fn new(entries: &[(char, FrequencySignature)]) -> Result<Self> {
        if entries.is_empty() {
            return Err(ToneCodecError::InvalidConfig(
                "dual-tone table has no entries".to_string(),
            ));
        }

        let mut by_symbol = HashMap::with_capacity(entries.len());
        let mut by_signature = HashMap::with_capacity(entries.len());
        let mut low_band = Vec::new();
        let mut high_band = Vec::new();

        for &(symbol, signature) in entries {
            if by_symbol.insert(symbol, signature).is_some() {
                return Err(ToneCodecError::InvalidConfig(format!(
                    "symbol {:?} appears twice",
                    symbol
                )));
            }
            if by_signature.insert(signature, symbol).is_some() {
                return Err(ToneCodecError::InvalidConfig(format!(
                    "tone pair ({}, {}) appears twice",
                    signature.low, signature.high
                )));
            }
            if !low_band.contains(&signature.low) {
                low_band.push(signature.low);
            }
            if !high_band.contains(&signature.high) {
                high_band.push(signature.high);
            }
        }

        if low_band.iter().any(|f| high_band.contains(f)) {
            return Err(ToneCodecError::InvalidConfig(
                "low and high bands must be disjoint".to_string(),
            ));
        }

        low_band.sort_unstable();
        high_band.sort_unstable();

        Ok(Self {
            by_symbol,
            by_signature,
            low_band,
            high_band,
        })
    }

    /// The 16-key telephone keypad (digits, `*`, `#`, A-D)
    pub fn dtmf() -> Self {
        let mut by_symbol = HashMap::with_capacity(16);
        let mut by_signature = HashMap::with_capacity(16);
        for (row, &low) in DTMF_LOW_FREQS.iter().enumerate() {
            for (col, &high) in DTMF_HIGH_FREQS.iter().enumerate() {
                let symbol = DTMF_KEYPAD[row][col];
                let signature = FrequencySignature::new(low, high);
                by_symbol.insert(symbol, signature);
                by_signature.insert(signature, symbol);
            }
        }

        Self {
            by_symbol,
            by_signature,
            low_band: DTMF_LOW_FREQS.to_vec(),
            high_band: DTMF_HIGH_FREQS.to_vec(),
        }
    }

    pub fn signature(&self, symbol: char) -> Option<FrequencySignature> {
        self.by_symbol.get(&symbol).copied()
    }

    pub fn symbol(&self, signature: FrequencySignature) -> Option<char> {
        self.by_signature.get(&signature).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.by_symbol.contains_key(&symbol)
    }

    /// Candidate low-band frequencies, ascending
    pub fn low_band(&self) -> &[u32] {
        &self.low_band
    }

    /// Candidate high-band frequencies, ascending
    pub fn high_band(&self) -> &[u32] {
        &self.high_band
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl Default for DualToneTable {
    fn default() -> Self {
        Self::dtmf()
    }
}

/// Bijective mapping between characters and dot/dash code groups
#[derive(Debug, Clone)]
pub struct MorseTable {
    by_symbol: HashMap<char, String>,
    by_code: HashMap<String, char>,
}

impl MorseTable {
    /// Build a table from explicit entries
    ///
    /// Symbols are stored upper-case. Codes may only contain `.` and `-`.
    pub fn new(entries: &[(char, &str)]) -> Result<Self> {
        let mut by_symbol = HashMap::with_capacity(entries.len());
        let mut by_code = HashMap::with_capacity(entries.len());

        for &(symbol, code) in entries {
            if code.is_empty() || !code.chars().all(|c| c == '.' || c == '-') {
                return Err(ToneCodecError::InvalidConfig(format!(
                    "invalid code group {:?} for {:?}",
                    code, symbol
                )));
            }
            let symbol = symbol.to_ascii_uppercase();
            if by_symbol.insert(symbol, code.to_string()).is_some() {
                return Err(ToneCodecError::InvalidConfig(format!(
                    "symbol {:?} appears twice",
                    symbol
                )));
            }
            if by_code.insert(code.to_string(), symbol).is_some() {
                return Err(ToneCodecError::InvalidConfig(format!(
                    "code group {:?} appears twice",
                    code
                )));
            }
        }

        Ok(Self { by_symbol, by_code })
    }

    /// International Morse code for A-Z and 0-9
    pub fn international() -> Self {
        Self {
            by_symbol: INTERNATIONAL_MORSE
                .iter()
                .map(|&(symbol, code)| (symbol, code.to_string()))
                .collect(),
            by_code: INTERNATIONAL_MORSE
                .iter()
                .map(|&(symbol, code)| (code.to_string(), symbol))
                .collect(),
        }
    }

    /// Code group for a character, case-insensitive
    pub fn code(&self, symbol: char) -> Option<&str> {
        self.by_symbol
            .get(&symbol.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn symbol(&self, code: &str) -> Option<char> {
        self.by_code.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl Default for MorseTable {
    fn default() -> Self {
        Self::international()
    }
}
