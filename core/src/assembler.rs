//! Conversion between decoded symbol streams, raw Morse code and text

use crate::error::{Result, ToneCodecError};
use crate::morse::{CHAR_SEPARATOR, WORD_SEPARATOR};
use crate::symbol_table::{MorseTable, MORSE_WORD_SEPARATOR};
use serde::{Deserialize, Serialize};

/// What to do with a unit that has no entry in the symbol table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Log and skip the unit
    #[default]
    Drop,
    /// Fail the whole operation
    Error,
}

/// Concatenate dual-tone symbols in segment order
pub fn assemble_symbols(symbols: &[char]) -> String {
    symbols.iter().collect()
}

/// Translate text to raw Morse code
///
/// Characters within a word are separated by one space and words by ` / `.
/// Lookup is case-insensitive.
pub fn text_to_code(text: &str, table: &MorseTable, policy: UnknownPolicy) -> Result<String> {
    let mut words = Vec::new();

    for word in text.split_whitespace() {
        let mut groups = Vec::new();
        for symbol in word.chars() {
            match table.code(symbol) {
                Some(code) => groups.push(code),
                None => match policy {
                    UnknownPolicy::Drop => log::warn!("no Morse code for {:?}, skipped", symbol),
                    UnknownPolicy::Error => return Err(ToneCodecError::UnknownSymbol(symbol)),
                },
            }
        }
        if !groups.is_empty() {
            words.push(groups.join(CHAR_SEPARATOR));
        }
    }

    let separator = format!(" {} ", MORSE_WORD_SEPARATOR);
    Ok(words.join(&separator))
}

/// Translate raw Morse code back to text
///
/// Words are split on three spaces or on a `/` group, then characters on
/// whitespace. Words are joined with a single space and the result is trimmed.
pub fn code_to_text(code: &str, table: &MorseTable, policy: UnknownPolicy) -> Result<String> {
    let mut words = Vec::new();
    let mut decoded = String::new();

    for word in code.split(WORD_SEPARATOR) {
        for group in word.split_whitespace() {
            if group == MORSE_WORD_SEPARATOR {
                if !decoded.is_empty() {
                    words.push(std::mem::take(&mut decoded));
                }
                continue;
            }
            match table.symbol(group) {
                Some(symbol) => decoded.push(symbol),
                None => match policy {
                    UnknownPolicy::Drop => log::warn!("unknown code group {:?} dropped", group),
                    UnknownPolicy::Error => {
                        return Err(ToneCodecError::UnknownCode(group.to_string()))
                    }
                },
            }
        }
        if !decoded.is_empty() {
            words.push(std::mem::take(&mut decoded));
        }
    }

    Ok(words.join(" ").trim().to_string())
}
