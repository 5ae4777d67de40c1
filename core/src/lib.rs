//! Tone codec for short symbol alphabets
//!
//! Encodes telephone keypad symbols as dual tones and text as Morse code, and
//! recovers the symbol stream from a recorded waveform. Dual-tone audio is
//! split on silence and each segment is classified by correlation against
//! reference sines; Morse audio is tokenized into tone/silence runs that are
//! classified by duration.

pub mod error;
pub mod waveform;
pub mod symbol_table;
pub mod segment;
pub mod runs;
pub mod fft_correlation;
pub mod dtmf;
pub mod morse;
pub mod assembler;
pub mod encoder_dtmf;
pub mod decoder_dtmf;
pub mod encoder_morse;
pub mod decoder_morse;

pub use assembler::{code_to_text, text_to_code, UnknownPolicy};
pub use decoder_dtmf::DecoderDtmf;
pub use decoder_morse::{DecoderMorse, MorseDecodeConfig};
pub use dtmf::DtmfToneConfig;
pub use encoder_dtmf::EncoderDtmf;
pub use encoder_morse::EncoderMorse;
pub use error::{Result, ToneCodecError};
pub use fft_correlation::{correlation_score, ReferenceTone};
pub use morse::{DurationClass, DurationThresholds, MorseTiming};
pub use runs::{Run, RunState, TokenizerConfig};
pub use segment::{Segment, SegmenterConfig};
pub use symbol_table::{DualToneTable, FrequencySignature, MorseTable};
pub use waveform::Waveform;
