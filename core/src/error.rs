use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToneCodecError {
    #[error("Unsupported sample width: {0} bytes")]
    UnsupportedSampleWidth(u16),

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(u16),

    #[error("Sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Segment {segment}: no symbol for tone pair ({low} Hz, {high} Hz)")]
    UnknownSignature { segment: usize, low: u32, high: u32 },

    #[error("Symbol {0:?} is not in the symbol table")]
    UnknownSymbol(char),

    #[error("Code group {0:?} is not in the symbol table")]
    UnknownCode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input size")]
    InvalidInputSize,

    #[error("FFT error: {0}")]
    FftError(String),
}

pub type Result<T> = std::result::Result<T, ToneCodecError>;
