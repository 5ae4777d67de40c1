use thiserror::Error;
use tonecodec_core::ToneCodecError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Codec(#[from] ToneCodecError),
}
