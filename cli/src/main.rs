mod config;
mod error;
mod pixmap;
mod wav;

use clap::{Parser, Subcommand};
use config::Config;
use std::path::{Path, PathBuf};
use tonecodec_core::{
    DecoderDtmf, DecoderMorse, DualToneTable, EncoderDtmf, EncoderMorse, MorseTable, RunState,
    Waveform,
};

#[derive(Parser)]
#[command(name = "tonecodec")]
#[command(about = "Keypad tone and Morse code audio encoder/decoder")]
struct Cli {
    /// JSON file overriding default thresholds and timings
    #[arg(long, global = true, value_name = "CONFIG.JSON")]
    config: Option<PathBuf>,

    /// Fail on symbols or code groups missing from the alphabet instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode keypad symbols (0-9, *, #, A-D) to a WAV file
    DtmfEncode {
        /// Symbols to encode
        text: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Output sample rate in Hz
        #[arg(short, long)]
        sample_rate: Option<u32>,
    },

    /// Decode keypad symbols from a WAV file
    DtmfDecode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,
    },

    /// Encode text as Morse code to a WAV file
    MorseEncode {
        /// Text to encode
        text: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Output sample rate in Hz
        #[arg(short, long)]
        sample_rate: Option<u32>,
    },

    /// Decode Morse code text from a WAV file
    MorseDecode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Print the raw dot/dash code as well
        #[arg(long)]
        code: bool,
    },

    /// Encode a plain-text pixmap as keypad tones
    PixmapEncode {
        /// Input pixmap file
        #[arg(value_name = "INPUT.PBM")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Decode keypad tones back into a plain-text pixmap
    PixmapDecode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Output pixmap file
        #[arg(value_name = "OUTPUT.PBM")]
        output: PathBuf,

        /// Header line written at the top of the pixmap
        #[arg(long, default_value = pixmap::DEFAULT_HEADER)]
        header: String,
    },

    /// List the tone segments (or Morse runs) found in a WAV file
    Inspect {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Show tone/silence runs instead of dual-tone segments
        #[arg(long)]
        morse: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.strict {
        config.make_strict();
    }

    match cli.command {
        Commands::DtmfEncode {
            text,
            output,
            sample_rate,
        } => dtmf_encode_command(&config, &text, &output, sample_rate)?,
        Commands::DtmfDecode { input } => {
            let text = dtmf_decode_command(&config, &input)?;
            println!("Decoded: {}", text);
        }
        Commands::MorseEncode {
            text,
            output,
            sample_rate,
        } => morse_encode_command(&config, &text, &output, sample_rate)?,
        Commands::MorseDecode { input, code } => morse_decode_command(&config, &input, code)?,
        Commands::PixmapEncode { input, output } => {
            let contents = std::fs::read_to_string(&input)?;
            let encoded = pixmap::encode(&contents);
            println!("Pixmap {} as {} keypad symbols", input.display(), encoded.chars().count());
            dtmf_encode_command(&config, &encoded, &output, None)?;
        }
        Commands::PixmapDecode {
            input,
            output,
            header,
        } => {
            let text = dtmf_decode_command(&config, &input)?;
            std::fs::write(&output, pixmap::decode(&text, &header))?;
            println!("Wrote pixmap to {}", output.display());
        }
        Commands::Inspect { input, morse } => inspect_command(&config, &input, morse)?,
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<Waveform, Box<dyn std::error::Error>> {
    let waveform = wav::read_waveform(input)?;
    println!(
        "Read {} samples at {} Hz ({:.2}s) from {}",
        waveform.len(),
        waveform.sample_rate(),
        waveform.duration_secs(),
        input.display()
    );
    Ok(waveform)
}

fn dtmf_encode_command(
    config: &Config,
    text: &str,
    output: &Path,
    sample_rate: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tones = config.dtmf;
    if let Some(rate) = sample_rate {
        tones.sample_rate = rate;
    }

    let encoder = EncoderDtmf::with_table(DualToneTable::dtmf(), tones, config.unknown)?;
    let waveform = encoder.encode(text)?;
    println!("Encoded to {} audio samples", waveform.len());

    wav::write_waveform(output, &waveform)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn dtmf_decode_command(config: &Config, input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let waveform = read_input(input)?;
    let decoder = DecoderDtmf::with_table(DualToneTable::dtmf(), config.segmenter)?;
    Ok(decoder.decode(&waveform)?)
}

fn morse_encode_command(
    config: &Config,
    text: &str,
    output: &Path,
    sample_rate: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut timing = config.morse;
    if let Some(rate) = sample_rate {
        timing.sample_rate = rate;
    }

    let encoder = EncoderMorse::with_table(MorseTable::international(), timing, config.unknown)?;
    println!("Code: {}", encoder.code(text)?);
    let waveform = encoder.encode(text)?;
    println!("Encoded to {} audio samples", waveform.len());

    wav::write_waveform(output, &waveform)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn morse_decode_command(
    config: &Config,
    input: &Path,
    show_code: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let waveform = read_input(input)?;
    let decoder = DecoderMorse::with_table(MorseTable::international(), config.morse_decode)?;

    if show_code {
        println!("Code: {}", decoder.decode_to_code(&waveform)?);
    }
    println!("Decoded: {}", decoder.decode(&waveform)?);
    Ok(())
}

fn inspect_command(
    config: &Config,
    input: &Path,
    morse: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let waveform = read_input(input)?;
    let rate = waveform.sample_rate() as f32;

    if morse {
        let decoder = DecoderMorse::with_table(MorseTable::international(), config.morse_decode)?;
        let runs = decoder.runs(&waveform);
        println!("{} runs", runs.len());
        for run in &runs {
            let state = match run.state {
                RunState::Tone => "tone",
                RunState::Silence => "silence",
            };
            let class = config
                .morse_decode
                .thresholds
                .classify(run, waveform.sample_rate())
                .map(|c| format!("{:?}", c))
                .unwrap_or_else(|| "unrecognized".to_string());
            println!("{:>8} {:>8.3}s  {}", state, run.duration as f32 / rate, class);
        }
    } else {
        let decoder = DecoderDtmf::with_table(DualToneTable::dtmf(), config.segmenter)?;
        let segments = decoder.segments(&waveform);
        println!("{} segments", segments.len());
        for (index, segment) in segments.iter().enumerate() {
            println!(
                "{:>4}  {:>8.3}s - {:>8.3}s  ({} samples)",
                index,
                segment.start as f32 / rate,
                segment.end as f32 / rate,
                segment.len()
            );
        }
    }
    Ok(())
}
