use crate::assembler::assemble_symbols;
use crate::dtmf::DtmfDemodulator;
use crate::error::Result;
use crate::segment::{split_on_silence, Segment, SegmenterConfig};
use crate::symbol_table::DualToneTable;
use crate::waveform::{pcm16_to_f32, Waveform};

/// Decoder recovering keypad symbols from dual-tone audio
///
/// The waveform is split on silence, each segment is classified by
/// correlation, and the symbols are concatenated in segment order. A segment
/// whose tone pair is not in the table fails the whole decode.
pub struct DecoderDtmf {
    demodulator: DtmfDemodulator,
    segmenter: SegmenterConfig,
}

impl DecoderDtmf {
    pub fn new() -> Self {
        Self {
            demodulator: DtmfDemodulator::new(DualToneTable::dtmf()),
            segmenter: SegmenterConfig::default(),
        }
    }

    pub fn with_table(table: DualToneTable, segmenter: SegmenterConfig) -> Result<Self> {
        segmenter.validate()?;
        Ok(Self {
            demodulator: DtmfDemodulator::new(table),
            segmenter,
        })
    }

    /// Tone-active segments of a waveform
    pub fn segments(&self, waveform: &Waveform) -> Vec<Segment> {
        split_on_silence(waveform.samples(), waveform.sample_rate(), &self.segmenter)
    }

    /// Classify every segment and return the symbols in order
    pub fn decode_symbols(&self, waveform: &Waveform) -> Result<Vec<char>> {
        let rate = waveform.sample_rate();
        self.segments(waveform)
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let samples = pcm16_to_f32(&waveform.samples()[segment.start..segment.end]);
                self.demodulator.demodulate_segment(&samples, rate, index)
            })
            .collect()
    }

    pub fn decode(&self, waveform: &Waveform) -> Result<String> {
        let symbols = self.decode_symbols(waveform)?;
        Ok(assemble_symbols(&symbols))
    }
}

impl Default for DecoderDtmf {
    fn default() -> Self {
        Self::new()
    }
}
