use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tonecodec_core::segment::split_on_silence;
use tonecodec_core::runs::tokenize;
use tonecodec_core::{RunState, SegmenterConfig, TokenizerConfig};

/// Random bursts of alternating-sign energy separated by random silences
fn random_bursts(rng: &mut StdRng, len: usize) -> Vec<i16> {
    let mut samples = Vec::with_capacity(len);
    while samples.len() < len {
        let run = rng.gen_range(1..2000);
        if rng.gen_bool(0.5) {
            let amplitude: i16 = rng.gen_range(100..20_000);
            samples.extend((0..run).map(|i| if i % 2 == 0 { amplitude } else { -amplitude }));
        } else {
            samples.extend(std::iter::repeat(0).take(run));
        }
    }
    samples.truncate(len);
    samples
}

#[test]
fn test_segments_ordered_and_disjoint() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let len = rng.gen_range(0..40_000);
        let samples = random_bursts(&mut rng, len);
        let segments = split_on_silence(&samples, 8000, &SegmenterConfig::default());

        for segment in &segments {
            assert!(segment.start < segment.end, "{:?}", segment);
            assert!(segment.end <= samples.len());
        }
        for pair in segments.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
            assert!(pair[0].start < pair[1].start);
        }
    }
}

#[test]
fn test_segments_ordered_for_random_noise() {
    let mut rng = StdRng::seed_from_u64(99);
    for chunk_size in [1usize, 7, 64, 128, 1000] {
        let samples: Vec<i16> = (0..20_000).map(|_| rng.gen::<i16>()).collect();
        let config = SegmenterConfig {
            chunk_size,
            ..SegmenterConfig::default()
        };
        let segments = split_on_silence(&samples, 44_100, &config);
        for pair in segments.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }
}

#[test]
fn test_runs_partition_waveform() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let len = rng.gen_range(1..40_000);
        let samples = random_bursts(&mut rng, len);
        let runs = tokenize(&samples, 8000, &TokenizerConfig::default());

        let total: usize = runs.iter().map(|r| r.duration).sum();
        assert_eq!(total, samples.len());
        assert!(runs.iter().all(|r| r.duration > 0));
        for pair in runs.windows(2) {
            assert_ne!(pair[0].state, pair[1].state);
        }
    }
}

#[test]
fn test_silence_yields_no_tone_runs() {
    let runs = tokenize(&vec![0; 10_000], 8000, &TokenizerConfig::default());
    assert!(runs.iter().all(|r| r.state == RunState::Silence));
    assert!(split_on_silence(&vec![0; 10_000], 8000, &SegmenterConfig::default()).is_empty());
}
