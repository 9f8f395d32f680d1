use std::sync::Arc;

use rodio::Source;
use rodio::buffer::SamplesBuffer;

use super::*;
use crate::eq::{BAND_COUNT, BAND_FREQUENCIES};

const SR: u32 = 44_100;

fn sine(freq: f32, frames: usize) -> Vec<f32> {
    (0..frames)
        .map(|n| (2.0 * std::f32::consts::PI * freq * n as f32 / SR as f32).sin() * 0.5)
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

#[test]
fn zero_gain_designs_are_transparent() {
    for kind in [FilterKind::LowShelf, FilterKind::Peaking, FilterKind::HighShelf] {
        let c = Coefficients::design(kind, 1000.0, 0.0, kind.default_q(), SR);
        let mut state = BiquadState::default();
        for x in [0.25_f32, -0.5, 0.75, 0.0, 1.0] {
            assert!((state.process(&c, x) - x).abs() < 1e-6, "{kind:?}");
        }
    }
}

#[test]
fn peaking_filter_hits_its_gain_at_center() {
    let c = Coefficients::design(FilterKind::Peaking, 1000.0, 6.0, 1.0, SR);
    assert!((c.magnitude_db_at(1000.0, SR) - 6.0).abs() < 0.05);
    assert!(c.magnitude_db_at(60.0, SR).abs() < 0.5);
}

#[test]
fn shelves_boost_their_own_end_of_the_spectrum() {
    let low = Coefficients::design(FilterKind::LowShelf, 60.0, 12.0, FilterKind::LowShelf.default_q(), SR);
    assert!(low.magnitude_db_at(20.0, SR) > 10.0);
    assert!(low.magnitude_db_at(5000.0, SR).abs() < 0.5);

    let high =
        Coefficients::design(FilterKind::HighShelf, 10000.0, -12.0, FilterKind::HighShelf.default_q(), SR);
    assert!(high.magnitude_db_at(18000.0, SR) < -10.0);
    assert!(high.magnitude_db_at(100.0, SR).abs() < 0.5);
}

#[test]
fn chain_layout_is_shelf_peaks_shelf() {
    let chain = FilterChain::new([0.0; BAND_COUNT], 1.0);
    let bands = chain.bands();
    assert_eq!(bands[0].kind(), FilterKind::LowShelf);
    assert_eq!(bands[BAND_COUNT - 1].kind(), FilterKind::HighShelf);
    for band in &bands[1..BAND_COUNT - 1] {
        assert_eq!(band.kind(), FilterKind::Peaking);
        assert_eq!(band.q(), 1.0);
    }
    for (band, freq) in bands.iter().zip(BAND_FREQUENCIES) {
        assert_eq!(band.frequency(), freq as f32);
    }
}

#[test]
fn chain_revision_moves_only_on_change() {
    let chain = FilterChain::new([0.0; BAND_COUNT], 0.7);
    let r0 = chain.revision();
    assert!(chain.set_band_gain(2, 3.0));
    let r1 = chain.revision();
    assert!(r1 > r0);
    chain.set_band_gain(2, 3.0);
    assert_eq!(chain.revision(), r1);
    assert!(!chain.set_band_gain(BAND_COUNT, 1.0));

    chain.set_master_gain(2.0);
    assert_eq!(chain.master_gain(), 1.0);
    assert!(chain.revision() > r1);
}

#[test]
fn flat_source_only_applies_master_gain() {
    let input = vec![0.5_f32, -0.5, 0.25, -0.25, 1.0, -1.0];
    let chain = Arc::new(FilterChain::new([0.0; BAND_COUNT], 0.5));
    let source = EqSource::new(SamplesBuffer::new(2, SR, input.clone()), chain);
    assert_eq!(source.channels(), 2);
    assert_eq!(source.sample_rate(), SR);

    let out: Vec<f32> = source.collect();
    let expected: Vec<f32> = input.iter().map(|s| s * 0.5).collect();
    assert_eq!(out, expected);
}

#[test]
fn live_gain_change_reaches_running_source() {
    let chain = Arc::new(FilterChain::new([0.0; BAND_COUNT], 1.0));
    let mut source = EqSource::new(SamplesBuffer::new(1, SR, sine(1000.0, 8820)), chain.clone());

    let before: Vec<f32> = source.by_ref().take(4410).collect();
    chain.set_band_gain(3, 12.0);
    let after: Vec<f32> = source.collect();

    // Skip the filter's settling time before comparing levels.
    let boost = rms(&after[1000..]) / rms(&before[1000..]);
    assert!(boost > 3.0, "boost ratio {boost}");
}

#[test]
fn reenabled_band_starts_from_silence() {
    let mut input = sine(1000.0, 1000);
    input.extend([0.0; 1000]);
    let chain = Arc::new(FilterChain::new([0.0, 0.0, 0.0, 12.0, 0.0, 0.0], 1.0));
    let mut source = EqSource::new(SamplesBuffer::new(1, SR, input), chain.clone());

    let ringing: Vec<f32> = source.by_ref().take(1000).collect();
    assert!(rms(&ringing) > 0.0);

    chain.set_band_gain(3, 0.0);
    let bypassed: Vec<f32> = source.by_ref().take(10).collect();
    assert!(bypassed.iter().all(|s| *s == 0.0));

    chain.set_band_gain(3, 12.0);
    let resumed: Vec<f32> = source.collect();
    assert_eq!(resumed.len(), 990);
    assert!(resumed.iter().all(|s| *s == 0.0), "stale filter state leaked into silence");
}
