use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::eq::{BAND_COUNT, BAND_FREQUENCIES};

use super::biquad::FilterKind;

/// Filter shape for the band at `index`: low shelf at the bottom, high shelf
/// at the top, peaking in between.
pub fn band_kind(index: usize) -> FilterKind {
    match index {
        0 => FilterKind::LowShelf,
        i if i + 1 == BAND_COUNT => FilterKind::HighShelf,
        _ => FilterKind::Peaking,
    }
}

/// One filter node. Shape, frequency and Q are fixed; gain is live.
#[derive(Debug)]
pub struct BandNode {
    kind: FilterKind,
    frequency: f32,
    q: f32,
    gain_db: AtomicU32,
}

impl BandNode {
    fn new(index: usize, gain_db: f32) -> Self {
        let kind = band_kind(index);
        Self {
            kind,
            frequency: BAND_FREQUENCIES[index] as f32,
            q: kind.default_q(),
            gain_db: AtomicU32::new(gain_db.to_bits()),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn gain_db(&self) -> f32 {
        f32::from_bits(self.gain_db.load(Ordering::Relaxed))
    }
}

/// Live parameters of the processing chain, shared with the audio callback.
///
/// Writers bump `revision` after changing any value; readers redesign their
/// coefficients when they observe a new revision.
#[derive(Debug)]
pub struct FilterChain {
    bands: [BandNode; BAND_COUNT],
    master: AtomicU32,
    revision: AtomicU64,
}

impl FilterChain {
    pub fn new(gains_db: [f32; BAND_COUNT], master_gain: f32) -> Self {
        Self {
            bands: std::array::from_fn(|i| BandNode::new(i, gains_db[i])),
            master: AtomicU32::new(master_gain.clamp(0.0, 1.0).to_bits()),
            revision: AtomicU64::new(0),
        }
    }

    pub fn bands(&self) -> &[BandNode; BAND_COUNT] {
        &self.bands
    }

    pub fn band_gains(&self) -> [f32; BAND_COUNT] {
        std::array::from_fn(|i| self.bands[i].gain_db())
    }

    /// Set the live gain of band `index`. Returns false for an index outside
    /// the chain.
    pub fn set_band_gain(&self, index: usize, gain_db: f32) -> bool {
        let Some(band) = self.bands.get(index) else {
            return false;
        };
        let old = band.gain_db.swap(gain_db.to_bits(), Ordering::Relaxed);
        if old != gain_db.to_bits() {
            self.revision.fetch_add(1, Ordering::Release);
        }
        true
    }

    pub fn master_gain(&self) -> f32 {
        f32::from_bits(self.master.load(Ordering::Relaxed))
    }

    pub fn set_master_gain(&self, gain: f32) {
        let gain = gain.clamp(0.0, 1.0);
        let old = self.master.swap(gain.to_bits(), Ordering::Relaxed);
        if old != gain.to_bits() {
            self.revision.fetch_add(1, Ordering::Release);
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}
