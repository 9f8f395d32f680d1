use std::sync::Arc;
use std::time::Duration;

use rodio::Source;
use rodio::source::SeekError;

use crate::eq::BAND_COUNT;

use super::biquad::{BiquadState, Coefficients};
use super::chain::FilterChain;

/// Wraps a decoded source with the equalizer bands and master gain.
///
/// Parameters are read from the shared [`FilterChain`] at frame boundaries,
/// so gain changes take effect without rebuilding the source.
pub struct EqSource<S> {
    inner: S,
    chain: Arc<FilterChain>,
    coefficients: [Coefficients; BAND_COUNT],
    bypass: [bool; BAND_COUNT],
    states: Vec<[BiquadState; BAND_COUNT]>,
    master: f32,
    channels: u16,
    sample_rate: u32,
    channel: usize,
    seen_revision: u64,
}

impl<S> EqSource<S>
where
    S: Source,
{
    pub fn new(inner: S, chain: Arc<FilterChain>) -> Self {
        let channels = inner.channels().max(1);
        let sample_rate = inner.sample_rate();
        let mut source = Self {
            inner,
            chain,
            coefficients: [Coefficients::identity(); BAND_COUNT],
            bypass: [true; BAND_COUNT],
            states: vec![[BiquadState::default(); BAND_COUNT]; channels as usize],
            master: 1.0,
            channels,
            sample_rate,
            channel: 0,
            seen_revision: 0,
        };
        source.redesign();
        source
    }

    fn redesign(&mut self) {
        self.seen_revision = self.chain.revision();
        for (i, band) in self.chain.bands().iter().enumerate() {
            let gain = band.gain_db();
            let was_bypassed = self.bypass[i];
            self.bypass[i] = gain == 0.0;
            // A band coming back must not replay history from before it was bypassed.
            if was_bypassed && !self.bypass[i] {
                for bands in &mut self.states {
                    bands[i].reset();
                }
            }
            self.coefficients[i] =
                Coefficients::design(band.kind(), band.frequency(), gain, band.q(), self.sample_rate);
        }
        self.master = self.chain.master_gain();
    }

    // Called at the start of every frame.
    fn refresh(&mut self) {
        let channels = self.inner.channels().max(1);
        let sample_rate = self.inner.sample_rate();
        if channels != self.channels || sample_rate != self.sample_rate {
            self.channels = channels;
            self.sample_rate = sample_rate;
            self.states = vec![[BiquadState::default(); BAND_COUNT]; channels as usize];
            self.redesign();
        } else if self.chain.revision() != self.seen_revision {
            self.redesign();
        }
    }

    fn reset_states(&mut self) {
        for bands in &mut self.states {
            for state in bands.iter_mut() {
                state.reset();
            }
        }
        self.channel = 0;
    }
}

impl<S> Iterator for EqSource<S>
where
    S: Source,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        if self.channel == 0 {
            self.refresh();
        }

        let mut y = sample;
        let states = &mut self.states[self.channel];
        for i in 0..BAND_COUNT {
            if !self.bypass[i] {
                y = states[i].process(&self.coefficients[i], y);
            }
        }

        self.channel = (self.channel + 1) % self.channels as usize;
        Some(y * self.master)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> Source for EqSource<S>
where
    S: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.inner.try_seek(pos)?;
        self.reset_states();
        Ok(())
    }
}
