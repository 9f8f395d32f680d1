//! Recording transport for engine and graph tests.

use std::sync::Arc;
use std::time::Duration;

use crate::dsp::FilterChain;
use crate::player::{MediaLocator, TrackId};

use super::types::{Transport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateContext,
    Resume,
    Attach,
    Load(TrackId),
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

#[derive(Default)]
pub(crate) struct MockTransport {
    pub calls: Vec<Call>,
    pub fail_context: bool,
    pub suspended: bool,
    pub fail_play: bool,
    /// The current track's load was reported failed; cleared by the next load.
    pub load_failed: bool,
    pub chain: Option<Arc<FilterChain>>,
    pub volume: Option<f32>,
    pub loaded: Option<TrackId>,
    pub duration: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_context() -> Self {
        Self {
            fail_context: true,
            ..Self::default()
        }
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn loads(&self) -> Vec<TrackId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Transport for MockTransport {
    fn create_context(&mut self) -> Result<(), TransportError> {
        self.calls.push(Call::CreateContext);
        if self.fail_context {
            return Err(TransportError::Device("refused".into()));
        }
        Ok(())
    }

    fn context_suspended(&self) -> bool {
        self.suspended
    }

    fn resume_context(&mut self) -> Result<(), TransportError> {
        self.calls.push(Call::Resume);
        self.suspended = false;
        Ok(())
    }

    fn attach_chain(&mut self, chain: Arc<FilterChain>) {
        self.calls.push(Call::Attach);
        self.chain = Some(chain);
    }

    fn load(&mut self, track: &TrackId, _locator: &MediaLocator) {
        self.calls.push(Call::Load(track.clone()));
        self.loaded = Some(track.clone());
        self.load_failed = false;
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.calls.push(Call::Play);
        if self.fail_play {
            return Err(TransportError::Device("blocked".into()));
        }
        match &self.loaded {
            None => Err(TransportError::NothingLoaded),
            Some(track) if self.load_failed => Err(TransportError::LoadFailed(track.clone())),
            Some(_) => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls.push(Call::Seek(position));
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
        self.volume = Some(volume);
    }
}
