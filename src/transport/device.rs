//! `rodio`-backed transport.
//!
//! Decoding happens on short-lived loader threads and a ticker thread polls
//! the active sink for position and end-of-media. Both only talk back
//! through the event channel; the shared [`Slot`] is the single place that
//! says which load is current.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::dsp::FilterChain;
use crate::player::{MediaLocator, TrackId};

use super::sink::open_sink_at;
use super::types::{Transport, TransportError, TransportEvent};

/// The parts of a `rodio::Sink` the slot drives.
pub(super) trait SinkHandle {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, volume: f32);
    fn is_drained(&self) -> bool;
    fn position(&self) -> Duration;
    fn seek_to(&self, position: Duration) -> bool;
}

impl SinkHandle for Sink {
    fn play(&self) {
        Sink::play(self)
    }

    fn pause(&self) {
        Sink::pause(self)
    }

    fn stop(&self) {
        Sink::stop(self)
    }

    fn set_volume(&self, volume: f32) {
        Sink::set_volume(self, volume)
    }

    fn is_drained(&self) -> bool {
        self.empty()
    }

    fn position(&self) -> Duration {
        self.get_pos()
    }

    fn seek_to(&self, position: Duration) -> bool {
        self.try_seek(position).is_ok()
    }
}

/// State shared between the control side, loaders and the ticker.
pub(super) struct Slot<K = Sink> {
    /// Bumped on every load or rebuild; loaders whose generation no longer
    /// matches throw their sink away.
    pub generation: u64,
    pub track: Option<TrackId>,
    path: Option<PathBuf>,
    pub sink: Option<K>,
    pub duration: Option<Duration>,
    /// Media position where the current sink's clock starts.
    pub offset: Duration,
    pub want_play: bool,
    pub ended_sent: bool,
    /// The current track's last load failed; nothing can play until the
    /// next load.
    pub failed: bool,
    volume: f32,
}

impl<K> Slot<K> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            track: None,
            path: None,
            sink: None,
            duration: None,
            offset: Duration::ZERO,
            want_play: false,
            ended_sent: false,
            failed: false,
            volume: 1.0,
        }
    }
}

impl<K: SinkHandle> Slot<K> {
    /// Start a new load of `track`, dropping whatever was playing.
    pub fn begin_load(&mut self, track: &TrackId, path: Option<PathBuf>) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.track = Some(track.clone());
        self.failed = path.is_none();
        self.path = path;
        self.duration = None;
        self.want_play = false;
    }

    /// Check that a sink can start. Records the intent so a sink still being
    /// decoded starts once installed.
    pub fn request_play(&mut self) -> Result<(), TransportError> {
        let Some(track) = &self.track else {
            return Err(TransportError::NothingLoaded);
        };
        if self.failed {
            return Err(TransportError::LoadFailed(track.clone()));
        }
        self.want_play = true;
        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    /// Settle the loader run tagged `generation`. Returns the event to emit,
    /// or `None` when a newer load superseded it.
    pub fn complete_load(
        &mut self,
        generation: u64,
        track: TrackId,
        opened: Result<(K, Option<Duration>), TransportError>,
    ) -> Option<TransportEvent> {
        if self.generation != generation {
            log::debug!("dropping superseded load of {track}");
            if let Ok((sink, _)) = opened {
                sink.stop();
            }
            return None;
        }

        match opened {
            Ok((sink, duration)) => {
                if self.want_play {
                    sink.play();
                }
                if duration.is_some() {
                    self.duration = duration;
                }
                self.sink = Some(sink);
                self.failed = false;
                Some(TransportEvent::Ready {
                    track,
                    duration: self.duration,
                })
            }
            Err(e) => {
                log::warn!("cannot load {track}: {e}");
                self.failed = true;
                self.want_play = false;
                Some(TransportEvent::Failed {
                    track,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// What the ticker reports for the current sink, if anything.
    pub fn tick(&mut self) -> Option<TransportEvent> {
        if !self.want_play {
            return None;
        }
        let (Some(track), Some(sink)) = (self.track.clone(), self.sink.as_ref()) else {
            return None;
        };
        if sink.is_drained() {
            if self.ended_sent {
                return None;
            }
            self.ended_sent = true;
            Some(TransportEvent::Ended { track })
        } else {
            Some(TransportEvent::Tick {
                track,
                position: self.offset + sink.position(),
            })
        }
    }
}

struct LoadJob {
    generation: u64,
    track: TrackId,
    path: PathBuf,
    start_at: Duration,
    mixer: Mixer,
    chain: Option<Arc<FilterChain>>,
    volume: f32,
}

pub struct RodioTransport {
    events: Sender<TransportEvent>,
    stream: Option<OutputStream>,
    chain: Option<Arc<FilterChain>>,
    slot: Arc<Mutex<Slot<Sink>>>,
    shutdown: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl RodioTransport {
    /// Create the transport. The output device is opened lazily on the first
    /// context request or load.
    pub fn new(events: Sender<TransportEvent>, tick_interval: Duration) -> Self {
        let slot = Arc::new(Mutex::new(Slot::new()));
        let shutdown = Arc::new(AtomicBool::new(false));
        let ticker = spawn_ticker(slot.clone(), events.clone(), shutdown.clone(), tick_interval);

        Self {
            events,
            stream: None,
            chain: None,
            slot,
            shutdown,
            ticker: Some(ticker),
        }
    }

    fn mixer(&mut self) -> Result<Mixer, TransportError> {
        if self.stream.is_none() {
            let mut stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| TransportError::Device(e.to_string()))?;
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a terminal app.
            stream.log_on_drop(false);
            log::info!("opened default audio output");
            self.stream = Some(stream);
        }
        match &self.stream {
            Some(stream) => Ok(stream.mixer().clone()),
            None => Err(TransportError::Device("output stream missing".into())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<Sink>> {
        // A panicking loader must not take playback down with it.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fail(&self, track: &TrackId, err: TransportError) {
        log::warn!("cannot load {track}: {err}");
        self.lock().failed = true;
        let _ = self.events.send(TransportEvent::Failed {
            track: track.clone(),
            reason: err.to_string(),
        });
    }

    /// Replace the current sink with a fresh one starting at `start_at`.
    fn rebuild(&mut self, start_at: Duration) {
        let mixer = match self.mixer() {
            Ok(m) => m,
            Err(e) => {
                let track = self.lock().track.clone();
                if let Some(track) = track {
                    self.fail(&track, e);
                }
                return;
            }
        };
        let chain = self.chain.clone();
        let mut slot = self.lock();
        let (Some(track), Some(path)) = (slot.track.clone(), slot.path.clone()) else {
            return;
        };
        slot.generation += 1;
        if let Some(old) = slot.sink.take() {
            old.stop();
        }
        slot.offset = start_at;
        slot.ended_sent = false;
        let job = LoadJob {
            generation: slot.generation,
            track,
            path,
            start_at,
            mixer,
            chain,
            volume: slot.volume,
        };
        drop(slot);
        spawn_loader(job, self.slot.clone(), self.events.clone());
    }
}

impl Transport for RodioTransport {
    fn create_context(&mut self) -> Result<(), TransportError> {
        self.mixer().map(|_| ())
    }

    fn context_suspended(&self) -> bool {
        // cpal keeps the stream running for the lifetime of OutputStream.
        false
    }

    fn resume_context(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn attach_chain(&mut self, chain: Arc<FilterChain>) {
        self.chain = Some(chain);
    }

    fn load(&mut self, track: &TrackId, locator: &MediaLocator) {
        let path = locator.to_path();
        let supported = path.is_some();
        self.lock().begin_load(track, path);
        if !supported {
            self.fail(track, TransportError::UnsupportedLocator(locator.to_string()));
            return;
        }
        self.rebuild(Duration::ZERO);
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.lock().request_play()
    }

    fn pause(&mut self) {
        let mut slot = self.lock();
        slot.want_play = false;
        if let Some(sink) = &slot.sink {
            SinkHandle::pause(sink);
        }
    }

    fn seek(&mut self, position: Duration) {
        {
            let mut slot = self.lock();
            if slot.track.is_none() {
                return;
            }
            if let Some(sink) = &slot.sink {
                if !sink.is_drained() && sink.seek_to(position) {
                    slot.offset = Duration::ZERO;
                    slot.ended_sent = false;
                    return;
                }
            }
        }
        // Finished or non-seekable media: reopen it at the target.
        self.rebuild(position);
    }

    fn duration(&self) -> Option<Duration> {
        self.lock().duration
    }

    fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        let mut slot = self.lock();
        slot.volume = volume;
        if let Some(sink) = &slot.sink {
            SinkHandle::set_volume(sink, volume);
        }
    }
}

impl Drop for RodioTransport {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(sink) = self.lock().sink.take() {
            sink.stop();
        }
        if let Some(h) = self.ticker.take() {
            let _ = h.join();
        }
    }
}

fn spawn_loader(job: LoadJob, slot: Arc<Mutex<Slot<Sink>>>, events: Sender<TransportEvent>) {
    thread::spawn(move || {
        let opened = open_sink_at(&job.mixer, &job.path, job.start_at, job.chain, job.volume)
            .map(|o| (o.sink, o.duration));

        let event = {
            let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
            slot.complete_load(job.generation, job.track, opened)
        };
        if let Some(event) = event {
            let _ = events.send(event);
        }
    });
}

fn spawn_ticker(
    slot: Arc<Mutex<Slot<Sink>>>,
    events: Sender<TransportEvent>,
    shutdown: Arc<AtomicBool>,
    interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.load(Ordering::Relaxed) {
            thread::sleep(interval);

            let event = slot.lock().unwrap_or_else(|e| e.into_inner()).tick();
            let Some(event) = event else {
                continue;
            };
            if events.send(event).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests;
