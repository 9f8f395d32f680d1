//! Transport contract shared by the real device and test doubles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::dsp::FilterChain;
use crate::player::{MediaLocator, TrackId};

/// Notifications emitted by a transport. Every event names the track whose
/// load produced it so receivers can drop ones from superseded loads.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The media became playable; `duration` is the decoder's value if known.
    Ready {
        track: TrackId,
        duration: Option<Duration>,
    },
    /// The media could not be opened or decoded.
    Failed { track: TrackId, reason: String },
    /// Playback clock update.
    Tick { track: TrackId, position: Duration },
    /// Emitted once when the media runs out.
    Ended { track: TrackId },
}

impl TransportEvent {
    pub fn track(&self) -> &TrackId {
        match self {
            TransportEvent::Ready { track, .. }
            | TransportEvent::Failed { track, .. }
            | TransportEvent::Tick { track, .. }
            | TransportEvent::Ended { track } => track,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("audio output unavailable: {0}")]
    Device(String),
    #[error("unsupported media locator {0}")]
    UnsupportedLocator(String),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("nothing is loaded")]
    NothingLoaded,
    #[error("{0} could not be loaded")]
    LoadFailed(TrackId),
}

/// Commands accepted by a media transport.
///
/// Loads are asynchronous: `load` returns immediately and the outcome
/// arrives later as [`TransportEvent::Ready`] or [`TransportEvent::Failed`].
/// `play` before the media is ready records the intent and starts playback
/// once it is.
pub trait Transport {
    /// Acquire the processing context filter chains run inside. Fails when
    /// the platform refuses audio processing.
    fn create_context(&mut self) -> Result<(), TransportError>;

    fn context_suspended(&self) -> bool;

    fn resume_context(&mut self) -> Result<(), TransportError>;

    /// Route every source loaded from now on through `chain`.
    fn attach_chain(&mut self, chain: Arc<FilterChain>);

    fn load(&mut self, track: &TrackId, locator: &MediaLocator);

    fn play(&mut self) -> Result<(), TransportError>;

    fn pause(&mut self);

    fn seek(&mut self, position: Duration);

    /// Duration of the loaded media once known.
    fn duration(&self) -> Option<Duration>;

    /// Element-level volume, used when no filter chain is attached.
    fn set_volume(&mut self, volume: f32);
}
