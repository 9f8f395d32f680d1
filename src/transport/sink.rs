//! Opening tracks into paused `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use crate::dsp::{EqSource, FilterChain};

use super::types::TransportError;

/// A paused sink plus what the decoder knows about the media.
pub(super) struct OpenedSink {
    pub sink: Sink,
    pub duration: Option<Duration>,
}

/// Decode `path` into a paused `Sink` on `mixer`, starting at `start_at` and
/// routed through `chain` when one is given.
pub(super) fn open_sink_at(
    mixer: &Mixer,
    path: &Path,
    start_at: Duration,
    chain: Option<Arc<FilterChain>>,
    volume: f32,
) -> Result<OpenedSink, TransportError> {
    let file = File::open(path).map_err(|source| TransportError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| TransportError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let duration = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(mixer);
    match chain {
        Some(chain) => sink.append(EqSource::new(source, chain)),
        None => sink.append(source),
    }
    sink.pause();
    sink.set_volume(volume);
    Ok(OpenedSink { sink, duration })
}
