use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::config;
use crate::engine::Engine;
use crate::library::{display_label, scan};
use crate::player::{MachineOptions, PlaybackMachine, RandomPicker, Track};
use crate::settings::FileStore;
use crate::transport::RodioTransport;

pub type AppEngine = Engine<RodioTransport, FileStore>;

/// Store holding this namespace's preferences.
pub fn preferences_store(storage: &config::StorageSettings) -> FileStore {
    let dir = storage.namespace_dir().unwrap_or_else(|| {
        log::warn!("no data directory available, keeping preferences in ./{}", storage.namespace);
        PathBuf::from(&storage.namespace)
    });
    log::debug!("preferences stored under {}", dir.display());
    FileStore::new(dir)
}

pub fn machine_options(playback: &config::PlaybackSettings) -> MachineOptions {
    MachineOptions {
        restart_threshold: playback.restart_threshold(),
        fallback_duration: playback.fallback_duration(),
    }
}

/// Scan `dir` and return the tracks with their listing labels.
pub fn load_catalog(dir: &Path, library: &config::LibrarySettings) -> (Vec<Track>, Vec<String>) {
    let tracks = scan(dir, library);
    let labels = tracks
        .iter()
        .map(|t| display_label(t, &library.display_fields, &library.display_separator))
        .collect();
    (tracks, labels)
}

pub fn build_engine(settings: &config::Settings, tracks: Vec<Track>) -> AppEngine {
    let (tx, rx) = mpsc::channel();
    let transport = RodioTransport::new(tx, settings.playback.tick_interval());
    let machine = PlaybackMachine::new(Box::new(RandomPicker), machine_options(&settings.playback));

    let mut engine = Engine::new(machine, transport, rx, preferences_store(&settings.storage));
    engine.set_queue(tracks);
    engine
}
