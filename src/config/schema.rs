use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/monofm/config.toml` or `~/.config/monofm/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MONOFM__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub storage: StorageSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// `prev` restarts the current track instead of going back once more than
    /// this much of it has played (milliseconds).
    pub restart_threshold_ms: u64,
    /// Length assumed for tracks whose metadata carries none (seconds).
    pub fallback_duration_secs: u64,
    /// How often the transport reports the playback position (milliseconds).
    pub tick_interval_ms: u64,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub seek_step_secs: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            restart_threshold_ms: 3000,
            fallback_duration_secs: 180,
            tick_interval_ms: 250,
            seek_step_secs: 5,
            volume_step: 0.05,
        }
    }
}

impl PlaybackSettings {
    pub fn restart_threshold(&self) -> Duration {
        Duration::from_millis(self.restart_threshold_ms)
    }

    pub fn fallback_duration(&self) -> Duration {
        Duration::from_secs(self.fallback_duration_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Name of the store preferences are kept under.
    pub namespace: String,
    /// Base directory for stores. Defaults to `$XDG_DATA_HOME/monofm` or
    /// `~/.local/share/monofm`.
    pub dir: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            namespace: "mono-fm-player".to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    /// Whatever the scanner produced for the track title.
    Display,
    Title,
    Artist,
    Album,
    Filename,
    Path,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,

    /// Which fields to use to build the listing label and its ordering.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub display_fields: Vec<TrackDisplayField>,
    /// Separator used to join `display_fields`.
    pub display_separator: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            display_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            display_separator: " - ".to_string(),
        }
    }
}
