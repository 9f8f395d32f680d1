//! Track values and the small enums describing playback.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Nominal length assumed for tracks whose real duration is unknown.
pub const FALLBACK_DURATION: Duration = Duration::from_secs(180);

/// Stable identity of a track. Queue lookups and stale-load detection
/// compare these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Mood {
    #[default]
    Calm,
    Energetic,
    Melancholy,
    Romantic,
    Dark,
    Uplifting,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Calm,
        Mood::Energetic,
        Mood::Melancholy,
        Mood::Romantic,
        Mood::Dark,
        Mood::Uplifting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Energetic => "energetic",
            Mood::Melancholy => "melancholy",
            Mood::Romantic => "romantic",
            Mood::Dark => "dark",
            Mood::Uplifting => "uplifting",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood {:?}", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMood(wanted.to_string()))
    }
}

/// Where a track's audio can be read from: a filesystem path or a
/// `file://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaLocator(String);

impl MediaLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Local file this locator points to, or `None` for schemes that need a
    /// network fetch.
    pub fn to_path(&self) -> Option<PathBuf> {
        if let Some(rest) = self.0.strip_prefix("file://") {
            return Some(PathBuf::from(rest));
        }
        if self.0.contains("://") {
            return None;
        }
        Some(PathBuf::from(&self.0))
    }
}

impl fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PathBuf> for MediaLocator {
    fn from(p: PathBuf) -> Self {
        Self(p.to_string_lossy().into_owned())
    }
}

/// An immutable track as handed over by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub mood: Mood,
    /// Beats per minute, 0 when unknown.
    pub tempo_bpm: u32,
    pub cover: Option<String>,
    /// `None` means there is no playable audio for this track.
    pub locator: Option<MediaLocator>,
    pub duration: Duration,
}

impl Track {
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            mood: Mood::default(),
            tempo_bpm: 0,
            cover: None,
            locator: None,
            duration: FALLBACK_DURATION,
        }
    }

    pub fn with_locator(mut self, locator: MediaLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_tempo(mut self, bpm: u32) -> Self {
        self.tempo_bpm = bpm;
        self
    }

    pub fn has_audio(&self) -> bool {
        self.locator.is_some()
    }

    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        match self.artist.trim() {
            "" => self.title.clone(),
            a => format!("{} - {}", a, self.title),
        }
    }
}

/// Coarse transport phase derived from [`PlaybackState`](super::PlaybackState).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing has been selected yet.
    #[default]
    Idle,
    Paused,
    Playing,
}

/// Work the engine must perform on the transport after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Swap the source to this track. A following `Play` starts it.
    Load(Track),
    Play,
    Pause,
    Seek(Duration),
}

pub type Effects = Vec<Effect>;
