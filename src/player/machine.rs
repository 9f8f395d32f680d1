use std::time::Duration;

use super::picker::{IndexPicker, RandomPicker};
use super::types::{Effect, Effects, FALLBACK_DURATION, Mood, Phase, Track, TrackId};

/// Position past which `prev` restarts the current track instead of
/// stepping back.
pub const DEFAULT_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Snapshot of everything the UI may observe about playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current: Option<Track>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Duration,
    pub shuffle: bool,
    pub repeat: bool,
    /// A load was requested and has not been confirmed or rejected yet.
    pub loading: bool,
    pub mood: Mood,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: None,
            playing: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            shuffle: false,
            repeat: false,
            loading: false,
            mood: Mood::default(),
        }
    }
}

impl PlaybackState {
    pub fn phase(&self) -> Phase {
        match (&self.current, self.playing) {
            (None, _) => Phase::Idle,
            (Some(_), true) => Phase::Playing,
            (Some(_), false) => Phase::Paused,
        }
    }

    pub fn current_id(&self) -> Option<&TrackId> {
        self.current.as_ref().map(|t| &t.id)
    }

    /// Elapsed fraction of the track in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MachineOptions {
    pub restart_threshold: Duration,
    /// Used when a track reports a zero duration.
    pub fallback_duration: Duration,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
            fallback_duration: FALLBACK_DURATION,
        }
    }
}

/// The single writer of [`PlaybackState`].
pub struct PlaybackMachine {
    state: PlaybackState,
    queue: Vec<Track>,
    picker: Box<dyn IndexPicker>,
    options: MachineOptions,
}

impl Default for PlaybackMachine {
    fn default() -> Self {
        Self::new(Box::new(RandomPicker), MachineOptions::default())
    }
}

impl PlaybackMachine {
    pub fn new(picker: Box<dyn IndexPicker>, options: MachineOptions) -> Self {
        Self {
            state: PlaybackState::default(),
            queue: Vec::new(),
            picker,
            options,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn current(&self) -> Option<&Track> {
        self.state.current.as_ref()
    }

    /// Queue position of the current track. Duplicate ids resolve to the
    /// first match.
    pub fn current_index(&self) -> Option<usize> {
        let id = self.state.current_id()?;
        self.queue.iter().position(|t| &t.id == id)
    }

    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        self.queue = tracks;
    }

    /// Make `track` current and start it.
    pub fn select_track(&mut self, track: Track) -> Effects {
        self.state.playing = true;
        self.switch_to(track, true)
    }

    pub fn play(&mut self) -> Effects {
        if self.state.current.is_none() || self.state.playing {
            return Vec::new();
        }
        self.state.playing = true;
        vec![Effect::Play]
    }

    pub fn pause(&mut self) -> Effects {
        if self.state.current.is_none() || !self.state.playing {
            return Vec::new();
        }
        self.state.playing = false;
        vec![Effect::Pause]
    }

    pub fn toggle_play(&mut self) -> Effects {
        if self.state.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Advance in the queue, wrapping from last to first. With shuffle on the
    /// next position is drawn at random and may be the current one.
    pub fn next(&mut self) -> Effects {
        if self.state.current.is_none() || self.queue.is_empty() {
            return Vec::new();
        }
        let len = self.queue.len();
        let index = if self.state.shuffle {
            self.picker.pick(len).min(len - 1)
        } else {
            match self.current_index() {
                Some(i) => (i + 1) % len,
                // Current track came from outside the queue: start at the top.
                None => 0,
            }
        };
        let track = self.queue[index].clone();
        self.switch_to(track, false)
    }

    /// Restart the current track when past the restart threshold, otherwise
    /// step back, wrapping from first to last.
    pub fn prev(&mut self) -> Effects {
        if self.state.current.is_none() || self.queue.is_empty() {
            return Vec::new();
        }
        if self.state.position > self.options.restart_threshold {
            return self.restart();
        }
        let len = self.queue.len();
        let index = match self.current_index() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        let track = self.queue[index].clone();
        self.switch_to(track, false)
    }

    /// Jump to `position`. Callers clamp against the duration.
    pub fn seek(&mut self, position: Duration) -> Effects {
        if self.state.current.is_none() {
            return Vec::new();
        }
        self.state.position = position;
        vec![Effect::Seek(position)]
    }

    /// Seek to `fraction` (clamped to `[0, 1]`) of the current duration.
    pub fn seek_fraction(&mut self, fraction: f64) -> Effects {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = self.state.duration.mul_f64(fraction);
        self.seek(target)
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.state.shuffle = on;
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.state.repeat = on;
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.state.shuffle = !self.state.shuffle;
        self.state.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.state.repeat = !self.state.repeat;
        self.state.repeat
    }

    /// Position reported by the transport clock.
    pub fn on_transport_tick(&mut self, position: Duration) {
        if self.state.current.is_some() {
            self.state.position = position;
        }
    }

    /// The current media reached its end.
    pub fn on_transport_ended(&mut self) -> Effects {
        if self.state.current.is_none() {
            return Vec::new();
        }
        if self.state.repeat {
            self.state.playing = true;
            let mut effects = self.restart();
            effects.push(Effect::Play);
            return effects;
        }
        let effects = self.next();
        if effects.is_empty() {
            // Nothing to advance to; the transport has gone quiet.
            self.state.playing = false;
            self.state.position = self.state.duration;
        }
        effects
    }

    /// The load for `id` became playable. Returns false for a completion
    /// that belongs to a track which is no longer current.
    pub fn on_media_ready(&mut self, id: &TrackId, duration: Option<Duration>) -> bool {
        if self.state.current_id() != Some(id) {
            log::debug!("ignoring stale load completion for {id}");
            return false;
        }
        self.state.loading = false;
        if let Some(d) = duration.filter(|d| !d.is_zero()) {
            self.state.duration = d;
        }
        true
    }

    /// The load or playback for `id` failed; fall back to paused so the state
    /// never claims audio that is not being produced.
    pub fn on_media_failed(&mut self, id: &TrackId) -> Effects {
        if self.state.current_id() != Some(id) {
            log::debug!("ignoring stale load failure for {id}");
            return Vec::new();
        }
        self.state.loading = false;
        if !self.state.playing {
            return Vec::new();
        }
        self.state.playing = false;
        vec![Effect::Pause]
    }

    fn restart(&mut self) -> Effects {
        self.state.position = Duration::ZERO;
        vec![Effect::Seek(Duration::ZERO)]
    }

    // An explicit selection always reloads; queue stepping onto the track
    // that is already loaded just rewinds it.
    fn switch_to(&mut self, track: Track, reload: bool) -> Effects {
        self.state.position = Duration::ZERO;
        self.state.duration = if track.duration.is_zero() {
            self.options.fallback_duration
        } else {
            track.duration
        };
        self.state.mood = track.mood;
        self.state.loading = track.has_audio();

        let same = self.state.current_id() == Some(&track.id);
        self.state.current = Some(track.clone());
        if same && !reload {
            // Same media stays loaded; just rewind it.
            self.state.loading = false;
            return vec![Effect::Seek(Duration::ZERO)];
        }
        let mut effects = vec![Effect::Load(track)];
        if self.state.playing {
            effects.push(Effect::Play);
        }
        effects
    }
}
