//! The single owner of playback state.
//!
//! [`Engine`] forwards intents to the [`PlaybackMachine`], performs the
//! effects it returns on the [`SignalGraph`] and [`Transport`], feeds
//! transport events back in, and persists preferences after they change.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crate::eq::{self, EqSettings};
use crate::graph::{GraphStatus, SignalGraph};
use crate::player::{Effect, Effects, PlaybackMachine, PlaybackState, Track, TrackId};
use crate::settings::{KeyValueStore, Preferences, SettingsPersistence};
use crate::transport::{Transport, TransportEvent};

pub struct Engine<T, S> {
    machine: PlaybackMachine,
    graph: SignalGraph,
    transport: T,
    persistence: SettingsPersistence<S>,
    events: Receiver<TransportEvent>,
    volume: f32,
    eq: EqSettings,
    eq_enabled: bool,
}

impl<T: Transport, S: KeyValueStore> Engine<T, S> {
    /// Restore preferences from `store` and wire up the collaborators.
    /// `events` must be the receiving end of the channel `transport` sends on.
    pub fn new(
        mut machine: PlaybackMachine,
        mut transport: T,
        events: Receiver<TransportEvent>,
        store: S,
    ) -> Self {
        let persistence = SettingsPersistence::new(store);
        let prefs = persistence.load();
        log::debug!(
            "restored preferences: volume {:.2}, shuffle {}, repeat {}, eq {} ({})",
            prefs.volume,
            prefs.shuffle,
            prefs.repeat,
            prefs.eq,
            if prefs.eq_enabled { "on" } else { "off" },
        );

        machine.set_shuffle(prefs.shuffle);
        machine.set_repeat(prefs.repeat);

        let graph = SignalGraph::new();
        graph.set_master_gain(&mut transport, prefs.volume);

        Self {
            machine,
            graph,
            transport,
            persistence,
            events,
            volume: prefs.volume,
            eq: prefs.eq,
            eq_enabled: prefs.eq_enabled,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.machine.state()
    }

    pub fn queue(&self) -> &[Track] {
        self.machine.queue()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.machine.current_index()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn eq(&self) -> &EqSettings {
        &self.eq
    }

    pub fn eq_enabled(&self) -> bool {
        self.eq_enabled
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    pub fn graph_status(&self) -> GraphStatus {
        self.graph.status()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn persistence(&self) -> &SettingsPersistence<S> {
        &self.persistence
    }

    pub fn preferences(&self) -> Preferences {
        let state = self.machine.state();
        Preferences {
            volume: self.volume,
            shuffle: state.shuffle,
            repeat: state.repeat,
            eq_enabled: self.eq_enabled,
            eq: self.eq,
        }
    }

    // ---- playback intents ----

    pub fn set_queue(&mut self, tracks: Vec<Track>) {
        self.machine.set_queue(tracks);
    }

    pub fn select_track(&mut self, track: Track) {
        let fx = self.machine.select_track(track);
        self.apply(fx);
    }

    /// Select the queue entry at `index`; out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) {
        if let Some(track) = self.machine.queue().get(index).cloned() {
            self.select_track(track);
        }
    }

    pub fn play(&mut self) {
        let fx = self.machine.play();
        self.apply(fx);
    }

    pub fn pause(&mut self) {
        let fx = self.machine.pause();
        self.apply(fx);
    }

    pub fn toggle_play(&mut self) {
        let fx = self.machine.toggle_play();
        self.apply(fx);
    }

    pub fn next(&mut self) {
        let fx = self.machine.next();
        self.apply(fx);
    }

    pub fn prev(&mut self) {
        let fx = self.machine.prev();
        self.apply(fx);
    }

    /// Seek to `position`, clamped to the current duration.
    pub fn seek(&mut self, position: Duration) {
        let target = position.min(self.machine.state().duration);
        let fx = self.machine.seek(target);
        self.apply(fx);
    }

    /// Move the playhead by `step`, backwards when `forward` is false.
    pub fn seek_by(&mut self, step: Duration, forward: bool) {
        let pos = self.machine.state().position;
        let target = if forward {
            pos.saturating_add(step)
        } else {
            pos.saturating_sub(step)
        };
        self.seek(target);
    }

    pub fn seek_fraction(&mut self, fraction: f64) {
        let fx = self.machine.seek_fraction(fraction);
        self.apply(fx);
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.machine.set_shuffle(on);
        self.persist();
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        let on = self.machine.toggle_shuffle();
        self.persist();
        on
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.machine.set_repeat(on);
        self.persist();
    }

    pub fn toggle_repeat(&mut self) -> bool {
        let on = self.machine.toggle_repeat();
        self.persist();
        on
    }

    // ---- volume & equalizer ----

    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() {
            self.volume
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume = volume;
        self.graph.set_master_gain(&mut self.transport, volume);
        self.persist();
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    pub fn set_eq_band(&mut self, frequency: u32, gain_db: i32) {
        let next = eq::set_band(&self.eq, frequency, gain_db);
        if next == self.eq {
            return;
        }
        self.update_eq(next);
    }

    pub fn apply_preset(&mut self, name: &str) {
        self.update_eq(eq::apply_preset(name));
    }

    pub fn set_eq_enabled(&mut self, enabled: bool) {
        self.eq_enabled = enabled;
        self.graph.update_band_gains(&self.eq, enabled);
        self.persist();
    }

    pub fn toggle_eq(&mut self) -> bool {
        self.set_eq_enabled(!self.eq_enabled);
        self.eq_enabled
    }

    fn update_eq(&mut self, settings: EqSettings) {
        self.eq = settings;
        self.graph.update_band_gains(&self.eq, self.eq_enabled);
        self.persist();
    }

    fn persist(&mut self) {
        let prefs = self.preferences();
        self.persistence.save(&prefs);
    }

    // ---- transport feedback ----

    /// Drain every queued transport event. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(ev) => {
                    self.handle_event(ev);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("transport event channel closed");
                    break;
                }
            }
        }
        handled
    }

    /// Apply one transport notification. Events produced by a load other
    /// than the current track's are dropped.
    pub fn handle_event(&mut self, event: TransportEvent) {
        if self.machine.state().current_id() != Some(event.track()) {
            log::debug!("dropping stale transport event for {}", event.track());
            return;
        }

        match event {
            TransportEvent::Ready { track, duration } => {
                self.machine.on_media_ready(&track, duration);
            }
            TransportEvent::Failed { track, reason } => {
                log::warn!("playback of {track} failed: {reason}");
                let fx = self.machine.on_media_failed(&track);
                self.apply(fx);
            }
            TransportEvent::Tick { position, .. } => {
                self.machine.on_transport_tick(position);
            }
            TransportEvent::Ended { .. } => {
                let fx = self.machine.on_transport_ended();
                self.apply(fx);
            }
        }
    }

    // ---- effects ----

    fn apply(&mut self, effects: Effects) {
        let mut pending: VecDeque<Effect> = effects.into();
        while let Some(effect) = pending.pop_front() {
            match effect {
                Effect::Load(track) => pending.extend(self.load(&track)),
                Effect::Play => pending.extend(self.start_playback()),
                Effect::Pause => self.transport.pause(),
                Effect::Seek(position) => self.transport.seek(position),
            }
        }
    }

    fn ensure_graph(&mut self) {
        self.graph
            .ensure_initialized(&mut self.transport, &self.eq, self.eq_enabled, self.volume);
    }

    fn load(&mut self, track: &Track) -> Effects {
        let Some(locator) = &track.locator else {
            log::warn!("no audio available for {}", track.id);
            return self.machine.on_media_failed(&track.id);
        };

        // Loads only ever follow a user action, so this is where the graph
        // gets built.
        self.ensure_graph();
        self.graph.load_source(&mut self.transport, &track.id, locator);
        Vec::new()
    }

    fn start_playback(&mut self) -> Effects {
        // An earlier effect in the batch may already have given up.
        if !self.machine.state().playing {
            return Vec::new();
        }
        let Some(current) = self.machine.current() else {
            return Vec::new();
        };
        let id: TrackId = current.id.clone();
        if !current.has_audio() {
            log::warn!("no audio available for {id}");
            return self.machine.on_media_failed(&id);
        }

        self.ensure_graph();
        self.graph.resume_if_suspended(&mut self.transport);
        match self.transport.play() {
            Ok(()) => Vec::new(),
            Err(e) => {
                log::warn!("cannot start playback of {id}: {e}");
                self.machine.on_media_failed(&id)
            }
        }
    }
}
