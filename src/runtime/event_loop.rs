use std::io::Write;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::config;
use crate::engine::Engine;
use crate::eq::PRESETS;
use crate::player::TrackId;
use crate::settings::KeyValueStore;
use crate::transport::Transport;

use super::keymap::{Action, action_for};
use super::status::{StatusView, status_line};

/// UI-side state kept across loop iterations.
pub struct EventLoopState {
    /// Queue index under the cursor.
    pub selected: usize,
    /// Listing labels, parallel to the engine's queue.
    pub labels: Vec<String>,
    /// Last current track seen; the cursor follows track changes.
    last_current: Option<TrackId>,
}

impl EventLoopState {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            selected: 0,
            labels,
            last_current: None,
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.labels.len();
        if len == 0 {
            return;
        }
        self.selected = if down {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    /// Snap the cursor to the playing track after it changed.
    pub fn follow<T: Transport, S: KeyValueStore>(&mut self, engine: &Engine<T, S>) {
        let current = engine.state().current_id().cloned();
        if current != self.last_current {
            if let Some(i) = engine.current_index() {
                self.selected = i;
            }
            self.last_current = current;
        }
    }
}

/// Apply one action. Returns true when the user asked to quit.
pub fn apply_action<T: Transport, S: KeyValueStore>(
    action: Action,
    engine: &mut Engine<T, S>,
    state: &mut EventLoopState,
    settings: &config::PlaybackSettings,
) -> bool {
    match action {
        Action::Quit => return true,
        Action::CursorDown => state.move_cursor(true),
        Action::CursorUp => state.move_cursor(false),
        Action::SelectCursor => engine.select_index(state.selected),
        Action::TogglePlay => {
            if engine.state().current.is_none() {
                engine.select_index(state.selected);
            } else {
                engine.toggle_play();
            }
        }
        Action::Next => engine.next(),
        Action::Prev => engine.prev(),
        Action::SeekForward => engine.seek_by(settings.seek_step(), true),
        Action::SeekBack => engine.seek_by(settings.seek_step(), false),
        Action::ToggleShuffle => {
            engine.toggle_shuffle();
        }
        Action::ToggleRepeat => {
            engine.toggle_repeat();
        }
        Action::ToggleEq => {
            engine.toggle_eq();
        }
        Action::Preset(i) => {
            if let Some((name, _)) = PRESETS.get(i) {
                engine.apply_preset(name);
            }
        }
        Action::VolumeUp => engine.adjust_volume(settings.volume_step),
        Action::VolumeDown => engine.adjust_volume(-settings.volume_step),
    }
    false
}

fn draw<T: Transport, S: KeyValueStore>(
    out: &mut impl Write,
    engine: &Engine<T, S>,
    state: &EventLoopState,
) -> std::io::Result<()> {
    let line = status_line(&StatusView {
        state: engine.state(),
        volume: engine.volume(),
        eq: engine.eq(),
        eq_enabled: engine.eq_enabled(),
        graph: engine.graph_status(),
        cursor: state.labels.get(state.selected).map(String::as_str),
    });
    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(line))?;
    out.flush()
}

/// Main terminal loop: drains transport events, redraws the status line and
/// handles key presses. Returns `Ok(())` when the user quits.
pub fn run<T: Transport, S: KeyValueStore>(
    out: &mut impl Write,
    engine: &mut Engine<T, S>,
    state: &mut EventLoopState,
    settings: &config::Settings,
) -> std::io::Result<()> {
    let poll = settings.playback.tick_interval().min(Duration::from_millis(100));
    loop {
        engine.pump_events();
        state.follow(engine);
        draw(out, engine, state)?;

        if !event::poll(poll)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(action) = action_for(key) {
            if apply_action(action, engine, state, &settings.playback) {
                break;
            }
        }
    }

    queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    out.flush()
}
