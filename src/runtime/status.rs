use std::time::Duration;

use crate::eq::EqSettings;
use crate::graph::GraphStatus;
use crate::player::{Phase, PlaybackState};

pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Everything the one-line status needs, gathered from the engine.
pub struct StatusView<'a> {
    pub state: &'a PlaybackState,
    pub volume: f32,
    pub eq: &'a EqSettings,
    pub eq_enabled: bool,
    pub graph: GraphStatus,
    /// Label of the entry under the cursor.
    pub cursor: Option<&'a str>,
}

fn eq_text(eq: &EqSettings, enabled: bool, graph: GraphStatus) -> String {
    if graph == GraphStatus::Degraded {
        return "eq n/a".to_string();
    }
    if !enabled {
        return "eq off".to_string();
    }
    match eq.matching_preset() {
        Some(name) => format!("eq {name}"),
        None => format!("eq {eq}"),
    }
}

pub fn status_line(view: &StatusView<'_>) -> String {
    let state = view.state;
    let mut parts: Vec<String> = Vec::new();

    let marker = match state.phase() {
        Phase::Idle => "-",
        Phase::Paused => "||",
        Phase::Playing if state.loading => "..",
        Phase::Playing => ">",
    };
    match &state.current {
        Some(t) => parts.push(format!("{marker} {}", t.display())),
        None => parts.push(format!("{marker} nothing selected")),
    }

    if state.current.is_some() {
        parts.push(format!(
            "{} / {}",
            format_mmss(state.position),
            format_mmss(state.duration)
        ));
        parts.push(state.mood.to_string());
    }

    parts.push(format!("vol {:.0}%", view.volume * 100.0));

    let mut modes = Vec::new();
    if state.shuffle {
        modes.push("shuffle");
    }
    if state.repeat {
        modes.push("repeat");
    }
    if !modes.is_empty() {
        parts.push(format!("[{}]", modes.join(" ")));
    }

    parts.push(eq_text(view.eq, view.eq_enabled, view.graph));

    if let Some(label) = view.cursor {
        parts.push(format!("@ {label}"));
    }

    parts.join("  ")
}
