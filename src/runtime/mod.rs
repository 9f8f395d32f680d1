use std::env;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::config;

mod event_loop;
mod keymap;
mod startup;
mod status;

pub use keymap::{Action, action_for};
pub use status::{StatusView, format_mmss, status_line};

pub fn run() -> anyhow::Result<()> {
    let settings = config::Settings::load_or_default();

    let dir = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("Music"));

    let (tracks, labels) = startup::load_catalog(&dir, &settings.library);
    if tracks.is_empty() {
        log::warn!("no audio files found under {}", dir.display());
    }
    let mut engine = startup::build_engine(&settings, tracks);
    let mut state = event_loop::EventLoopState::new(labels);

    enable_raw_mode().context("failed to enable raw terminal mode")?;
    let mut stdout = std::io::stdout();
    let run_result = event_loop::run(&mut stdout, &mut engine, &mut state, &settings);
    disable_raw_mode().context("failed to restore terminal mode")?;
    println!();

    run_result.context("terminal i/o failed")
}
