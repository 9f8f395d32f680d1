//! monofm: a playback engine with a six-band equalizer, a queue-driven
//! transport state machine and persisted listening preferences.

pub mod config;
pub mod dsp;
pub mod engine;
pub mod eq;
pub mod graph;
pub mod library;
pub mod player;
pub mod runtime;
pub mod settings;
pub mod transport;
