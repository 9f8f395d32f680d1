//! Local music catalog.
//!
//! Walks a directory for audio files, turns their tags into playable
//! [`Track`](crate::player::Track)s and offers a fuzzy text query over them.

mod display;
mod scan;
mod search;

pub use display::display_label;
pub use scan::scan;
pub use search::{fuzzy_match_positions, search};

#[cfg(test)]
mod tests;
