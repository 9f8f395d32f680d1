//! Playback state machine.
//!
//! [`PlaybackMachine`] owns the transport state (current track, playing flag,
//! position, queue, shuffle/repeat) and decides every transition. It never
//! touches audio itself: each operation returns the [`Effect`]s the engine
//! must perform on the transport, and transport notifications come back in
//! through the `on_*` methods.

mod machine;
mod picker;
mod types;

pub use machine::*;
pub use picker::*;
pub use types::*;
