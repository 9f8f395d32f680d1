//! Six-band equalizer model.
//!
//! Pure values and policy: the fixed band layout, gain validation and the
//! preset library. Nothing here touches audio; the live filter chain reads
//! these values through [`crate::graph::SignalGraph::update_band_gains`].

mod model;
mod presets;

pub use model::*;
pub use presets::*;
