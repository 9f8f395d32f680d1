//! Sample-level processing for the equalizer chain.
//!
//! [`FilterChain`] is the set of live parameters shared between the control
//! side and the audio callback; [`EqSource`] is the rodio source adapter that
//! runs the six biquads plus the master gain over decoded samples.

mod biquad;
mod chain;
mod source;

pub use biquad::*;
pub use chain::*;
pub use source::*;

#[cfg(test)]
mod tests;
