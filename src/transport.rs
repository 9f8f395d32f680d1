//! Media transport: the device that decodes and outputs a track.
//!
//! The engine drives a [`Transport`] with commands and receives
//! [`TransportEvent`]s back over a channel. [`RodioTransport`] is the real
//! device; tests use a recording mock.

mod device;
mod sink;
mod types;

pub use device::RodioTransport;
pub use types::*;

#[cfg(test)]
pub(crate) mod mock;
