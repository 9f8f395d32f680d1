//! Durable listening preferences.
//!
//! Preferences live under a single key of a namespaced key-value store.
//! They are read once at startup and rewritten after every change.

mod prefs;
mod store;

pub use prefs::*;
pub use store::*;
