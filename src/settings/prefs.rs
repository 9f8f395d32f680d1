use serde::{Deserialize, Deserializer, Serialize};

use crate::eq::EqSettings;

use super::store::{KeyValueStore, StoreError};

/// Key the preferences document is stored under.
pub const PREFERENCES_KEY: &str = "player";

pub const DEFAULT_VOLUME: f32 = 0.7;

/// Everything that survives a restart. Position and current track do not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(deserialize_with = "clamped_volume")]
    pub volume: f32,
    pub shuffle: bool,
    pub repeat: bool,
    pub eq_enabled: bool,
    pub eq: EqSettings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: false,
            eq_enabled: true,
            eq: EqSettings::flat(),
        }
    }
}

fn clamped_volume<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
    let v = f64::deserialize(d)?;
    if v.is_nan() {
        return Ok(DEFAULT_VOLUME);
    }
    Ok(v.clamp(0.0, 1.0) as f32)
}

impl Preferences {
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(toml::to_string(self)?.into_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(toml::from_str(&text)?)
    }
}

/// Load-at-startup / save-on-change pair over a [`KeyValueStore`].
#[derive(Debug)]
pub struct SettingsPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored preferences, or defaults when nothing usable is stored.
    pub fn load(&self) -> Preferences {
        let bytes = match self.store.get(PREFERENCES_KEY) {
            Ok(Some(b)) => b,
            Ok(None) => return Preferences::default(),
            Err(e) => {
                log::warn!("failed to read preferences, using defaults: {e}");
                return Preferences::default();
            }
        };
        match Preferences::from_bytes(&bytes) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("stored preferences are unreadable, using defaults: {e}");
                Preferences::default()
            }
        }
    }

    /// Write `prefs`. Failures are logged; the in-memory values stay
    /// authoritative for the session.
    pub fn save(&mut self, prefs: &Preferences) -> bool {
        let result = prefs
            .to_bytes()
            .and_then(|bytes| self.store.set(PREFERENCES_KEY, &bytes));
        match result {
            Ok(()) => {
                log::debug!("saved preferences");
                true
            }
            Err(e) => {
                log::warn!("failed to save preferences: {e}");
                false
            }
        }
    }
}
