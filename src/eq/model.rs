use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::presets::PRESETS;

/// Number of equalizer bands.
pub const BAND_COUNT: usize = 6;

/// Center frequencies (Hz) of the bands, lowest first.
pub const BAND_FREQUENCIES: [u32; BAND_COUNT] = [60, 170, 350, 1000, 3500, 10000];

pub const MIN_GAIN_DB: i32 = -12;
pub const MAX_GAIN_DB: i32 = 12;

/// Clamp a requested gain into the supported `[-12, 12]` dB range.
pub fn clamp_gain(value: i32) -> i32 {
    value.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
}

/// Position of `frequency` in [`BAND_FREQUENCIES`], if it is one of the bands.
pub fn band_index(frequency: u32) -> Option<usize> {
    BAND_FREQUENCIES.iter().position(|&f| f == frequency)
}

/// Per-band gains in dB.
///
/// Always holds exactly one gain per entry of [`BAND_FREQUENCIES`], each
/// within `[MIN_GAIN_DB, MAX_GAIN_DB]`. There is no way to construct a value
/// that breaks this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct EqSettings {
    gains: [i32; BAND_COUNT],
}

impl EqSettings {
    /// All bands at 0 dB.
    pub const fn flat() -> Self {
        Self {
            gains: [0; BAND_COUNT],
        }
    }

    /// Build settings from raw gains, clamping each one.
    pub fn from_gains(gains: [i32; BAND_COUNT]) -> Self {
        Self {
            gains: gains.map(clamp_gain),
        }
    }

    pub fn gains(&self) -> [i32; BAND_COUNT] {
        self.gains
    }

    /// Gain of the band centered at `frequency`, or `None` for a frequency
    /// outside the fixed set.
    pub fn gain(&self, frequency: u32) -> Option<i32> {
        band_index(frequency).map(|i| self.gains[i])
    }

    /// `(frequency, gain)` pairs in band order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        BAND_FREQUENCIES.iter().copied().zip(self.gains.iter().copied())
    }

    /// Copy with one band replaced by the clamped `value`. Unknown
    /// frequencies leave the settings untouched.
    pub fn with_band(&self, frequency: u32, value: i32) -> Self {
        let mut next = *self;
        if let Some(i) = band_index(frequency) {
            next.gains[i] = clamp_gain(value);
        }
        next
    }

    pub fn is_flat(&self) -> bool {
        self.gains.iter().all(|&g| g == 0)
    }

    /// Name of the preset these settings are identical to, if any.
    pub fn matching_preset(&self) -> Option<&'static str> {
        PRESETS
            .iter()
            .find(|(_, gains)| *gains == self.gains)
            .map(|(name, _)| *name)
    }
}

/// Return `settings` with the band at `frequency` set to `clamp_gain(value)`.
pub fn set_band(settings: &EqSettings, frequency: u32, value: i32) -> EqSettings {
    settings.with_band(frequency, value)
}

impl fmt::Display for EqSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.gains.iter().map(|g| format!("{g:+}")).collect();
        write!(f, "[{}]", parts.join(" "))
    }
}

// Stored as a table keyed by frequency, e.g. `"60" = 4`.
impl Serialize for EqSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BAND_COUNT))?;
        for (freq, gain) in self.iter() {
            map.serialize_entry(&freq.to_string(), &gain)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EqSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, i64>::deserialize(deserializer)?;
        let mut gains = [0; BAND_COUNT];
        for (key, value) in raw {
            // Unknown keys are dropped; missing bands stay at 0 dB.
            let Some(i) = key.trim().parse::<u32>().ok().and_then(band_index) else {
                continue;
            };
            gains[i] = value.clamp(MIN_GAIN_DB as i64, MAX_GAIN_DB as i64) as i32;
        }
        Ok(Self { gains })
    }
}
