use super::model::{BAND_COUNT, EqSettings};

/// Name of the all-zero preset, also the fallback for unknown names.
pub const FLAT_PRESET: &str = "flat";

/// Built-in presets in display order. Gains follow [`super::BAND_FREQUENCIES`].
pub const PRESETS: [(&str, [i32; BAND_COUNT]); 8] = [
    (FLAT_PRESET, [0, 0, 0, 0, 0, 0]),
    ("bass", [6, 4, 1, 0, -1, -2]),
    ("treble", [-2, -1, 0, 1, 4, 6]),
    ("vocal", [-2, 0, 2, 4, 2, 0]),
    ("rock", [4, 2, -1, 1, 3, 4]),
    ("jazz", [3, 1, 0, 1, 2, 3]),
    ("electronic", [5, 3, 0, -1, 2, 4]),
    ("acoustic", [2, 1, 1, 2, 2, 1]),
];

pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

/// Settings for the preset called `name`; unknown names yield the flat preset.
pub fn apply_preset(name: &str) -> EqSettings {
    PRESETS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, gains)| EqSettings::from_gains(*gains))
        .unwrap_or_else(EqSettings::flat)
}
