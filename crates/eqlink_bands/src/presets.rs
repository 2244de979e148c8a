//! Built-in EQ Presets

use crate::bands::LOGICAL_BAND_COUNT;
use crate::error::BandError;

/// Named EQ preset with 7 band gains (dB)
pub type Preset = (&'static str, [f64; LOGICAL_BAND_COUNT]);

/// List of built-in presets
pub const PRESETS: &[Preset] = &[
    ("Flat", [0.0; LOGICAL_BAND_COUNT]),
    ("Bass Boost", [6.0, 5.0, 2.0, 0.0, 0.0, 0.0, 0.0]),
    ("Treble Boost", [0.0, 0.0, 0.0, 0.0, 2.0, 5.0, 6.0]),
    ("Vocal", [-2.0, -1.0, 2.0, 4.0, 4.0, 2.0, 0.0]),
    ("Rock", [5.0, 3.0, -1.0, -2.0, 1.0, 3.0, 5.0]),
    ("Pop", [-1.0, 2.0, 4.0, 4.0, 2.0, 0.0, -1.0]),
    ("Jazz", [3.0, 2.0, 0.0, 1.0, 2.0, 3.0, 4.0]),
    ("Classical", [4.0, 3.0, 0.0, 0.0, 0.0, 2.0, 4.0]),
    ("Electronic", [5.0, 4.0, 0.0, -2.0, 1.0, 3.0, 5.0]),
];

/// Look up a built-in preset by name (case-insensitive)
pub fn find_preset(name: &str) -> Result<Preset, BandError> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| BandError::UnknownPreset(name.to_string()))
}
