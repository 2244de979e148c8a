//! Level Units
//!
//! Platform effects take gains in millibels (1 dB = 100 mB) stored as `i16`.

use serde::{Deserialize, Serialize};

/// Convert decibels to millibels.
///
/// Truncates toward zero (3.5 dB -> 350 mB, 0.299 dB -> 29 mB) and saturates at the
/// `i16` bounds. NaN maps to 0.
pub fn db_to_millibels(db: f64) -> i16 {
    // `as` on floats truncates toward zero and saturates
    let millibels = (db * 100.0) as i32;
    millibels.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Convert millibels to decibels
pub fn millibels_to_db(millibels: i16) -> f64 {
    f64::from(millibels) / 100.0
}

/// Band level range reported by an effect, in millibels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min_mb: i16,
    pub max_mb: i16,
}

impl LevelRange {
    pub fn new(min_mb: i16, max_mb: i16) -> Self {
        Self { min_mb, max_mb }
    }

    pub fn contains(&self, millibels: i16) -> bool {
        (self.min_mb..=self.max_mb).contains(&millibels)
    }

    /// Range in decibels as `(min, max)`
    pub fn to_db(self) -> (f64, f64) {
        (millibels_to_db(self.min_mb), millibels_to_db(self.max_mb))
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::new(-1500, 1500)
    }
}
