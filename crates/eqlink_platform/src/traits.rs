//! Platform Effect Traits
//!
//! Defines the interface a platform equalizer effect must provide. The shape follows
//! the usual OS audio-effect APIs: band count, per-band center frequency in
//! milliHertz, per-band level in millibels, a level range and a global enable flag.

use eqlink_bands::{HardwareBand, LevelRange};
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Which audio output an effect is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "sessionId", rename_all = "camelCase")]
pub enum AudioTarget {
    /// All audio output of the application
    Global,

    /// A single audio session / stream
    Session(i32),
}

impl AudioTarget {
    /// Reserved session id selecting the global output mix
    pub const GLOBAL_SESSION_ID: i32 = 0;

    /// Map a raw session id to a target; the reserved id 0 means global
    pub fn from_session_id(session_id: i32) -> Self {
        if session_id == Self::GLOBAL_SESSION_ID {
            AudioTarget::Global
        } else {
            AudioTarget::Session(session_id)
        }
    }

    pub fn session_id(&self) -> i32 {
        match self {
            AudioTarget::Global => Self::GLOBAL_SESSION_ID,
            AudioTarget::Session(id) => *id,
        }
    }
}

/// A live multi-band equalizer effect owned by the platform
///
/// The effect owns the hardware band table and all processing state. Callers only
/// read band metadata and write levels.
pub trait EqualizerEffect: Send {
    /// Number of hardware bands
    fn number_of_bands(&self) -> Result<u16, PlatformError>;

    /// Center frequency of a band in milliHertz
    fn center_freq_millihertz(&self, band: u16) -> Result<u32, PlatformError>;

    /// Supported level range in millibels
    fn band_level_range(&self) -> Result<LevelRange, PlatformError>;

    /// Current level of a band in millibels
    fn band_level(&self, band: u16) -> Result<i16, PlatformError>;

    /// Set the level of a band in millibels
    fn set_band_level(&mut self, band: u16, millibels: i16) -> Result<(), PlatformError>;

    /// Whether the effect is processing audio
    fn is_enabled(&self) -> Result<bool, PlatformError>;

    /// Enable or disable processing
    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError>;

    /// Release the platform resources behind this effect
    ///
    /// Any later call other than `release` fails.
    fn release(&mut self) -> Result<(), PlatformError>;

    /// Enumerate hardware bands in native index order
    fn hardware_bands(&self) -> Result<Vec<HardwareBand>, PlatformError> {
        (0..self.number_of_bands()?)
            .map(|i| Ok(HardwareBand::from_millihertz(i, self.center_freq_millihertz(i)?)))
            .collect()
    }
}

/// Source of equalizer effects and audio session ids
///
/// Each platform (or the in-process software backend) implements this trait.
pub trait EffectProvider: Send {
    /// Get the name of this provider (e.g., "Software")
    fn name(&self) -> &'static str;

    /// Create a new effect bound to `target`, initially disabled
    fn acquire(&mut self, target: AudioTarget) -> Result<Box<dyn EqualizerEffect>, PlatformError>;

    /// Allocate a fresh audio session id
    fn generate_session_id(&mut self) -> Result<i32, PlatformError>;
}
