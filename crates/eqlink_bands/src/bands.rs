//! Logical and Hardware Bands
//!
//! The user always sees 7 logical bands. The platform effect exposes however many
//! hardware bands the device has, each with its own fixed center frequency. Every
//! logical band is routed to the hardware band closest to its target frequency.

use serde::{Deserialize, Serialize};

use crate::error::BandError;

/// Number of logical bands presented to the user
pub const LOGICAL_BAND_COUNT: usize = 7;

/// The logical band table (Hz)
pub const LOGICAL_BANDS: [LogicalBand; LOGICAL_BAND_COUNT] = [
    LogicalBand::new(0, 60),    // Sub-bass
    LogicalBand::new(1, 150),   // Bass
    LogicalBand::new(2, 400),   // Low-mid
    LogicalBand::new(3, 1000),  // Mid
    LogicalBand::new(4, 2400),  // Upper-mid
    LogicalBand::new(5, 6000),  // Presence
    LogicalBand::new(6, 15000), // Air
];

/// One of the fixed application-defined frequency slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalBand {
    pub index: usize,
    pub target_hz: u32,
}

impl LogicalBand {
    const fn new(index: usize, target_hz: u32) -> Self {
        Self { index, target_hz }
    }

    /// Look up a logical band by index (0-6).
    ///
    /// Takes the signed index callers send; negative values are just out of range.
    pub fn get(index: i64) -> Result<Self, BandError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| LOGICAL_BANDS.get(i))
            .copied()
            .ok_or(BandError::InvalidBandIndex(index))
    }
}

/// One frequency slot of the platform effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareBand {
    pub index: u16,
    pub center_hz: u32,
}

impl HardwareBand {
    pub fn new(index: u16, center_hz: u32) -> Self {
        Self { index, center_hz }
    }

    /// Build from a center frequency reported in milliHertz.
    ///
    /// Sub-Hz precision is discarded before any comparison.
    pub fn from_millihertz(index: u16, center_mhz: u32) -> Self {
        Self {
            index,
            center_hz: center_mhz / 1000,
        }
    }
}

/// Find the hardware band closest to `target_hz`.
///
/// Bands are scanned in the order given (native index order). A band only replaces
/// the current best when its distance is strictly smaller, so on a tie the earlier
/// band wins. Returns `None` for an empty band list.
pub fn nearest_band(bands: &[HardwareBand], target_hz: u32) -> Option<HardwareBand> {
    let mut closest: Option<HardwareBand> = None;
    let mut min_diff = u32::MAX;

    for band in bands {
        let diff = band.center_hz.abs_diff(target_hz);
        if diff < min_diff {
            min_diff = diff;
            closest = Some(*band);
        }
    }

    closest
}

/// A resolved logical -> hardware routing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandMapping {
    pub logical: LogicalBand,
    pub hardware: HardwareBand,
}

impl BandMapping {
    /// Resolve every logical band against a hardware band layout.
    ///
    /// Empty when the layout has no bands.
    pub fn resolve_all(bands: &[HardwareBand]) -> Vec<BandMapping> {
        LOGICAL_BANDS
            .iter()
            .filter_map(|logical| {
                nearest_band(bands, logical.target_hz).map(|hardware| BandMapping {
                    logical: *logical,
                    hardware,
                })
            })
            .collect()
    }
}
