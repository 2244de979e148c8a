//! eqlink Bands - Band Model
//!
//! This crate holds the pure logic of the equalizer bridge:
//! - The 7 fixed logical bands presented to the user
//! - Hardware bands as reported by a platform effect
//! - Nearest-band resolution from logical to hardware bands
//! - Decibel / millibel level conversion
//! - Built-in presets
//!
//! # Architecture
//!
//! Nothing here talks to a platform. The controller in `eqlink_core` queries the
//! effect for its hardware bands and hands them to [`nearest_band`] on every lookup,
//! since the hardware layout is only known after an effect has been acquired.

mod bands;
mod error;
mod level;
mod presets;

pub use bands::{nearest_band, BandMapping, HardwareBand, LogicalBand, LOGICAL_BANDS, LOGICAL_BAND_COUNT};
pub use error::BandError;
pub use level::{db_to_millibels, millibels_to_db, LevelRange};
pub use presets::{find_preset, Preset, PRESETS};
