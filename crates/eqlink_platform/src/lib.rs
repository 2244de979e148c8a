//! eqlink Platform - Equalizer Effect Abstraction
//!
//! This crate defines what the bridge needs from an OS audio stack:
//! - An equalizer effect handle (band metadata, millibel levels, enable flag)
//! - A provider that acquires effects for an audio target and hands out session ids
//!
//! # Backends
//!
//! | Backend  | Where               | Notes                                   |
//! |----------|---------------------|-----------------------------------------|
//! | Software | everywhere          | In-process, no audio; desktop and tests |
//!
//! Device integrations implement [`EffectProvider`] in the embedding application and
//! pass it to the controller in `eqlink_core`.

mod error;
mod software;
mod traits;

pub use error::PlatformError;
pub use software::{SoftwareConfig, SoftwareEffect, SoftwareProbe, SoftwareProvider};
pub use traits::{AudioTarget, EffectProvider, EqualizerEffect};

/// Get the built-in provider
///
/// Returns a boxed trait object so callers can swap in a device provider later.
pub fn default_provider(config: SoftwareConfig) -> Box<dyn EffectProvider> {
    Box::new(SoftwareProvider::with_config(config))
}
