//! Band Error Types

use thiserror::Error;

/// Errors from band lookups and preset validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandError {
    #[error("Invalid band index: {0} (must be 0-6)")]
    InvalidBandIndex(i64),

    #[error("Preset must have {expected} values, got {got}")]
    PresetLength { expected: usize, got: usize },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Hardware effect exposes no bands")]
    NoHardwareBands,
}
