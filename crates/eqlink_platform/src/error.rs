//! Platform Error Types

use thiserror::Error;

/// Errors from platform effect operations
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Equalizer effect not supported on this device: {0}")]
    Unsupported(String),

    #[error("No effect instances available (limit {0})")]
    InstancesExhausted(usize),

    #[error("Invalid audio target: {0}")]
    InvalidTarget(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Effect has been released")]
    EffectReleased,

    #[error("Internal error: {0}")]
    Internal(String),
}
