//! Core Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the equalizer controller and its control thread
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Equalizer not initialized")]
    NotInitialized,

    #[error("Band error: {0}")]
    Band(#[from] eqlink_bands::BandError),

    #[error("Platform error: {0}")]
    Platform(#[from] eqlink_platform::PlatformError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to spawn control thread: {0}")]
    ThreadSpawn(String),

    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("Channel send error - control thread gone")]
    ChannelSendError,

    #[error("Channel receive error - control thread dropped the reply")]
    ChannelRecvError,
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors decoding a method call into a [`crate::Command`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    #[error("Invalid arguments for {method}: {message}")]
    InvalidArguments { method: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::NotInitialized;
        assert!(err.to_string().contains("not initialized"));

        let err = CallError::NotImplemented("frobnicate".into());
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_error_from_band() {
        let band_err = eqlink_bands::BandError::InvalidBandIndex(10);
        let core_err: CoreError = band_err.into();
        assert!(matches!(core_err, CoreError::Band(_)));
    }

    #[test]
    fn test_error_from_platform() {
        let platform_err = eqlink_platform::PlatformError::EffectReleased;
        let core_err: CoreError = platform_err.into();
        assert!(matches!(core_err, CoreError::Platform(_)));
    }
}
