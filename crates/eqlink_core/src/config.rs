//! Bridge Configuration
//!
//! Loaded once at startup. Nothing here is written back at runtime.
//!
//! # Storage Locations
//! - Linux: `~/.config/eqlink/config.json`
//! - Windows: `%APPDATA%\eqlink\config\config.json`
//! - macOS: `~/Library/Application Support/com.eqlink.eqlink/config.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use eqlink_platform::{AudioTarget, SoftwareConfig};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{CoreError, CoreResult};

/// How `initialize` picks the audio target for a session id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Always attach to the global output mix, whatever id the caller passes
    #[default]
    Global,

    /// Attach to the caller's session (id 0 still selects the global mix)
    Session,
}

impl TargetMode {
    pub fn resolve(self, session_id: i32) -> AudioTarget {
        match self {
            TargetMode::Global => AudioTarget::Global,
            TargetMode::Session => AudioTarget::from_session_id(session_id),
        }
    }
}

impl FromStr for TargetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(TargetMode::Global),
            "session" => Ok(TargetMode::Session),
            other => Err(format!("unknown target mode: {}", other)),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub target_mode: TargetMode,

    /// Enable processing right after a successful initialize
    #[serde(default)]
    pub enable_on_initialize: bool,

    /// Band layout of the built-in software effect
    #[serde(default)]
    pub software: SoftwareConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            target_mode: TargetMode::Global,
            enable_on_initialize: false,
            software: SoftwareConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load from the platform config path, or return default if missing/corrupt
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => {
                        info!("Config loaded from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        error!("Failed to load config: {}", e);
                    }
                }
            }
        }

        info!("Using default config");
        Self::default()
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> CoreResult<Self> {
        let file = fs::File::open(path).map_err(|source| CoreError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> CoreResult<()> {
        let io_err = |source| CoreError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = fs::File::create(path).map_err(io_err)?;
        serde_json::to_writer_pretty(file, self)?;

        info!("Config saved to {:?}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        let software = &self.software;
        if software.band_centers_hz.is_empty() {
            return Err(CoreError::Config("software effect needs at least one band".into()));
        }
        if software.band_centers_hz.len() > usize::from(u16::MAX) {
            return Err(CoreError::Config("too many software bands".into()));
        }
        if software.level_range.min_mb > software.level_range.max_mb {
            return Err(CoreError::Config(format!(
                "invalid level range: {}..{}",
                software.level_range.min_mb, software.level_range.max_mb
            )));
        }
        if software.max_instances == 0 {
            return Err(CoreError::Config("max_instances must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the platform-specific configuration file path
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "eqlink", "eqlink").map(|proj| proj.config_dir().join("config.json"))
    }
}
