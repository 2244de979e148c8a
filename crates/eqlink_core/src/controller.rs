//! Equalizer Controller
//!
//! Translates requests about the 7 logical bands into operations on a platform
//! equalizer effect.
//!
//! Every public operation fails soft: a missing effect, a bad argument or an error
//! from the platform is logged and turned into a `false` / empty result. Equalizer
//! trouble must never interrupt playback, so nothing here panics or returns an error
//! to the caller.

use eqlink_bands::{
    db_to_millibels, find_preset, millibels_to_db, nearest_band, BandError, BandMapping,
    LevelRange, LogicalBand, LOGICAL_BANDS, LOGICAL_BAND_COUNT,
};
use eqlink_platform::{AudioTarget, EffectProvider, EqualizerEffect, PlatformError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::BridgeConfig;
use crate::error::{CoreError, CoreResult};
use crate::message::{Command, PresetInfo, Reply};

/// Status snapshot reported to callers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EqualizerStatus {
    pub initialized: bool,
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_bands: Option<u16>,

    /// (min, max) in dB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_level_range: Option<(f64, f64)>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<AudioTarget>,
}

/// State that lives exactly as long as one acquired effect
struct ActiveEffect {
    effect: Box<dyn EqualizerEffect>,
    target: AudioTarget,
    enabled: bool,
    number_of_bands: u16,
    level_range: LevelRange,
}

/// Owns at most one platform effect and maps logical bands onto it
pub struct EqualizerController {
    provider: Box<dyn EffectProvider>,
    config: BridgeConfig,
    active: Option<ActiveEffect>,
}

impl EqualizerController {
    pub fn new(provider: impl EffectProvider + 'static, config: BridgeConfig) -> Self {
        Self::from_boxed(Box::new(provider), config)
    }

    pub fn from_boxed(provider: Box<dyn EffectProvider>, config: BridgeConfig) -> Self {
        Self {
            provider,
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// Acquire a new effect for `session_id`, releasing any previous one first.
    ///
    /// Returns `false` if the effect could not be acquired or set up; the controller
    /// is then left uninitialized.
    pub fn initialize(&mut self, session_id: i32) -> bool {
        self.release();

        let target = self.config.target_mode.resolve(session_id);
        info!(
            "Initializing equalizer (session id {}, target {:?}, provider {})",
            session_id,
            target,
            self.provider.name()
        );

        match self.acquire(target) {
            Ok(active) => {
                info!(
                    "Equalizer initialized: {} bands, range {} to {} mB",
                    active.number_of_bands, active.level_range.min_mb, active.level_range.max_mb
                );
                self.active = Some(active);
                true
            }
            Err(e) => {
                error!("Failed to initialize equalizer: {}", e);
                false
            }
        }
    }

    fn acquire(&mut self, target: AudioTarget) -> CoreResult<ActiveEffect> {
        let mut effect = self.provider.acquire(target)?;

        match Self::prepare(effect.as_mut(), self.config.enable_on_initialize) {
            Ok((number_of_bands, level_range)) => Ok(ActiveEffect {
                effect,
                target,
                enabled: self.config.enable_on_initialize,
                number_of_bands,
                level_range,
            }),
            Err(e) => {
                // Never keep a half-set-up effect around
                if let Err(release_err) = effect.release() {
                    warn!("Failed to release effect after setup error: {}", release_err);
                }
                Err(e)
            }
        }
    }

    fn prepare(effect: &mut dyn EqualizerEffect, enabled: bool) -> CoreResult<(u16, LevelRange)> {
        let number_of_bands = effect.number_of_bands()?;
        let level_range = effect.band_level_range()?;

        let bands = effect.hardware_bands()?;
        for band in &bands {
            debug!("Hardware band {}: {} Hz", band.index, band.center_hz);
        }
        for mapping in BandMapping::resolve_all(&bands) {
            debug!(
                "Logical band {} ({} Hz) -> hardware band {} ({} Hz)",
                mapping.logical.index,
                mapping.logical.target_hz,
                mapping.hardware.index,
                mapping.hardware.center_hz
            );
        }

        effect.set_enabled(enabled)?;
        Ok((number_of_bands, level_range))
    }

    /// Enable or disable processing. Ignored when not initialized.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let result = self.try_set_enabled(enabled);
        if result.is_ok() {
            info!("Equalizer {}", if enabled { "enabled" } else { "disabled" });
        }
        Self::absorb("set enabled", result)
    }

    fn try_set_enabled(&mut self, enabled: bool) -> CoreResult<()> {
        let active = self.active_mut()?;
        active.effect.set_enabled(enabled)?;
        active.enabled = enabled;
        Ok(())
    }

    /// Set the gain of one logical band (0-6) in dB.
    ///
    /// Ignored when not initialized or when the index is out of range, negative
    /// indices included.
    pub fn set_band_level(&mut self, band_index: i64, gain_db: f64) -> bool {
        let result = self.try_set_band_level(band_index, gain_db);
        Self::absorb("set band level", result)
    }

    fn try_set_band_level(&mut self, band_index: i64, gain_db: f64) -> CoreResult<()> {
        self.active_mut()?;
        let logical = LogicalBand::get(band_index)?;
        self.write_band(logical, gain_db)
    }

    fn write_band(&mut self, logical: LogicalBand, gain_db: f64) -> CoreResult<()> {
        let active = self.active_mut()?;

        // Re-read the layout on every call; it belongs to the effect, not to us
        let bands = active.effect.hardware_bands()?;
        let hardware = nearest_band(&bands, logical.target_hz).ok_or(BandError::NoHardwareBands)?;

        let millibels = db_to_millibels(gain_db);
        active.effect.set_band_level(hardware.index, millibels)?;

        debug!(
            "Band {} ({} Hz) -> {} dB ({} mB) on hardware band {} ({} Hz)",
            logical.index, logical.target_hz, gain_db, millibels, hardware.index, hardware.center_hz
        );
        Ok(())
    }

    /// Set all logical bands to 0 dB in band order.
    ///
    /// Each band is reset independently; returns `true` only if all succeeded.
    pub fn reset_bands(&mut self) -> bool {
        if !self.is_initialized() {
            warn!("Equalizer not initialized; ignoring reset");
            return false;
        }

        let mut all_applied = true;
        for logical in LOGICAL_BANDS {
            let result = self.write_band(logical, 0.0);
            all_applied &= Self::absorb("set band level", result);
        }

        if all_applied {
            info!("All bands reset to 0 dB");
        }
        all_applied
    }

    /// Apply exactly 7 gains (dB) in band order.
    ///
    /// Any other length is rejected before a single band is touched.
    pub fn apply_preset(&mut self, gains: &[f64]) -> bool {
        if gains.len() != LOGICAL_BAND_COUNT {
            let err = BandError::PresetLength {
                expected: LOGICAL_BAND_COUNT,
                got: gains.len(),
            };
            warn!("Rejecting preset: {}", err);
            return false;
        }
        if !self.is_initialized() {
            warn!("Equalizer not initialized; ignoring preset");
            return false;
        }

        let mut all_applied = true;
        for (logical, gain_db) in LOGICAL_BANDS.into_iter().zip(gains) {
            let result = self.write_band(logical, *gain_db);
            all_applied &= Self::absorb("set band level", result);
        }

        info!("Preset applied: {:?}", gains);
        all_applied
    }

    /// Apply a built-in preset by name (case-insensitive)
    pub fn apply_named_preset(&mut self, name: &str) -> bool {
        match find_preset(name) {
            Ok((preset_name, gains)) => {
                debug!("Applying built-in preset {}", preset_name);
                self.apply_preset(&gains)
            }
            Err(e) => {
                warn!("Ignoring preset request: {}", e);
                false
            }
        }
    }

    /// Gain (dB) currently applied to the hardware band a logical band maps to
    pub fn band_level(&self, band_index: i64) -> Option<f64> {
        match self.try_band_level(band_index) {
            Ok(level) => Some(level),
            Err(e) => {
                debug!("Band level unavailable: {}", e);
                None
            }
        }
    }

    fn try_band_level(&self, band_index: i64) -> CoreResult<f64> {
        let active = self.active.as_ref().ok_or(CoreError::NotInitialized)?;
        let logical = LogicalBand::get(band_index)?;
        let bands = active.effect.hardware_bands()?;
        let hardware = nearest_band(&bands, logical.target_hz).ok_or(BandError::NoHardwareBands)?;
        Ok(millibels_to_db(active.effect.band_level(hardware.index)?))
    }

    /// Current logical -> hardware routing (empty when not initialized)
    pub fn band_mapping(&self) -> Vec<BandMapping> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        match active.effect.hardware_bands() {
            Ok(bands) => BandMapping::resolve_all(&bands),
            Err(e) => {
                warn!("Failed to read hardware bands: {}", e);
                Vec::new()
            }
        }
    }

    /// Status snapshot; an uninitialized controller reports only two `false` flags
    pub fn status(&self) -> EqualizerStatus {
        match &self.active {
            Some(active) => EqualizerStatus {
                initialized: true,
                enabled: active.enabled,
                number_of_bands: Some(active.number_of_bands),
                band_level_range: Some(active.level_range.to_db()),
                target: Some(active.target),
            },
            None => EqualizerStatus::default(),
        }
    }

    /// Ask the provider for a fresh session id; 0 (global) if it cannot supply one
    pub fn audio_session_id(&mut self) -> i32 {
        match self.provider.generate_session_id() {
            Ok(id) => {
                debug!("Generated audio session id {}", id);
                id
            }
            Err(e) => {
                error!("Failed to generate audio session id: {}", e);
                AudioTarget::GLOBAL_SESSION_ID
            }
        }
    }

    /// Release the effect and clear state. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(mut active) = self.active.take() {
            match active.effect.release() {
                Ok(()) => info!("Equalizer released"),
                Err(e) => error!("Error releasing equalizer: {}", e),
            }
        }
    }

    /// Run one command
    pub fn handle(&mut self, command: Command) -> Reply {
        debug!("Handling {}", command.method());
        match command {
            Command::GetAudioSessionId => Reply::SessionId(self.audio_session_id()),
            Command::InitializeEqualizer { audio_session_id } => {
                Reply::Success(self.initialize(audio_session_id))
            }
            Command::SetEqualizerEnabled { enabled } => Reply::Success(self.set_enabled(enabled)),
            Command::SetBandLevel { band_index, level } => {
                Reply::Success(self.set_band_level(band_index, level))
            }
            Command::ResetBands => Reply::Success(self.reset_bands()),
            Command::ApplyPreset { values } => Reply::Success(self.apply_preset(&values)),
            Command::GetEqualizerInfo => Reply::Status(self.status()),
            Command::GetPresets => Reply::Presets(PresetInfo::builtin()),
            Command::ApplyNamedPreset { name } => Reply::Success(self.apply_named_preset(&name)),
            Command::Release => {
                self.release();
                Reply::Success(true)
            }
        }
    }

    fn active_mut(&mut self) -> CoreResult<&mut ActiveEffect> {
        self.active.as_mut().ok_or(CoreError::NotInitialized)
    }

    /// Turn an internal result into the fail-soft boolean
    fn absorb(operation: &str, result: CoreResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(CoreError::NotInitialized) => {
                warn!("Equalizer not initialized; ignoring {}", operation);
                false
            }
            Err(CoreError::Band(e)) => {
                warn!("Ignoring {}: {}", operation, e);
                false
            }
            Err(CoreError::Platform(PlatformError::InvalidArgument(msg))) => {
                warn!("Platform rejected {}: {}", operation, msg);
                false
            }
            Err(e) => {
                error!("Failed to {}: {}", operation, e);
                false
            }
        }
    }
}

impl Drop for EqualizerController {
    fn drop(&mut self) {
        self.release();
    }
}
