//! Software Effect Backend
//!
//! An in-process implementation of [`EffectProvider`] that behaves like a device
//! equalizer without touching any audio hardware. It is the backend of the desktop
//! host and of every test in the workspace.
//!
//! The provider keeps its bookkeeping behind a shared lock so a [`SoftwareProbe`]
//! can watch what the controller did after the provider has been moved into it,
//! and inject failures.

use std::sync::Arc;

use eqlink_bands::LevelRange;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlatformError;
use crate::traits::{AudioTarget, EffectProvider, EqualizerEffect};

/// Hardware layout emulated by the software backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareConfig {
    /// Center frequency of each band in Hz, in native index order
    pub band_centers_hz: Vec<u32>,

    /// Accepted level range in millibels
    pub level_range: LevelRange,

    /// Maximum number of simultaneously live effects
    pub max_instances: usize,
}

impl Default for SoftwareConfig {
    fn default() -> Self {
        Self {
            // Typical 5-band device layout
            band_centers_hz: vec![60, 230, 910, 3600, 14000],
            level_range: LevelRange::default(),
            max_instances: 4,
        }
    }
}

/// Per-effect state
#[derive(Debug)]
struct EffectState {
    target: AudioTarget,
    levels: Vec<i16>,
    enabled: bool,
    released: bool,
}

/// Provider-wide state shared with every effect and probe
#[derive(Debug, Default)]
struct ProviderState {
    live_instances: usize,
    next_session_id: i32,
    fail_acquire: bool,
    fail_writes: bool,
    fail_band: Option<u16>,
    acquired_count: usize,
    /// Only the most recent effect is kept for the probe
    latest: Option<Arc<Mutex<EffectState>>>,
}

/// In-process equalizer provider
pub struct SoftwareProvider {
    config: SoftwareConfig,
    shared: Arc<Mutex<ProviderState>>,
}

impl SoftwareProvider {
    pub fn new() -> Self {
        Self::with_config(SoftwareConfig::default())
    }

    pub fn with_config(config: SoftwareConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Mutex::new(ProviderState {
                next_session_id: 1,
                ..Default::default()
            })),
        }
    }

    /// Get a probe onto this provider's state
    pub fn probe(&self) -> SoftwareProbe {
        SoftwareProbe {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn config(&self) -> &SoftwareConfig {
        &self.config
    }
}

impl Default for SoftwareProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectProvider for SoftwareProvider {
    fn name(&self) -> &'static str {
        "Software"
    }

    fn acquire(&mut self, target: AudioTarget) -> Result<Box<dyn EqualizerEffect>, PlatformError> {
        if let AudioTarget::Session(id) = target {
            if id < 0 {
                return Err(PlatformError::InvalidTarget(format!("session {}", id)));
            }
        }

        let mut shared = self.shared.lock();
        if shared.fail_acquire {
            return Err(PlatformError::Unsupported("acquisition disabled by probe".into()));
        }
        if shared.live_instances >= self.config.max_instances {
            return Err(PlatformError::InstancesExhausted(self.config.max_instances));
        }

        let state = Arc::new(Mutex::new(EffectState {
            target,
            levels: vec![0; self.config.band_centers_hz.len()],
            enabled: false,
            released: false,
        }));
        shared.live_instances += 1;
        shared.acquired_count += 1;
        shared.latest = Some(Arc::clone(&state));

        debug!(
            "Software effect acquired for {:?} ({} live)",
            target, shared.live_instances
        );

        Ok(Box::new(SoftwareEffect {
            band_centers_hz: self.config.band_centers_hz.clone(),
            level_range: self.config.level_range,
            state,
            shared: Arc::clone(&self.shared),
        }))
    }

    fn generate_session_id(&mut self) -> Result<i32, PlatformError> {
        let mut shared = self.shared.lock();
        let id = shared.next_session_id;
        shared.next_session_id = shared
            .next_session_id
            .checked_add(1)
            .ok_or_else(|| PlatformError::Internal("session ids exhausted".into()))?;
        Ok(id)
    }
}

/// An effect handed out by [`SoftwareProvider`]
pub struct SoftwareEffect {
    band_centers_hz: Vec<u32>,
    level_range: LevelRange,
    state: Arc<Mutex<EffectState>>,
    shared: Arc<Mutex<ProviderState>>,
}

impl SoftwareEffect {
    fn check_band(&self, band: u16) -> Result<usize, PlatformError> {
        let index = usize::from(band);
        if index >= self.band_centers_hz.len() {
            return Err(PlatformError::InvalidArgument(format!("band {}", band)));
        }
        Ok(index)
    }

    fn check_live(&self) -> Result<(), PlatformError> {
        if self.state.lock().released {
            return Err(PlatformError::EffectReleased);
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), PlatformError> {
        self.check_live()?;
        if self.shared.lock().fail_writes {
            return Err(PlatformError::Internal("write rejected by probe".into()));
        }
        Ok(())
    }
}

impl EqualizerEffect for SoftwareEffect {
    fn number_of_bands(&self) -> Result<u16, PlatformError> {
        self.check_live()?;
        u16::try_from(self.band_centers_hz.len())
            .map_err(|_| PlatformError::Internal("too many bands".into()))
    }

    fn center_freq_millihertz(&self, band: u16) -> Result<u32, PlatformError> {
        self.check_live()?;
        let index = self.check_band(band)?;
        Ok(self.band_centers_hz[index].saturating_mul(1000))
    }

    fn band_level_range(&self) -> Result<LevelRange, PlatformError> {
        self.check_live()?;
        Ok(self.level_range)
    }

    fn band_level(&self, band: u16) -> Result<i16, PlatformError> {
        self.check_live()?;
        let index = self.check_band(band)?;
        Ok(self.state.lock().levels[index])
    }

    fn set_band_level(&mut self, band: u16, millibels: i16) -> Result<(), PlatformError> {
        self.check_writable()?;
        let index = self.check_band(band)?;
        if self.shared.lock().fail_band == Some(band) {
            return Err(PlatformError::Internal(format!("band {} rejected by probe", band)));
        }
        if !self.level_range.contains(millibels) {
            return Err(PlatformError::InvalidArgument(format!(
                "level {} mB outside {}..{}",
                millibels, self.level_range.min_mb, self.level_range.max_mb
            )));
        }
        self.state.lock().levels[index] = millibels;
        Ok(())
    }

    fn is_enabled(&self) -> Result<bool, PlatformError> {
        self.check_live()?;
        Ok(self.state.lock().enabled)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), PlatformError> {
        self.check_writable()?;
        self.state.lock().enabled = enabled;
        Ok(())
    }

    fn release(&mut self) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        if !state.released {
            state.released = true;
            state.enabled = false;
            let mut shared = self.shared.lock();
            shared.live_instances = shared.live_instances.saturating_sub(1);
            debug!(
                "Software effect for {:?} released ({} live)",
                state.target, shared.live_instances
            );
        }
        Ok(())
    }
}

impl Drop for SoftwareEffect {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

/// Observation and fault-injection handle onto a [`SoftwareProvider`]
#[derive(Clone)]
pub struct SoftwareProbe {
    shared: Arc<Mutex<ProviderState>>,
}

impl SoftwareProbe {
    /// Number of effects acquired and not yet released
    pub fn live_instances(&self) -> usize {
        self.shared.lock().live_instances
    }

    /// Number of effects ever acquired
    pub fn acquired_count(&self) -> usize {
        self.shared.lock().acquired_count
    }

    /// Target of the most recently acquired effect
    pub fn last_target(&self) -> Option<AudioTarget> {
        self.latest(|state| state.target)
    }

    /// Levels (mB) of the most recently acquired effect
    pub fn levels(&self) -> Option<Vec<i16>> {
        self.latest(|state| state.levels.clone())
    }

    /// Enable flag of the most recently acquired effect
    pub fn enabled(&self) -> Option<bool> {
        self.latest(|state| state.enabled)
    }

    /// Make every following `acquire` fail
    pub fn set_fail_acquire(&self, fail: bool) {
        self.shared.lock().fail_acquire = fail;
    }

    /// Make every following level/enable write fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.shared.lock().fail_writes = fail;
    }

    /// Make level writes to one hardware band fail
    pub fn set_fail_band(&self, band: Option<u16>) {
        self.shared.lock().fail_band = band;
    }

    fn latest<T>(&self, read: impl FnOnce(&EffectState) -> T) -> Option<T> {
        let effect = self.shared.lock().latest.clone()?;
        let state = effect.lock();
        Some(read(&state))
    }
}
