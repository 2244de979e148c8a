//! eqlink Core - Equalizer Controller
//!
//! This crate provides the core of the equalizer bridge, including:
//! - The controller mapping 7 logical bands onto a platform effect
//! - The closed set of commands a host can send, and their replies
//! - A control thread that serializes commands from any number of callers
//! - Bridge configuration
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Host / Transport                     │
//! │      MethodCall ──into_command──▶ Command ──▶ Service       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ crossbeam-channel
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Control Thread                         │
//! │   EqualizerController ──nearest band / mB──▶ Effect         │
//! │              (at most one live effect)                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod controller;
mod error;
mod message;
mod service;

pub use config::{BridgeConfig, TargetMode};
pub use controller::{EqualizerController, EqualizerStatus};
pub use error::{CallError, CoreError, CoreResult};
pub use message::{Command, MethodCall, PresetInfo, Reply};
pub use service::EqualizerService;

// Re-export band and platform types for convenience
pub use eqlink_bands::{BandMapping, HardwareBand, LogicalBand, LOGICAL_BANDS, LOGICAL_BAND_COUNT};
pub use eqlink_platform::{AudioTarget, EffectProvider, EqualizerEffect, SoftwareConfig, SoftwareProvider};
