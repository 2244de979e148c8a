//! Command and Reply Types
//!
//! Commands flow from the host transport -> controller
//! Replies flow back as plain values

use eqlink_bands::PRESETS;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::controller::EqualizerStatus;
use crate::error::CallError;

/// Commands understood by the equalizer controller
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Allocate a fresh audio session id
    GetAudioSessionId,

    /// (Re)acquire the effect for a session id (0 = global)
    InitializeEqualizer { audio_session_id: i32 },

    /// Enable or disable processing
    SetEqualizerEnabled { enabled: bool },

    /// Set gain for a single logical band (band_index 0-6, level in dB)
    ///
    /// The index stays signed as sent; anything outside 0-6 is ignored by the controller.
    SetBandLevel { band_index: i64, level: f64 },

    /// Set every logical band to 0 dB
    ResetBands,

    /// Apply 7 gains (dB) in band order
    ApplyPreset { values: Vec<f64> },

    /// Request a status snapshot
    GetEqualizerInfo,

    /// List the built-in presets
    GetPresets,

    /// Apply a built-in preset by name
    ApplyNamedPreset { name: String },

    /// Release the effect
    Release,
}

impl Command {
    /// Wire names of every command, in declaration order
    pub const METHODS: [&'static str; 10] = [
        "getAudioSessionId",
        "initializeEqualizer",
        "setEqualizerEnabled",
        "setBandLevel",
        "resetBands",
        "applyPreset",
        "getEqualizerInfo",
        "getPresets",
        "applyNamedPreset",
        "release",
    ];

    /// Wire name of this command
    pub fn method(&self) -> &'static str {
        let index = match self {
            Command::GetAudioSessionId => 0,
            Command::InitializeEqualizer { .. } => 1,
            Command::SetEqualizerEnabled { .. } => 2,
            Command::SetBandLevel { .. } => 3,
            Command::ResetBands => 4,
            Command::ApplyPreset { .. } => 5,
            Command::GetEqualizerInfo => 6,
            Command::GetPresets => 7,
            Command::ApplyNamedPreset { .. } => 8,
            Command::Release => 9,
        };
        Self::METHODS[index]
    }
}

/// A method call as delivered by a transport: a name plus loosely-typed arguments
#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    pub method: String,

    #[serde(default)]
    pub arguments: Option<Value>,
}

// Argument fields are optional so that both a missing key and an explicit null fall
// back to the default

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InitializeArgs {
    audio_session_id: Option<i32>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct EnabledArgs {
    enabled: Option<bool>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BandLevelArgs {
    band_index: Option<i64>,
    level: Option<f64>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct PresetArgs {
    values: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct NamedPresetArgs {
    name: String,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Decode into a typed [`Command`].
    ///
    /// Missing arguments take the same defaults the method channel always used
    /// (session 0, disabled, band 0 at 0 dB, empty preset).
    pub fn into_command(self) -> Result<Command, CallError> {
        let MethodCall { method, arguments } = self;

        let command = match method.as_str() {
            "getAudioSessionId" => Command::GetAudioSessionId,
            "initializeEqualizer" => {
                let args: InitializeArgs = decode_or_default(&method, arguments)?;
                Command::InitializeEqualizer {
                    audio_session_id: args.audio_session_id.unwrap_or(0),
                }
            }
            "setEqualizerEnabled" => {
                let args: EnabledArgs = decode_or_default(&method, arguments)?;
                Command::SetEqualizerEnabled {
                    enabled: args.enabled.unwrap_or(false),
                }
            }
            "setBandLevel" => {
                let args: BandLevelArgs = decode_or_default(&method, arguments)?;
                Command::SetBandLevel {
                    band_index: args.band_index.unwrap_or(0),
                    level: args.level.unwrap_or(0.0),
                }
            }
            "resetBands" => Command::ResetBands,
            "applyPreset" => {
                let args: PresetArgs = decode_or_default(&method, arguments)?;
                Command::ApplyPreset {
                    values: args.values.unwrap_or_default(),
                }
            }
            "getEqualizerInfo" => Command::GetEqualizerInfo,
            "getPresets" => Command::GetPresets,
            "applyNamedPreset" => {
                let args: NamedPresetArgs = decode(&method, arguments.unwrap_or(Value::Null))?;
                Command::ApplyNamedPreset { name: args.name }
            }
            "release" => Command::Release,
            _ => return Err(CallError::NotImplemented(method)),
        };

        Ok(command)
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(
    method: &str,
    arguments: Option<Value>,
) -> Result<T, CallError> {
    match arguments {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => decode(method, value),
    }
}

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, CallError> {
    serde_json::from_value(value).map_err(|e| CallError::InvalidArguments {
        method: method.to_string(),
        message: e.to_string(),
    })
}

/// Built-in preset as shown to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub gains: Vec<f64>,
}

impl PresetInfo {
    pub fn builtin() -> Vec<PresetInfo> {
        PRESETS
            .iter()
            .map(|(name, gains)| PresetInfo {
                name: name.to_string(),
                gains: gains.to_vec(),
            })
            .collect()
    }
}

/// Result of a command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Whether the command took effect
    Success(bool),

    /// Allocated audio session id
    SessionId(i32),

    /// Status snapshot
    Status(EqualizerStatus),

    /// Built-in presets
    Presets(Vec<PresetInfo>),
}

impl Reply {
    /// `Some(flag)` for [`Reply::Success`]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Reply::Success(flag) => Some(*flag),
            _ => None,
        }
    }
}
