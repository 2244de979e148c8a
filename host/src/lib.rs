//! eqlink Host Library - Line-delimited JSON Transport
//!
//! Exposes the equalizer service to another process over stdin/stdout. Each input
//! line is one method call, each output line the response to it, in order.

mod commands;

use std::io::{BufRead, Write};
use std::path::Path;

use eqlink_core::{BridgeConfig, CoreResult, EqualizerController, EqualizerService, Reply, SoftwareProvider};
use serde::Serialize;
use tracing::{debug, info};

pub use commands::{ERROR_INVALID_ARGUMENTS, ERROR_INVALID_REQUEST, ERROR_UNAVAILABLE};

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Success { result: Reply },
    NotImplemented,
    Error { code: String, message: String },
}

impl Response {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Host state: the control thread and the config it was started with
pub struct Host {
    service: EqualizerService,
}

impl Host {
    /// Start a host backed by the software effect described in `config`
    pub fn new(config: BridgeConfig) -> CoreResult<Self> {
        let provider = SoftwareProvider::with_config(config.software.clone());
        Self::with_controller(EqualizerController::new(provider, config))
    }

    pub fn with_controller(controller: EqualizerController) -> CoreResult<Self> {
        Ok(Self {
            service: EqualizerService::spawn(controller)?,
        })
    }

    pub fn service(&self) -> &EqualizerService {
        &self.service
    }

    /// Handle one request line and produce the response line (without newline)
    pub fn handle_line(&self, line: &str) -> String {
        let response = commands::dispatch_line(&self.service, line);
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"status":"error","code":"{}","message":"unserializable response: {}"}}"#,
                ERROR_UNAVAILABLE,
                e.to_string().replace('"', "'")
            )
        })
    }

    /// Serve requests until `input` reaches end of stream
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> std::io::Result<()> {
        let mut handled = 0usize;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(&line);
            writeln!(output, "{}", response)?;
            output.flush()?;
            handled += 1;
        }

        info!("Input closed after {} requests", handled);
        Ok(())
    }
}

/// Resolve the startup config: an explicit file must load, the default location may be
/// missing or corrupt.
pub fn load_config(path: Option<&Path>) -> CoreResult<BridgeConfig> {
    match path {
        Some(path) => {
            debug!("Loading config from {:?}", path);
            BridgeConfig::load_from(path)
        }
        None => Ok(BridgeConfig::load()),
    }
}
