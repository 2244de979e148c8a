//! Equalizer Service - Control Thread
//!
//! Moves an [`EqualizerController`] onto a dedicated thread and feeds it commands
//! over a channel. Every caller, on any thread, goes through the same queue, so
//! initialize/release can never interleave with band writes.
//!
//! ```text
//!  host thread(s) ──Request{command, reply}──▶ eqlink-control ──▶ controller ──▶ effect
//!        ▲                                          │
//!        └──────────────── Reply ───────────────────┘
//! ```

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::controller::{EqualizerController, EqualizerStatus};
use crate::error::{CoreError, CoreResult};
use crate::message::{Command, Reply};

/// Queue depth for pending requests
const REQUEST_QUEUE: usize = 32;

enum Request {
    Call { command: Command, reply: Sender<Reply> },
    Shutdown,
}

/// Handle to the control thread
///
/// Dropping the service shuts the thread down, which releases the effect.
pub struct EqualizerService {
    request_sender: Sender<Request>,
    control_thread: Option<JoinHandle<()>>,
}

impl EqualizerService {
    /// Spawn the control thread, handing it the controller
    pub fn spawn(controller: EqualizerController) -> CoreResult<Self> {
        let (request_sender, request_receiver) = bounded::<Request>(REQUEST_QUEUE);

        let control_thread = thread::Builder::new()
            .name("eqlink-control".into())
            .spawn(move || {
                Self::control_thread_main(controller, request_receiver);
            })
            .map_err(|e| CoreError::ThreadSpawn(e.to_string()))?;

        Ok(Self {
            request_sender,
            control_thread: Some(control_thread),
        })
    }

    /// Run a command on the control thread and wait for its reply
    pub fn call(&self, command: Command) -> CoreResult<Reply> {
        let (reply_sender, reply_receiver) = bounded::<Reply>(1);
        self.request_sender
            .send(Request::Call {
                command,
                reply: reply_sender,
            })
            .map_err(|_| CoreError::ChannelSendError)?;
        reply_receiver.recv().map_err(|_| CoreError::ChannelRecvError)
    }

    /// Initialize the equalizer for a session id
    pub fn initialize(&self, audio_session_id: i32) -> CoreResult<bool> {
        self.call_bool(Command::InitializeEqualizer { audio_session_id })
    }

    /// Enable or disable processing
    pub fn set_enabled(&self, enabled: bool) -> CoreResult<bool> {
        self.call_bool(Command::SetEqualizerEnabled { enabled })
    }

    /// Set one logical band's gain in dB
    pub fn set_band_level(&self, band_index: i64, level: f64) -> CoreResult<bool> {
        self.call_bool(Command::SetBandLevel { band_index, level })
    }

    /// Current status snapshot
    pub fn status(&self) -> CoreResult<EqualizerStatus> {
        match self.call(Command::GetEqualizerInfo)? {
            Reply::Status(status) => Ok(status),
            other => Err(CoreError::UnexpectedReply(format!("{:?}", other))),
        }
    }

    fn call_bool(&self, command: Command) -> CoreResult<bool> {
        let reply = self.call(command)?;
        Ok(reply.as_bool().unwrap_or(false))
    }

    /// Control thread main loop
    fn control_thread_main(mut controller: EqualizerController, request_receiver: Receiver<Request>) {
        info!("Control thread started (provider {})", controller.provider_name());

        for request in request_receiver.iter() {
            match request {
                Request::Call { command, reply } => {
                    let result = controller.handle(command);
                    if reply.send(result).is_err() {
                        debug!("Caller stopped waiting for reply");
                    }
                }
                Request::Shutdown => {
                    info!("Shutdown request received");
                    break;
                }
            }
        }

        controller.release();
        info!("Control thread shutting down");
    }
}

impl Drop for EqualizerService {
    fn drop(&mut self) {
        if self.request_sender.send(Request::Shutdown).is_err() {
            warn!("Control thread already gone");
        }

        if let Some(handle) = self.control_thread.take() {
            if handle.join().is_err() {
                warn!("Control thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eqlink_platform::{
        AudioTarget, EffectProvider, EqualizerEffect, PlatformError, SoftwareProvider,
    };

    use crate::config::BridgeConfig;

    fn service() -> (EqualizerService, eqlink_platform::SoftwareProbe) {
        let provider = SoftwareProvider::new();
        let probe = provider.probe();
        let controller = EqualizerController::new(provider, BridgeConfig::default());
        (EqualizerService::spawn(controller).unwrap(), probe)
    }

    #[test]
    fn test_service_roundtrip() {
        let (service, probe) = service();
        assert!(!service.set_band_level(0, 3.0).unwrap());
        assert!(service.initialize(0).unwrap());
        assert!(service.set_band_level(0, 3.0).unwrap());
        assert!(service.set_enabled(true).unwrap());

        let status = service.status().unwrap();
        assert!(status.initialized);
        assert!(status.enabled);
        assert_eq!(probe.levels().unwrap()[0], 300);
    }

    #[test]
    fn test_drop_releases_effect() {
        let (service, probe) = service();
        service.initialize(0).unwrap();
        assert_eq!(probe.live_instances(), 1);

        drop(service);
        assert_eq!(probe.live_instances(), 0);
    }

    struct PanickingProvider;

    impl EffectProvider for PanickingProvider {
        fn name(&self) -> &'static str {
            "Panicking"
        }

        fn acquire(&mut self, _target: AudioTarget) -> Result<Box<dyn EqualizerEffect>, PlatformError> {
            panic!("provider bug");
        }

        fn generate_session_id(&mut self) -> Result<i32, PlatformError> {
            Ok(1)
        }
    }

    #[test]
    fn test_control_thread_panic_reported_and_shutdown_survives() {
        let controller = EqualizerController::new(PanickingProvider, BridgeConfig::default());
        let service = EqualizerService::spawn(controller).unwrap();
        assert_eq!(service.call(Command::GetAudioSessionId).unwrap(), Reply::SessionId(1));

        // The reply sender is dropped while the thread unwinds
        assert!(matches!(service.initialize(0), Err(CoreError::ChannelRecvError)));

        // Joining the panicked thread is logged, not propagated
        drop(service);
    }

    #[test]
    fn test_concurrent_callers_are_serialized() {
        let (service, probe) = service();
        let service = Arc::new(service);
        service.initialize(0).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for i in 0..50 {
                        // Interleave re-initialization with band writes
                        if i % 10 == 0 {
                            service.initialize(0).unwrap();
                        } else {
                            service.set_band_level(t, 1.0).unwrap();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Never more than one effect alive at a time
        assert_eq!(probe.live_instances(), 1);
        assert!(service.status().unwrap().initialized);
    }
}
