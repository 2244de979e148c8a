//! End-to-end controller behavior through the public API

use eqlink_core::{
    BridgeConfig, Command, EqualizerController, EqualizerService, MethodCall, Reply,
    SoftwareConfig, SoftwareProvider, TargetMode,
};
use eqlink_platform::SoftwareProbe;
use serde_json::json;

fn controller_with(config: BridgeConfig) -> (EqualizerController, SoftwareProbe) {
    let provider = SoftwareProvider::with_config(config.software.clone());
    let probe = provider.probe();
    (EqualizerController::new(provider, config), probe)
}

fn dispatch(controller: &mut EqualizerController, method: &str, arguments: serde_json::Value) -> Reply {
    let command = MethodCall::new(method, Some(arguments)).into_command().unwrap();
    controller.handle(command)
}

#[test]
fn test_full_session() {
    let (mut controller, probe) = controller_with(BridgeConfig::default());

    let session = match controller.handle(Command::GetAudioSessionId) {
        Reply::SessionId(id) => id,
        other => panic!("unexpected reply {:?}", other),
    };
    assert!(session > 0);

    assert_eq!(
        dispatch(&mut controller, "initializeEqualizer", json!({"audioSessionId": session})),
        Reply::Success(true)
    );
    assert_eq!(
        dispatch(&mut controller, "setEqualizerEnabled", json!({"enabled": true})),
        Reply::Success(true)
    );
    assert_eq!(
        dispatch(&mut controller, "setBandLevel", json!({"bandIndex": 0, "level": 3.5})),
        Reply::Success(true)
    );
    assert_eq!(probe.levels().unwrap(), vec![350, 0, 0, 0, 0]);

    let Reply::Status(status) = dispatch(&mut controller, "getEqualizerInfo", json!({})) else {
        panic!("expected status");
    };
    assert!(status.initialized);
    assert!(status.enabled);

    assert_eq!(
        dispatch(&mut controller, "applyPreset", json!({"values": [0, 0, 0, 0, 0, 0, 0]})),
        Reply::Success(true)
    );
    assert_eq!(probe.levels().unwrap(), vec![0; 5]);
}

#[test]
fn test_rejected_preset_changes_nothing() {
    let (mut controller, probe) = controller_with(BridgeConfig::default());
    controller.initialize(0);
    controller.apply_preset(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let before: Vec<Option<f64>> = (0..7).map(|i| controller.band_level(i)).collect();

    assert_eq!(
        dispatch(&mut controller, "applyPreset", json!({"values": [9, 9, 9, 9, 9]})),
        Reply::Success(false)
    );

    let after: Vec<Option<f64>> = (0..7).map(|i| controller.band_level(i)).collect();
    assert_eq!(before, after);
    assert_eq!(probe.levels().unwrap(), vec![100, 300, 400, 600, 700]);
}

#[test]
fn test_everything_before_initialize_is_benign() {
    let (mut controller, probe) = controller_with(BridgeConfig::default());

    for command in [
        Command::SetEqualizerEnabled { enabled: true },
        Command::SetBandLevel {
            band_index: 2,
            level: 6.0,
        },
        Command::ResetBands,
        Command::ApplyPreset { values: vec![1.0; 7] },
        Command::ApplyNamedPreset { name: "Rock".into() },
    ] {
        assert_eq!(controller.handle(command), Reply::Success(false));
    }

    assert_eq!(controller.handle(Command::Release), Reply::Success(true));
    assert_eq!(controller.handle(Command::Release), Reply::Success(true));
    assert_eq!(probe.acquired_count(), 0);
}

#[test]
fn test_session_mode_binds_to_session() {
    let config = BridgeConfig {
        target_mode: TargetMode::Session,
        ..Default::default()
    };
    let (mut controller, probe) = controller_with(config);
    let session = controller.audio_session_id();
    assert!(controller.initialize(session));
    assert_eq!(
        probe.last_target(),
        Some(eqlink_core::AudioTarget::Session(session))
    );
}

#[test]
fn test_single_band_device() {
    let config = BridgeConfig {
        software: SoftwareConfig {
            band_centers_hz: vec![1000],
            ..Default::default()
        },
        ..Default::default()
    };
    let (mut controller, probe) = controller_with(config);
    controller.initialize(0);

    // Every logical band lands on the only hardware band; the last write wins
    controller.apply_preset(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, -7.0]);
    assert_eq!(probe.levels().unwrap(), vec![-700]);
}

#[test]
fn test_service_end_to_end() {
    let provider = SoftwareProvider::new();
    let probe = provider.probe();
    let service =
        EqualizerService::spawn(EqualizerController::new(provider, BridgeConfig::default())).unwrap();

    assert_eq!(service.call(Command::GetEqualizerInfo).unwrap(), Reply::Status(Default::default()));
    assert!(service.initialize(0).unwrap());
    assert_eq!(
        service
            .call(Command::ApplyNamedPreset {
                name: "Treble Boost".into()
            })
            .unwrap(),
        Reply::Success(true)
    );
    // 6 kHz and 15 kHz land on hardware bands 3 and 4
    assert_eq!(probe.levels().unwrap(), vec![0, 0, 0, 500, 600]);

    drop(service);
    assert_eq!(probe.live_instances(), 0);
}
