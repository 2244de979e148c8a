//! Wire-level tests for the line-delimited JSON transport

use eqlink_core::{BridgeConfig, TargetMode};
use eqlink_host::{load_config, Host};
use serde_json::{json, Value};

fn host() -> Host {
    Host::new(BridgeConfig::default()).unwrap()
}

fn request(host: &Host, line: &str) -> Value {
    serde_json::from_str(&host.handle_line(line)).unwrap()
}

#[test]
fn test_session_over_the_wire() {
    let host = host();

    let response = request(&host, r#"{"method":"getAudioSessionId"}"#);
    assert_eq!(response, json!({"status": "success", "result": 1}));

    let response = request(
        &host,
        r#"{"method":"initializeEqualizer","arguments":{"audioSessionId":1}}"#,
    );
    assert_eq!(response["result"], json!(true));

    let response = request(
        &host,
        r#"{"method":"setBandLevel","arguments":{"bandIndex":3,"level":-4.5}}"#,
    );
    assert_eq!(response["result"], json!(true));

    let response = request(&host, r#"{"method":"getEqualizerInfo"}"#);
    assert_eq!(response["status"], "success");
    assert_eq!(response["result"]["initialized"], json!(true));
    assert_eq!(response["result"]["enabled"], json!(false));
    assert_eq!(response["result"]["numberOfBands"], json!(5));
    assert_eq!(response["result"]["bandLevelRange"], json!([-15.0, 15.0]));
}

#[test]
fn test_uninitialized_info() {
    let host = host();
    let response = request(&host, r#"{"method":"getEqualizerInfo","arguments":null}"#);
    assert_eq!(
        response,
        json!({"status": "success", "result": {"initialized": false, "enabled": false}})
    );
}

#[test]
fn test_benign_failures_are_successful_responses() {
    let host = host();

    // Not initialized: the call goes through, the result says it had no effect
    let response = request(&host, r#"{"method":"resetBands"}"#);
    assert_eq!(response, json!({"status": "success", "result": false}));

    request(&host, r#"{"method":"initializeEqualizer"}"#);
    let response = request(
        &host,
        r#"{"method":"applyPreset","arguments":{"values":[1,2,3]}}"#,
    );
    assert_eq!(response, json!({"status": "success", "result": false}));
}

#[test]
fn test_unknown_method_not_implemented() {
    let host = host();
    let response = request(&host, r#"{"method":"setLoudness","arguments":{"gain":3}}"#);
    assert_eq!(response, json!({"status": "notImplemented"}));
}

#[test]
fn test_error_codes() {
    let host = host();

    let response = request(&host, "[1, 2, 3]");
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], "INVALID_REQUEST");

    let response = request(
        &host,
        r#"{"method":"setEqualizerEnabled","arguments":{"enabled":"on"}}"#,
    );
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], "INVALID_ARGUMENTS");
    assert!(response["message"].as_str().unwrap().contains("setEqualizerEnabled"));
}

#[test]
fn test_presets_listing() {
    let host = host();
    let response = request(&host, r#"{"method":"getPresets"}"#);
    let presets = response["result"].as_array().unwrap();
    assert_eq!(presets.len(), 9);
    assert!(presets.iter().any(|p| p["name"] == "Jazz"));

    request(&host, r#"{"method":"initializeEqualizer"}"#);
    let response = request(
        &host,
        r#"{"method":"applyNamedPreset","arguments":{"name":"jazz"}}"#,
    );
    assert_eq!(response["result"], json!(true));
}

#[test]
fn test_run_answers_in_order() {
    let host = host();
    let input = [
        r#"{"method":"initializeEqualizer"}"#,
        r#"{"method":"nope"}"#,
        r#"{"method":"setEqualizerEnabled","arguments":{"enabled":true}}"#,
        r#"{"method":"release"}"#,
        r#"{"method":"release"}"#,
    ]
    .join("\n");

    let mut output = Vec::new();
    host.run(input.as_bytes(), &mut output).unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(
        responses,
        vec![
            json!({"status": "success", "result": true}),
            json!({"status": "notImplemented"}),
            json!({"status": "success", "result": true}),
            json!({"status": "success", "result": true}),
            json!({"status": "success", "result": true}),
        ]
    );
    assert!(!host.service().status().unwrap().initialized);
}

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"target_mode": "session", "software": {"band_centers_hz": [100, 1000, 10000], "level_range": {"min_mb": -1200, "max_mb": 1200}, "max_instances": 2}}"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.target_mode, TargetMode::Session);
    assert!(!config.enable_on_initialize);

    let host = Host::new(config).unwrap();
    request(&host, r#"{"method":"initializeEqualizer","arguments":{"audioSessionId":7}}"#);
    let response = request(&host, r#"{"method":"getEqualizerInfo"}"#);
    assert_eq!(response["result"]["numberOfBands"], json!(3));
    assert_eq!(response["result"]["bandLevelRange"], json!([-12.0, 12.0]));
    assert_eq!(response["result"]["target"], json!({"kind": "session", "sessionId": 7}));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
}

#[test]
fn test_out_of_range_band_index_is_ignored_not_an_error() {
    let host = host();
    request(&host, r#"{"method":"initializeEqualizer"}"#);

    for band_index in [-1, 7, 1000] {
        let line = json!({"method": "setBandLevel", "arguments": {"bandIndex": band_index, "level": 3.0}});
        let response = request(&host, &line.to_string());
        assert_eq!(response, json!({"status": "success", "result": false}));
    }

    // Null arguments fall back to their defaults: band 0 at 0 dB
    let response = request(
        &host,
        r#"{"method":"setBandLevel","arguments":{"bandIndex":null,"level":null}}"#,
    );
    assert_eq!(response, json!({"status": "success", "result": true}));
}
