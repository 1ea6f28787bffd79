// Integration tests for ConnectivityProbe
//
// The probe is exercised against real subprocesses by pointing the client
// configuration at stock tools (echo, true) instead of an actual VPN client.

use vigil_core::config::VpnClientConfig;
use vigil_core::error::ProbeError;
use vigil_core::vpn::ConnectivityProbe;

fn client(program: &str, status_args: &[&str]) -> VpnClientConfig {
    VpnClientConfig {
        program: program.to_string(),
        status_args: status_args.iter().map(|s| s.to_string()).collect(),
        connect_args: vec![],
    }
}

#[tokio::test]
async fn test_check_status_connected() {
    let probe = ConnectivityProbe::new(client("echo", &["Status: Connected"]));
    assert!(probe.check_status().await.unwrap());
}

#[tokio::test]
async fn test_check_status_disconnected() {
    let probe = ConnectivityProbe::new(client("echo", &["Status: Disconnected"]));
    assert!(!probe.check_status().await.unwrap());
}

#[tokio::test]
async fn test_check_status_empty_output_is_down_not_error() {
    // `true` produces no output at all; the probe must report down, not fail
    let probe = ConnectivityProbe::new(client("true", &[]));
    assert!(!probe.check_status().await.unwrap());
}

#[tokio::test]
async fn test_check_status_missing_client_is_an_error() {
    let probe = ConnectivityProbe::new(client("vigil-test-no-such-client", &["status"]));
    let result = probe.check_status().await;
    assert!(matches!(result, Err(ProbeError::StatusQueryFailed { .. })));
}

#[tokio::test]
async fn test_request_connect_fire_and_forget() {
    let probe = ConnectivityProbe::new(client("true", &[]));
    probe.request_connect().unwrap();
}

#[tokio::test]
async fn test_request_connect_missing_client_is_an_error() {
    let probe = ConnectivityProbe::new(client("vigil-test-no-such-client", &[]));
    let result = probe.request_connect();
    assert!(matches!(result, Err(ProbeError::ConnectFailed { .. })));
}
