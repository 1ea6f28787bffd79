// Integration tests for the reconciliation loop
//
// The watchdog is driven against real subprocesses: the process listing is
// pointed at `printf` for deterministic table text, and managed commands are
// stock tools (true, sleep) so launches and kills really happen.

use std::os::unix::process::ExitStatusExt;
use std::time::Duration;
use vigil_core::config::{VpnClientConfig, WatchdogConfig};
use vigil_core::watchdog::Watchdog;

fn fake_table(text: &str) -> Vec<String> {
    vec!["printf".to_string(), "%s".to_string(), text.to_string()]
}

fn watchdog_with(table_command: Vec<String>, managed: &[&str]) -> Watchdog {
    let config = WatchdogConfig {
        poll_interval_secs: 1,
        managed_commands: managed.iter().map(|s| s.to_string()).collect(),
        ps_command: table_command,
    };
    let client = VpnClientConfig {
        program: "true".to_string(),
        status_args: vec![],
        connect_args: vec![],
    };
    Watchdog::new(config, client)
}

#[tokio::test]
async fn test_kill_all_is_idempotent_with_nothing_running() {
    let mut watchdog = watchdog_with(fake_table("  1 init\n"), &["deluged"]);

    assert_eq!(watchdog.kill_all().await.unwrap(), 0);
    assert_eq!(watchdog.kill_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_kill_all_signals_live_listed_pid() {
    // A real process, listed under a managed name, must get SIGKILL
    let mut victim = tokio::process::Command::new("sleep")
        .arg("300")
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn victim process");
    let pid = victim.id().expect("victim has no pid");

    let table = fake_table(&format!(" {} sleep 300\n", pid));
    let mut watchdog = watchdog_with(table, &["sleep"]);

    assert_eq!(watchdog.kill_all().await.unwrap(), 1);

    let status = victim.wait().await.unwrap();
    assert_eq!(status.signal(), Some(9));
}

#[tokio::test]
async fn test_kill_all_tolerates_already_exited_pid() {
    // Far beyond pid_max, so the terminate must hit ESRCH and be tolerated
    let mut watchdog = watchdog_with(fake_table(" 99999999 deluged\n"), &["deluged"]);

    assert_eq!(watchdog.kill_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ensure_running_launches_missing_command_once() {
    let mut watchdog = watchdog_with(fake_table("  1 init\n"), &["true"]);

    let launched = watchdog.ensure_running().await.unwrap();
    assert_eq!(launched, vec!["true".to_string()]);
    assert_eq!(watchdog.owned_commands(), vec!["true"]);

    // A second tick with the handle still owned must not launch again
    let launched = watchdog.ensure_running().await.unwrap();
    assert!(launched.is_empty());
}

#[tokio::test]
async fn test_ensure_running_skips_externally_live_command() {
    // Already present in the table without an owned handle: not ours to start
    let mut watchdog = watchdog_with(fake_table(" 123 deluged\n"), &["deluged"]);

    let launched = watchdog.ensure_running().await.unwrap();
    assert!(launched.is_empty());
    assert!(watchdog.owned_commands().is_empty());
}

#[tokio::test]
async fn test_ensure_running_tolerates_spawn_failure() {
    // Spawn failure is logged and retried on a later tick; no handle recorded
    let mut watchdog = watchdog_with(
        fake_table("  1 init\n"),
        &["vigil-test-no-such-command"],
    );

    let launched = watchdog.ensure_running().await.unwrap();
    assert!(launched.is_empty());
    assert!(watchdog.owned_commands().is_empty());
}

#[tokio::test]
async fn test_owned_zombie_is_reaped_and_relaunched() {
    // First tick launches `true`, which exits immediately and turns defunct.
    let mut watchdog = watchdog_with(fake_table(" 555 true <defunct>\n"), &["true"]);

    let launched = watchdog.ensure_running().await.unwrap();
    assert_eq!(launched, vec!["true".to_string()]);

    // Give the child a moment to exit
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Next tick sees the defunct entry, reaps the handle without blocking,
    // and relaunches the now-missing command.
    let launched = watchdog.ensure_running().await.unwrap();
    assert_eq!(launched, vec!["true".to_string()]);
    assert_eq!(watchdog.owned_commands(), vec!["true"]);
}

#[tokio::test]
async fn test_kill_all_reaps_owned_zombie() {
    let mut watchdog = watchdog_with(fake_table(" 555 true <defunct>\n"), &["true"]);

    // Launch via a tick that sees only the defunct line (no live entry)
    watchdog.ensure_running().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Nothing live to signal; the owned handle must be reaped and dropped
    assert_eq!(watchdog.kill_all().await.unwrap(), 0);
    assert!(watchdog.owned_commands().is_empty());
}

#[tokio::test]
async fn test_reconcile_skipped_when_listing_fails() {
    let mut watchdog = watchdog_with(
        vec!["vigil-test-no-such-listing".to_string()],
        &["deluged"],
    );

    assert!(watchdog.ensure_running().await.is_err());
    assert!(watchdog.kill_all().await.is_err());
}

#[tokio::test]
async fn test_run_performs_final_cleanup_on_shutdown() {
    let config = WatchdogConfig {
        poll_interval_secs: 1,
        managed_commands: vec!["true".to_string()],
        ps_command: fake_table("  1 init\n"),
    };
    // Client that always reports connected
    let client = VpnClientConfig {
        program: "echo".to_string(),
        status_args: vec!["Status: Connected".to_string()],
        connect_args: vec![],
    };
    let watchdog = Watchdog::new(config, client);

    // The loop must exit and run its terminal cleanup when shutdown fires
    tokio::time::timeout(
        Duration::from_secs(5),
        watchdog.run(async {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }),
    )
    .await
    .expect("watchdog did not shut down in time");
}
