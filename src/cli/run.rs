//! Watchdog run command
//!
//! Loads configuration, applies CLI overrides, and drives the reconciliation
//! loop until an external termination signal arrives.

use clap::Args;
use tracing::warn;
use vigil_core::config::toml_config::{self, TomlConfig};
use vigil_core::error::VigilError;
use vigil_core::watchdog::Watchdog;

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Poll interval in seconds while connected
    #[arg(long)]
    pub interval: Option<u64>,

    /// Managed command; repeat to override the configured set
    #[arg(long = "command")]
    pub commands: Vec<String>,

    /// VPN client program
    #[arg(long = "vpn-client")]
    pub vpn_client: Option<String>,
}

/// Run the watchdog until SIGINT or SIGTERM
pub fn run_watchdog(args: RunArgs) -> Result<(), VigilError> {
    let mut config = toml_config::load_config()?;

    if let Some(interval) = args.interval {
        config.watchdog.poll_interval_secs = interval;
    }
    if !args.commands.is_empty() {
        config.watchdog.managed_commands = args.commands;
    }
    if let Some(program) = args.vpn_client {
        config.vpn_client.program = program;
    }

    config.validate()?;
    preflight(&config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let watchdog = Watchdog::new(config.watchdog, config.vpn_client);
        watchdog.run(shutdown_signal()).await;
    });

    Ok(())
}

/// Warn about programs missing from PATH
///
/// A missing program is not fatal: the VPN client may be installed later,
/// and a spawn failure is retried on every tick anyway.
fn preflight(config: &TomlConfig) {
    if which::which(&config.vpn_client.program).is_err() {
        warn!(
            "VPN client '{}' not found in PATH",
            config.vpn_client.program
        );
    }

    for cmd in &config.watchdog.managed_commands {
        if which::which(cmd).is_err() {
            warn!("managed command '{}' not found in PATH", cmd);
        }
    }
}

/// Resolve when the process receives SIGINT or SIGTERM
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let ctrl_c = tokio::signal::ctrl_c();

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        Err(_) => {
            let _ = ctrl_c.await;
        }
    }
}
