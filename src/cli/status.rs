//! Status command
//!
//! One-shot probe of the VPN client, with the exit code mirroring the result.

use colored::Colorize;
use vigil_core::config::toml_config;
use vigil_core::error::VigilError;
use vigil_core::vpn::ConnectivityProbe;

/// Run the status command
///
/// Exits 0 when the client reports Connected, 1 otherwise.
pub fn run_status() -> Result<(), VigilError> {
    let config = toml_config::load_config()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let connected = runtime.block_on(async {
        let probe = ConnectivityProbe::new(config.vpn_client);
        probe.check_status().await
    })?;

    if connected {
        println!("{}", "Connected".green());
        Ok(())
    } else {
        println!("{}", "Disconnected".red());
        std::process::exit(1);
    }
}
