//! Setup command implementation
//!
//! Writes a default configuration file for first-time use.

use vigil_core::config::toml_config::{self, TomlConfig};
use vigil_core::error::VigilError;

/// Run the setup command
pub fn run_setup() -> Result<(), VigilError> {
    let config_path = toml_config::get_config_path()?;

    if toml_config::config_exists()? {
        println!(
            "Existing configuration detected at {}; leaving it in place.",
            config_path.display()
        );
        return Ok(());
    }

    let config = TomlConfig::default();
    toml_config::save_config(&config)?;

    println!("Wrote default configuration to {}", config_path.display());
    println!();
    println!("You can now use:");
    println!("  vigil run     - Start the watchdog");
    println!("  vigil status  - Check VPN connection status");

    Ok(())
}
