//! vigil - VPN-gated process watchdog
//!
//! A targeted kill switch: certain processes are only allowed to run while
//! the VPN is connected, and are restarted once it reconnects.

use clap::{Parser, Subcommand};
use vigil_core::{error::VigilError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "VPN-gated process watchdog with a targeted kill switch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the watchdog loop
    Run(cli::run::RunArgs),
    /// Show VPN connection status
    Status,
    /// Write a default configuration file
    Setup,
}

fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cli::run::run_watchdog(args),
        Commands::Status => cli::status::run_status(),
        Commands::Setup => cli::setup::run_setup(),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration errors (exit code 2)
                VigilError::Config(_) | VigilError::Toml(_) | VigilError::TomlSerialize(_) => 2,
                // Runtime errors (exit code 1)
                VigilError::Probe(_) | VigilError::Process(_) | VigilError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
