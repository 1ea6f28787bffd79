//! Configuration module
//!
//! Handles loading and saving watchdog configuration from TOML files.

use serde::{Deserialize, Serialize};

pub mod toml_config;

/// Watchdog configuration structure
///
/// Controls the reconciliation loop: how often to poll while connected and
/// which commands are gated on VPN connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// Seconds to sleep between ticks while the VPN is connected.
    /// While disconnected the loop re-polls at maximum rate.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Executable names that may only run while the VPN is connected.
    /// Each entry is spawned as-is (no arguments) and matched against the
    /// process table by substring.
    #[serde(default = "default_managed_commands")]
    pub managed_commands: Vec<String>,

    /// Command used to list the OS process table, producing
    /// `<pid> <command-and-args>` lines.
    #[serde(default = "default_ps_command")]
    pub ps_command: Vec<String>,
}

/// External VPN client configuration
///
/// The client is opaque: a status command whose output contains a
/// `Status: <word>` line, and a connect command with no output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnClientConfig {
    /// VPN client program name or path
    #[serde(default = "default_client_program")]
    pub program: String,

    /// Arguments for the status query
    #[serde(default = "default_status_args")]
    pub status_args: Vec<String>,

    /// Arguments for the connect request
    #[serde(default = "default_connect_args")]
    pub connect_args: Vec<String>,
}

fn default_poll_interval() -> u64 {
    20
}

fn default_managed_commands() -> Vec<String> {
    vec!["deluged".to_string(), "deluge-web".to_string()]
}

fn default_ps_command() -> Vec<String> {
    vec!["ps".to_string(), "-x".to_string()]
}

fn default_client_program() -> String {
    "nordvpn".to_string()
}

fn default_status_args() -> Vec<String> {
    vec!["status".to_string()]
}

fn default_connect_args() -> Vec<String> {
    vec!["connect".to_string()]
}

impl WatchdogConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("Poll interval cannot be zero".to_string());
        }

        if self.managed_commands.is_empty() {
            return Err("Managed command list cannot be empty".to_string());
        }

        for cmd in &self.managed_commands {
            if cmd.trim().is_empty() {
                return Err("Managed command name cannot be empty".to_string());
            }
        }

        // No two entries identical
        let mut seen = std::collections::HashSet::new();
        for cmd in &self.managed_commands {
            if !seen.insert(cmd.as_str()) {
                return Err(format!("Duplicate managed command: {}", cmd));
            }
        }

        if self.ps_command.is_empty() {
            return Err("Process listing command cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            managed_commands: default_managed_commands(),
            ps_command: default_ps_command(),
        }
    }
}

impl VpnClientConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("VPN client program cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for VpnClientConfig {
    fn default() -> Self {
        Self {
            program: default_client_program(),
            status_args: default_status_args(),
            connect_args: default_connect_args(),
        }
    }
}
