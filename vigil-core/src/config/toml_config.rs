//! TOML configuration file I/O
//!
//! Handles loading and saving watchdog configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::{VpnClientConfig, WatchdogConfig};
use crate::error::{ConfigError, VigilError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete TOML configuration structure
///
/// Contains both watchdog settings and the VPN client command configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Reconciliation loop settings
    #[serde(rename = "watchdog", default)]
    pub watchdog: WatchdogConfig,

    /// External VPN client commands
    #[serde(rename = "vpn_client", default)]
    pub vpn_client: VpnClientConfig,
}

impl TomlConfig {
    /// Create a new TOML configuration
    pub fn new(watchdog: WatchdogConfig, vpn_client: VpnClientConfig) -> Self {
        Self {
            watchdog,
            vpn_client,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, VigilError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VigilError::Config(ConfigError::LoadFailed {
                path: path.to_string_lossy().to_string(),
            }),
            _ => VigilError::Config(ConfigError::IoError {
                message: format!("Failed to read config file: {}", e),
            }),
        })?;

        let config: TomlConfig = toml::from_str(&contents).map_err(|e| {
            VigilError::Config(ConfigError::ValidationError {
                message: format!("Failed to parse config file: {}", e),
            })
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), VigilError> {
        self.validate()?;

        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VigilError::Config(ConfigError::IoError {
                    message: format!("Failed to create config directory: {}", e),
                })
            })?;
        }

        std::fs::write(path, contents).map_err(|_e| {
            VigilError::Config(ConfigError::SaveFailed {
                path: path.to_string_lossy().to_string(),
            })
        })?;

        Ok(())
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<(), VigilError> {
        self.watchdog
            .validate()
            .map_err(|e| VigilError::Config(ConfigError::ValidationError { message: e }))?;
        self.vpn_client
            .validate()
            .map_err(|e| VigilError::Config(ConfigError::ValidationError { message: e }))?;
        Ok(())
    }
}

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns ~/.config/vigil on Linux, or VIGIL_CONFIG_DIR environment
/// variable if set.
pub fn get_config_dir() -> Result<PathBuf, VigilError> {
    // Allow tests to override config directory via environment variable
    if let Ok(config_dir) = std::env::var("VIGIL_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        VigilError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    let config_dir = PathBuf::from(home).join(".config").join("vigil");
    Ok(config_dir)
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, VigilError> {
    let config_dir = get_config_dir()?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default TOML file
///
/// A missing file is not an error: the watchdog must be able to run
/// unconfigured, so defaults are returned instead.
pub fn load_config() -> Result<TomlConfig, VigilError> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        return Ok(TomlConfig::default());
    }
    TomlConfig::from_file(&config_path)
}

/// Save configuration to the default TOML file
pub fn save_config(config: &TomlConfig) -> Result<(), VigilError> {
    let config_path = get_config_path()?;
    config.to_file(&config_path)
}

/// Check if a configuration file exists
pub fn config_exists() -> Result<bool, VigilError> {
    let config_path = get_config_path()?;
    Ok(config_path.exists())
}
