//! Error types for the vigil watchdog
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the vigil application
#[derive(Error, Debug)]
pub enum VigilError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to the VPN client status/connect commands
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Errors related to process table queries and signaling
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// VPN client probe errors
///
/// All of these degrade to "not connected" in the reconciliation loop;
/// none of them terminate the watchdog.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to run status command: {reason}")]
    StatusQueryFailed { reason: String },

    #[error("Failed to run connect command: {reason}")]
    ConnectFailed { reason: String },
}

/// Process table and signaling errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to list processes: {reason}")]
    ListingFailed { reason: String },

    /// The target pid exited between listing and signaling. Callers must
    /// tolerate this; the race is inherent to pid-based termination.
    #[error("No such process: {pid}")]
    NoSuchProcess { pid: u32 },

    #[error("Failed to signal process {pid}: {reason}")]
    SignalFailed { pid: u32, reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VigilError>;
