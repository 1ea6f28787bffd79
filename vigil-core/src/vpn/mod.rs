//! VPN connectivity module
//!
//! Asks the external VPN client for its status and issues connect requests.

pub mod probe;
pub mod status_parser;

// Public re-exports
pub use probe::ConnectivityProbe;
pub use status_parser::StatusParser;
