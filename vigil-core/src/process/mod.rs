//! Process table module
//!
//! Queries the OS process table for tracked command names and provides the
//! termination primitive used to enforce the kill switch.

pub mod signal;
pub mod table;

// Public re-exports
pub use signal::terminate;
pub use table::{ProcessScan, ProcessTable, TableParser};
