//! Pattern-based parser for VPN client status output
//!
//! Extracts the connectivity state from the client's `Status: <word>` line.

use regex::Regex;

/// Parser for the VPN client's status output
pub struct StatusParser {
    /// Pattern for "Status: Connected"
    status_pattern: Regex,
}

impl StatusParser {
    /// Create a new StatusParser with a compiled regex pattern
    pub fn new() -> Self {
        Self {
            status_pattern: Regex::new(r"Status: (\w+)")
                .expect("Failed to compile status pattern"),
        }
    }

    /// Parse captured client output into a connectivity boolean
    ///
    /// Returns true iff the captured status word is exactly "Connected".
    /// Any other word, or no match at all, is treated as not connected:
    /// an ambiguous status must never be read as a confirmed tunnel.
    pub fn parse(&self, output: &str) -> bool {
        self.status_pattern
            .captures(output)
            .and_then(|captures| captures.get(1))
            .map(|word| word.as_str() == "Connected")
            .unwrap_or(false)
    }
}

impl Default for StatusParser {
    fn default() -> Self {
        Self::new()
    }
}
