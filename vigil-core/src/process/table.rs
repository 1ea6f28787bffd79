//! Process table snapshots
//!
//! Runs the OS process listing command and classifies entries matching the
//! tracked command names as live or defunct.

use crate::error::ProcessError;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Marker substring the process listing uses for zombie processes
const DEFUNCT_MARKER: &str = "<defunct>";

/// Parser for process listing lines
pub struct TableParser {
    /// Pattern for `<pid> <command-and-args>` lines
    line_pattern: Regex,
}

impl TableParser {
    /// Create a new TableParser with a compiled regex pattern
    pub fn new() -> Self {
        Self {
            line_pattern: Regex::new(r"^\s*(\d+) (.*)$")
                .expect("Failed to compile process line pattern"),
        }
    }

    /// Parse one listing line into (pid, command-line text)
    ///
    /// Returns None for header lines and anything else that does not match;
    /// malformed lines are skipped, never fatal.
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<(u32, &'a str)> {
        let captures = self.line_pattern.captures(line)?;
        let pid = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let details = captures.get(2)?.as_str();
        Some((pid, details))
    }
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One read-only snapshot of the process table, filtered to tracked names
///
/// Recomputed on every tick; never cached across ticks, to keep the window
/// between listing and signaling as short as possible.
#[derive(Debug, Default)]
pub struct ProcessScan {
    /// Live pids per tracked name, in order of discovery
    pub live: HashMap<String, Vec<u32>>,

    /// Tracked names whose owned process is defunct and must be reaped by
    /// the handle owner. The scan itself holds no handles; it only flags.
    pub stale: Vec<String>,
}

/// Queries the OS process table via an external listing command
pub struct ProcessTable {
    command: Vec<String>,
    parser: TableParser,
}

impl ProcessTable {
    /// Create a table adapter using the given listing command
    ///
    /// The first element is the program, the rest its arguments
    /// (default `ps -x`).
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            parser: TableParser::new(),
        }
    }

    /// Take a snapshot of the table, filtered to `tracked` names
    ///
    /// Matching is substring containment over the command-line text, not an
    /// exact argv match; a tracked name occurring in an unrelated process's
    /// arguments will match too. Defunct entries for a name in `owned` are
    /// reported in `stale`; defunct entries nobody owns are dropped.
    ///
    /// Fails only if the listing command itself fails to run.
    pub async fn scan(
        &self,
        tracked: &[String],
        owned: &HashSet<String>,
    ) -> Result<ProcessScan, ProcessError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| ProcessError::ListingFailed {
                reason: "empty process listing command".to_string(),
            })?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ProcessError::ListingFailed {
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut result = ProcessScan::default();

        for line in stdout.lines() {
            let Some((pid, details)) = self.parser.parse_line(line) else {
                continue;
            };

            for name in tracked {
                if !details.contains(name.as_str()) {
                    continue;
                }

                if details.contains(DEFUNCT_MARKER) {
                    if owned.contains(name) && !result.stale.contains(name) {
                        debug!(command = %name, pid, "owned process is defunct");
                        result.stale.push(name.clone());
                    }
                    // Zombies nobody owns cannot be reaped from here.
                } else {
                    result.live.entry(name.clone()).or_default().push(pid);
                }
            }
        }

        Ok(result)
    }
}
