//! Connectivity probe for the external VPN client
//!
//! The client is invoked as two opaque commands: a status query whose output
//! is parsed for a `Status: <word>` line, and a fire-and-forget connect
//! request whose outcome is only ever observed through a later status query.

use crate::config::VpnClientConfig;
use crate::error::ProbeError;
use crate::vpn::StatusParser;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Queries and nudges the external VPN client
pub struct ConnectivityProbe {
    config: VpnClientConfig,
    parser: StatusParser,
}

impl ConnectivityProbe {
    /// Create a new probe for the configured client
    pub fn new(config: VpnClientConfig) -> Self {
        Self {
            config,
            parser: StatusParser::new(),
        }
    }

    /// Ask the client whether the tunnel is up
    ///
    /// Returns `Ok(true)` iff the client reports `Status: Connected`.
    /// A non-zero exit code or unparseable output yields `Ok(false)`;
    /// only a failure to run the status command at all is an error.
    pub async fn check_status(&self) -> Result<bool, ProbeError> {
        let output = Command::new(&self.config.program)
            .args(&self.config.status_args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ProbeError::StatusQueryFailed {
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(program = %self.config.program, "status query output: {}", stdout.trim());

        Ok(self.parser.parse(&stdout))
    }

    /// Ask the client to (re)connect, without waiting for the outcome
    ///
    /// Connection establishment is asynchronous and may take longer than one
    /// poll interval, so the client process is reaped in a detached task and
    /// the next status query is the sole source of truth.
    pub fn request_connect(&self) -> Result<(), ProbeError> {
        let mut child = Command::new(&self.config.program)
            .args(&self.config.connect_args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| ProbeError::ConnectFailed {
                reason: e.to_string(),
            })?;

        tokio::spawn(async move {
            let _ = child.wait().await;
        });

        Ok(())
    }
}
