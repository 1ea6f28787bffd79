//! The reconciliation loop
//!
//! Ties the connectivity probe and the process table together: each tick
//! decides whether the managed commands should be running or dead, and owns
//! the handles of every process it launched so their zombies can be reaped.

pub mod state;

// Public re-exports
pub use state::{EdgeDetector, LinkState};

use crate::config::{VpnClientConfig, WatchdogConfig};
use crate::error::ProcessError;
use crate::process::{terminate, ProcessTable};
use crate::vpn::ConnectivityProbe;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// VPN-gated process watchdog
///
/// Single logical thread of control: the handle map and the previous
/// connectivity bit are owned exclusively by this struct, which is passed by
/// value into [`Watchdog::run`]. No locks, no ambient globals.
pub struct Watchdog {
    config: WatchdogConfig,
    probe: ConnectivityProbe,
    table: ProcessTable,

    /// Handles for processes this watchdog launched, at most one per
    /// managed command. Needed to reap them once they turn defunct.
    children: HashMap<String, Child>,

    edges: EdgeDetector,
}

impl Watchdog {
    /// Create a watchdog from validated configuration
    pub fn new(config: WatchdogConfig, client: VpnClientConfig) -> Self {
        let table = ProcessTable::new(config.ps_command.clone());

        Self {
            probe: ConnectivityProbe::new(client),
            table,
            children: HashMap::new(),
            edges: EdgeDetector::new(),
            config,
        }
    }

    /// Commands for which this watchdog currently owns a launched handle
    pub fn owned_commands(&self) -> Vec<&str> {
        self.children.keys().map(String::as_str).collect()
    }

    fn owned_set(&self) -> HashSet<String> {
        self.children.keys().cloned().collect()
    }

    /// Reap owned processes the table scan flagged as defunct
    ///
    /// The wait is bounded: a flagged process has already exited, so
    /// collecting its status returns immediately.
    async fn reap_stale(&mut self, stale: &[String]) {
        for name in stale {
            let Some(mut child) = self.children.remove(name) else {
                continue;
            };
            match child.wait().await {
                Ok(status) => debug!(command = %name, %status, "reaped defunct process"),
                Err(e) => warn!(command = %name, "failed to reap defunct process: {}", e),
            }
        }
    }

    /// Launch every managed command that is neither owned nor live
    ///
    /// Returns the commands launched on this tick. A spawn failure is logged
    /// and the handle not recorded; the command stays missing and is retried
    /// on a later tick.
    pub async fn ensure_running(&mut self) -> Result<Vec<String>, ProcessError> {
        let owned = self.owned_set();
        let scan = self
            .table
            .scan(&self.config.managed_commands, &owned)
            .await?;
        self.reap_stale(&scan.stale).await;

        let mut launched = Vec::new();
        for name in &self.config.managed_commands {
            if self.children.contains_key(name) || scan.live.contains_key(name) {
                continue;
            }

            info!("starting {}...", name);
            match Command::new(name).stdin(Stdio::null()).spawn() {
                Ok(child) => {
                    self.children.insert(name.clone(), child);
                    launched.push(name.clone());
                }
                Err(e) => warn!("failed to start {}: {}", name, e),
            }
        }

        Ok(launched)
    }

    /// Terminate every live process matching a managed command
    ///
    /// The table is re-listed immediately before killing; pids are never
    /// cached across ticks. Already-exited pids are tolerated, and a per-pid
    /// failure never stops the sweep. Returns the number of pids signalled,
    /// so killing with nothing running is a no-op reporting zero.
    pub async fn kill_all(&mut self) -> Result<usize, ProcessError> {
        let owned = self.owned_set();
        let scan = self
            .table
            .scan(&self.config.managed_commands, &owned)
            .await?;
        self.reap_stale(&scan.stale).await;

        let mut signalled = 0;
        for name in &self.config.managed_commands {
            let Some(pids) = scan.live.get(name) else {
                continue;
            };

            info!("killing {} {:?}...", name, pids);
            for &pid in pids {
                match terminate(pid) {
                    Ok(()) => signalled += 1,
                    Err(ProcessError::NoSuchProcess { .. }) => {
                        debug!(command = %name, pid, "process already exited")
                    }
                    Err(e) => warn!(command = %name, pid, "failed to kill: {}", e),
                }
            }
        }

        Ok(signalled)
    }

    /// One iteration of the reconciliation loop
    ///
    /// A failed status probe is treated as disconnected: inability to confirm
    /// the tunnel is up must never be read as up. A failed table scan skips
    /// reconciliation for this cycle; the next tick retries.
    async fn tick(&mut self) {
        let connected = match self.probe.check_status().await {
            Ok(connected) => connected,
            Err(e) => {
                warn!("status probe failed, treating link as down: {}", e);
                false
            }
        };

        if connected {
            if let Some(edge) = self.edges.observe(LinkState::Up) {
                info!("VPN link is {}", edge);
            }

            if let Err(e) = self.ensure_running().await {
                warn!("skipping reconciliation this tick: {}", e);
            }

            sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
        } else {
            if let Some(edge) = self.edges.observe(LinkState::Down) {
                info!("VPN link is {}", edge);
            }

            if let Err(e) = self.kill_all().await {
                warn!("skipping reconciliation this tick: {}", e);
            }

            debug!("requesting VPN connect");
            if let Err(e) = self.probe.request_connect() {
                warn!("connect request failed: {}", e);
            }

            // No sleep here: while the link is down the loop re-polls at
            // maximum rate so a reconnect is noticed as soon as the client
            // reports it.
        }
    }

    /// Run the loop until `shutdown` resolves
    ///
    /// Whatever state the loop is in when shutdown arrives, the final
    /// kill-all runs exactly once before this returns: no managed process is
    /// left running unsupervised after the watchdog itself stops.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "watchdog started, managing {:?}, polling every {}s",
            self.config.managed_commands, self.config.poll_interval_secs
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.tick() => {}
            }
        }

        self.shutdown_cleanup().await;
    }

    /// Terminal kill-all, run exactly once as the last action
    ///
    /// Must complete all planned terminations regardless of individual
    /// failures. If even the table listing fails, the handles this watchdog
    /// owns are killed directly so nothing it launched outlives it.
    pub async fn shutdown_cleanup(mut self) {
        info!("watchdog stopping, killing managed processes");

        match self.kill_all().await {
            Ok(signalled) => {
                info!("shutdown cleanup complete, signalled {} process(es)", signalled)
            }
            Err(e) => {
                warn!("process listing failed during shutdown: {}", e);
                for (name, mut child) in self.children.drain() {
                    match child.kill().await {
                        Ok(()) => info!("killed {} via its owned handle", name),
                        Err(e) => warn!("failed to kill {}: {}", name, e),
                    }
                }
            }
        }
    }
}
