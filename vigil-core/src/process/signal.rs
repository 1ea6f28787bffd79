//! Process termination primitive
//!
//! Sends the immediate, non-gracable kill signal used by the kill switch.

use crate::error::ProcessError;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

/// Send SIGKILL to a pid
///
/// Returns `ProcessError::NoSuchProcess` if the target exited between
/// listing and signaling; callers must treat that as non-fatal.
pub fn terminate(pid: u32) -> Result<(), ProcessError> {
    let raw = i32::try_from(pid).map_err(|_| ProcessError::NoSuchProcess { pid })?;

    match kill(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) => Ok(()),
        Err(nix::errno::Errno::ESRCH) => Err(ProcessError::NoSuchProcess { pid }),
        Err(e) => Err(ProcessError::SignalFailed {
            pid,
            reason: e.to_string(),
        }),
    }
}
