/*!
 * Setup Stage
 * Identifier validation and handle opening
 */

use crate::core::{Pid, WaitError, WaitResult};
use crate::pidfd::PidFd;
use crate::wait::types::HandleSet;
use tracing::debug;

/// Result of the setup stage: either every pid was opened, or some pid had
/// no live process and the run is already decided.
#[derive(Debug)]
pub enum Setup {
    /// All handles open, in input order. Ownership passes to the race.
    Ready(HandleSet),
    /// The first pid with no live process. Everything opened before it has
    /// been released; nothing is left open.
    NotFound(Pid),
}

/// Validate raw arguments as positive pids, before anything is opened.
pub fn parse_pids(args: &[String]) -> WaitResult<Vec<Pid>> {
    let mut pids = Vec::with_capacity(args.len());
    for arg in args {
        let pid: Pid = arg
            .parse()
            .map_err(|_| WaitError::InvalidPid(arg.clone()))?;
        if pid == 0 {
            return Err(WaitError::InvalidPid(arg.clone()));
        }
        pids.push(pid);
    }
    Ok(pids)
}

/// Open a handle per pid, in input order.
///
/// Stops at the first pid with no live process: the opened prefix is
/// dropped (which releases it) and that pid becomes the result. Setup never
/// distinguishes "exited before open" from "never existed". Any other open
/// failure propagates as a fault.
pub fn open_all(pids: &[Pid]) -> WaitResult<Setup> {
    let mut handles = Vec::with_capacity(pids.len());
    for &pid in pids {
        match PidFd::open(pid) {
            Ok(handle) => handles.push(handle),
            Err(WaitError::NotFound(pid)) => {
                debug!(pid, opened = handles.len(), "pid not found during setup");
                return Ok(Setup::NotFound(pid));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(Setup::Ready(HandleSet::new(handles)))
}
