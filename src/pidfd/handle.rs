/*!
 * Process Handle
 * Watchable pidfd reference with idempotent release
 */

use crate::core::{Pid, WaitError, WaitResult};
use nix::errno::Errno;
use nix::libc;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::unistd::pipe;
use parking_lot::Mutex;
use std::os::fd::{AsFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use tracing::debug;

/// An open, exclusively-owned watch on one process.
///
/// The pidfd becomes readable when the process terminates; it is never
/// actually read, only polled. Alongside it the handle owns a small pipe
/// used as a release latch: `release` drops the write end, which makes the
/// read end poll readable (`POLLHUP`) and unblocks a waiter parked on this
/// handle. Both descriptors close when the handle is dropped.
///
/// Watching a pid says nothing about pid reuse: if the original process
/// exits and the pid is recycled between open and wait, the wait observes
/// the impostor. Detecting that is out of scope here.
#[derive(Debug)]
pub struct PidFd {
    pid: Pid,
    pidfd: OwnedFd,
    cancel_rx: OwnedFd,
    cancel_tx: Mutex<Option<OwnedFd>>,
}

impl PidFd {
    /// Open a watchable reference to the process with the given pid.
    ///
    /// Fails with [`WaitError::NotFound`] if no such process exists at the
    /// instant of the call. Any other failure is a fault, not a result.
    pub fn open(pid: Pid) -> WaitResult<Self> {
        // nix has no pidfd_open wrapper; call the syscall directly.
        let ret = unsafe { libc::syscall(libc::SYS_pidfd_open, pid as libc::pid_t, 0u32) };
        if ret < 0 {
            return Err(WaitError::from_errno("pidfd_open", pid, Errno::last()));
        }
        let pidfd = unsafe { OwnedFd::from_raw_fd(ret as RawFd) };

        let (cancel_rx, cancel_tx) =
            pipe().map_err(|errno| WaitError::Syscall { op: "pipe", errno })?;

        debug!(pid, "opened pidfd");
        Ok(Self {
            pid,
            pidfd,
            cancel_rx,
            cancel_tx: Mutex::new(Some(cancel_tx)),
        })
    }

    #[inline]
    #[must_use]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Non-blocking readiness query: has the process terminated?
    ///
    /// This is a zero-timeout poll of the pidfd. It doubles as the priming
    /// call that arms the level-triggered watch and as the confirming call
    /// issued once the blocking poll reports readiness.
    pub fn is_ready(&self) -> WaitResult<bool> {
        let mut fds = [PollFd::new(self.pidfd.as_fd(), PollFlags::POLLIN)];
        loop {
            match poll(&mut fds, PollTimeout::ZERO) {
                Ok(_) => break,
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(WaitError::Syscall { op: "poll", errno }),
            }
        }
        let revents = fds[0].revents().unwrap_or_else(PollFlags::empty);
        if revents.intersects(PollFlags::POLLERR | PollFlags::POLLNVAL) {
            return Err(WaitError::Invariant(format!(
                "pidfd for pid {} reported {:?}",
                self.pid, revents
            )));
        }
        Ok(revents.intersects(PollFlags::POLLIN | PollFlags::POLLHUP))
    }

    /// Release the handle, unblocking any waiter parked on it.
    ///
    /// Idempotent: the first call drops the latch write end, later calls
    /// are no-ops. Safe to call concurrently with an in-flight wait and
    /// with another release of the same handle.
    pub fn release(&self) {
        if self.cancel_tx.lock().take().is_some() {
            debug!(pid = self.pid, "released handle");
        }
    }

    /// Whether `release` has been called.
    #[inline]
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.cancel_tx.lock().is_none()
    }

    pub(crate) fn process_fd(&self) -> BorrowedFd<'_> {
        self.pidfd.as_fd()
    }

    pub(crate) fn cancel_fd(&self) -> BorrowedFd<'_> {
        self.cancel_rx.as_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::process::Command;

    fn spawn_sleep(secs: &str) -> std::process::Child {
        Command::new("sleep")
            .arg(secs)
            .spawn()
            .expect("spawn sleep")
    }

    #[test]
    fn test_open_missing_pid_is_not_found() {
        // pid_max is at most 2^22 by default; this pid cannot exist.
        let err = PidFd::open(999_999_999).unwrap_err();
        assert_eq!(err, WaitError::NotFound(999_999_999));
    }

    #[test]
    fn test_running_process_is_not_ready() {
        let mut child = spawn_sleep("5");
        let handle = PidFd::open(child.id()).unwrap();
        assert!(!handle.is_ready().unwrap());

        child.kill().unwrap();
        child.wait().unwrap();
    }

    #[test]
    fn test_unreaped_process_is_ready() {
        let mut child = spawn_sleep("0");
        let handle = PidFd::open(child.id()).unwrap();

        // Zombies count as terminated; poll until the exit is visible.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !handle.is_ready().unwrap() {
            assert!(std::time::Instant::now() < deadline, "sleep 0 never terminated");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        child.wait().unwrap();
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut child = spawn_sleep("5");
        let handle = PidFd::open(child.id()).unwrap();

        assert!(!handle.is_released());
        handle.release();
        assert!(handle.is_released());
        handle.release();
        assert!(handle.is_released());

        child.kill().unwrap();
        child.wait().unwrap();
    }
}
