/*!
 * Readiness Waiter
 * Blocks one thread on a single handle until termination or release
 */

use crate::core::{WaitError, WaitResult};
use crate::pidfd::PidFd;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::debug;

/// Waiter lifecycle.
///
/// A waiter moves `NotStarted -> Armed` once the priming query has been
/// issued, then settles in exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterState {
    NotStarted,
    Armed,
    /// The watched process terminated.
    Terminated,
    /// The handle was released from another thread. Not an error: the
    /// waiter exits quietly.
    Cancelled,
    /// The underlying poll misbehaved. Defect signal.
    Errored,
}

/// One blocking wait on one handle.
pub struct Waiter<'a> {
    handle: &'a PidFd,
    state: WaiterState,
}

impl<'a> Waiter<'a> {
    #[must_use]
    pub fn new(handle: &'a PidFd) -> Self {
        Self {
            handle,
            state: WaiterState::NotStarted,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> WaiterState {
        self.state
    }

    /// Block until the process terminates or the handle is released.
    ///
    /// The pidfd is level-triggered but must be queried once before a
    /// blocking poll will correctly report it: the priming query's "not
    /// yet" answer is discarded, and termination is only reported after a
    /// second query confirms it. This two-call discipline is a requirement
    /// of the primitive, not an optimization.
    ///
    /// Returns the terminal state; consumes the waiter's single shot.
    pub fn wait(&mut self) -> WaitResult<WaiterState> {
        debug_assert_eq!(self.state, WaiterState::NotStarted, "waiter reused");

        match self.handle.is_ready() {
            Ok(_) => self.state = WaiterState::Armed,
            Err(err) => {
                self.state = WaiterState::Errored;
                return Err(err);
            }
        }

        loop {
            let mut fds = [
                PollFd::new(self.handle.process_fd(), PollFlags::POLLIN),
                PollFd::new(self.handle.cancel_fd(), PollFlags::POLLIN),
            ];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(Errno::EINTR) => continue,
                Err(errno) => {
                    self.state = WaiterState::Errored;
                    return Err(WaitError::Syscall { op: "poll", errno });
                }
            }

            let process_ev = fds[0].revents().unwrap_or_else(PollFlags::empty);
            let cancel_ev = fds[1].revents().unwrap_or_else(PollFlags::empty);

            if process_ev.intersects(PollFlags::POLLERR | PollFlags::POLLNVAL) {
                self.state = WaiterState::Errored;
                return Err(WaitError::Invariant(format!(
                    "pidfd for pid {} reported {:?} while armed",
                    self.handle.pid(),
                    process_ev
                )));
            }

            // Termination is checked before cancellation: a handle that is
            // both done and released reports Terminated, and a late post is
            // dropped by the result slot anyway.
            if process_ev.intersects(PollFlags::POLLIN | PollFlags::POLLHUP) {
                match self.handle.is_ready() {
                    Ok(true) => {
                        debug!(pid = self.handle.pid(), "process terminated");
                        self.state = WaiterState::Terminated;
                        return Ok(self.state);
                    }
                    Ok(false) => continue,
                    Err(err) => {
                        self.state = WaiterState::Errored;
                        return Err(err);
                    }
                }
            }

            if !cancel_ev.is_empty() {
                debug!(pid = self.handle.pid(), "wait cancelled by release");
                self.state = WaiterState::Cancelled;
                return Ok(self.state);
            }
        }
    }
}
