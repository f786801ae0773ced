/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use crate::core::types::Pid;
use miette::Diagnostic;
use nix::errno::Errno;
use thiserror::Error;

/// Errors surfaced while resolving and watching processes.
///
/// Only `InvalidPid` and `NotFound` are ever shown to the user as a normal
/// result; `Syscall` and `Invariant` are defect signals and abort the
/// program rather than risk reporting a wrong pid as terminated.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum WaitError {
    #[error("pid is not a valid number: {0}")]
    #[diagnostic(
        code(waitn::invalid_pid),
        help("Pids must be positive integers, e.g. `waitn 1234 5678`.")
    )]
    InvalidPid(String),

    #[error("no such process: {0}")]
    #[diagnostic(
        code(waitn::process_not_found),
        help("The process may have terminated before it could be watched.")
    )]
    NotFound(Pid),

    #[error("{op} failed: {errno}")]
    #[diagnostic(
        code(waitn::syscall_failed),
        help("Unexpected OS-level failure. Check kernel support for pidfd_open (Linux 5.3+).")
    )]
    Syscall { op: &'static str, errno: Errno },

    #[error("invariant violated: {0}")]
    #[diagnostic(
        code(waitn::invariant),
        help("This is a bug in waitn, not a property of the watched processes.")
    )]
    Invariant(String),
}

impl WaitError {
    /// Classify a raw errno from a handle syscall.
    pub(crate) fn from_errno(op: &'static str, pid: Pid, errno: Errno) -> Self {
        match errno {
            Errno::ESRCH => WaitError::NotFound(pid),
            errno => WaitError::Syscall { op, errno },
        }
    }

    /// True for the defect-signal variants that must abort the program.
    #[inline]
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, WaitError::Syscall { .. } | WaitError::Invariant(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esrch_maps_to_not_found() {
        let err = WaitError::from_errno("pidfd_open", 42, Errno::ESRCH);
        assert_eq!(err, WaitError::NotFound(42));
        assert!(!err.is_fault());
    }

    #[test]
    fn test_other_errno_is_fault() {
        let err = WaitError::from_errno("pidfd_open", 42, Errno::EMFILE);
        assert!(err.is_fault());
        assert!(err.to_string().contains("pidfd_open"));
    }
}
