/*!
 * Wait Types
 * Outcomes, deadlines, and ordered handle sets
 */

use crate::core::Pid;
use crate::pidfd::PidFd;
use std::time::{Duration, Instant};

/// Exit status: a watched process terminated, or was treated as terminated.
pub const EXIT_TERMINATED: i32 = 0;
/// Exit status: a pid had no live process and `--error-on-unknown` was set.
pub const EXIT_NOT_FOUND: i32 = 1;
/// Exit status: the deadline elapsed before any termination.
pub const EXIT_TIMEOUT: i32 = 2;
/// Exit status: malformed input, nothing was opened.
pub const EXIT_INPUT: i32 = 127;

/// The single terminal result of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A watched process terminated.
    Terminated(Pid),
    /// A pid had no live process at open time. Reported like a completion:
    /// the process presumably exited before we could watch it.
    NotFound(Pid),
    /// The deadline elapsed first.
    TimedOut,
}

impl Outcome {
    /// The pid to print, if this outcome carries one.
    #[inline]
    #[must_use]
    pub const fn pid(&self) -> Option<Pid> {
        match self {
            Outcome::Terminated(pid) | Outcome::NotFound(pid) => Some(*pid),
            Outcome::TimedOut => None,
        }
    }

    /// Program exit status for this outcome.
    ///
    /// `error_on_unknown` only changes the status of `NotFound`; the
    /// printed pid is the same either way.
    #[inline]
    #[must_use]
    pub const fn exit_code(&self, error_on_unknown: bool) -> i32 {
        match self {
            Outcome::Terminated(_) => EXIT_TERMINATED,
            Outcome::NotFound(_) => {
                if error_on_unknown {
                    EXIT_NOT_FOUND
                } else {
                    EXIT_TERMINATED
                }
            }
            Outcome::TimedOut => EXIT_TIMEOUT,
        }
    }
}

/// Wall-clock budget for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Wait indefinitely.
    Unbounded,
    /// Only report a process that has already terminated.
    Immediate,
    /// Wait up to this long.
    Within(Duration),
}

impl Budget {
    /// Interpret a signed millisecond count: negative = no timeout, zero =
    /// return immediately, positive = wait that long.
    #[must_use]
    pub fn from_millis(ms: i64) -> Self {
        if ms < 0 {
            Budget::Unbounded
        } else if ms == 0 {
            Budget::Immediate
        } else {
            Budget::Within(Duration::from_millis(ms as u64))
        }
    }

    /// The deadline this budget imposes, measured from now.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self {
            Budget::Unbounded => None,
            Budget::Immediate => Some(Instant::now()),
            Budget::Within(d) => Some(Instant::now() + *d),
        }
    }
}

/// An ordered set of open handles, in caller order.
///
/// Order matters only for the sweep tie-break when the deadline has already
/// elapsed; during a live race the winner is whichever termination
/// notification arrives first.
#[derive(Debug)]
pub struct HandleSet {
    handles: Vec<PidFd>,
}

impl HandleSet {
    #[must_use]
    pub fn new(handles: Vec<PidFd>) -> Self {
        Self { handles }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PidFd> {
        self.handles.iter()
    }

    /// Release every handle. Idempotent per handle and order-independent.
    pub fn release_all(&self) {
        for handle in &self.handles {
            handle.release();
        }
    }

    /// RAII release: the returned guard releases every handle when dropped,
    /// covering the panic path as well as normal returns.
    #[must_use]
    pub fn release_on_drop(&self) -> ReleaseGuard<'_> {
        ReleaseGuard { set: self }
    }
}

/// Releases a whole handle set on drop.
pub struct ReleaseGuard<'a> {
    set: &'a HandleSet,
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        self.set.release_all();
    }
}
