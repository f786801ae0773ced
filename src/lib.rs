/*!
 * waitn Library
 * Wait for the first of several processes to terminate
 *
 * Like Bash's `wait -n`, but the watched processes do not have to be
 * children of the caller. Built on Linux pidfds: each pid is opened into a
 * watchable handle, then one waiter per handle races the others and an
 * optional deadline. Exactly one outcome is reported and every handle is
 * released on every exit path.
 *
 * This does not reap processes or read their exit status, and it does not
 * defend against pid reuse between open and termination.
 */

pub mod clock;
pub mod core;
pub mod pidfd;
pub mod tracer;
pub mod wait;

// Re-exports
pub use crate::core::{Pid, WaitError, WaitResult};
pub use pidfd::{PidFd, Waiter, WaiterState};
pub use tracer::init_tracing;
pub use wait::{open_all, parse_pids, race, wait_first, Budget, HandleSet, Outcome, Setup};
pub use wait::{EXIT_INPUT, EXIT_NOT_FOUND, EXIT_TERMINATED, EXIT_TIMEOUT};
