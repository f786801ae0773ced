/*!
 * Pidfd Module
 * Kernel-level process watching via Linux pidfds
 *
 * A `PidFd` is an exclusively-owned, watchable reference to a process.
 * A `Waiter` blocks one thread on a single `PidFd` until the process
 * terminates or the handle is released from another thread.
 */

pub mod handle;
pub mod waiter;

pub use handle::PidFd;
pub use waiter::{Waiter, WaiterState};
