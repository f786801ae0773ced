/*!
 * Wait Module
 * Setup stage and race coordinator
 *
 * Strictly two phases: every pid is resolved to a handle before any wait
 * begins, so a not-found pid is never blended with a termination result.
 */

pub mod race;
pub mod setup;
pub mod types;

pub use race::race;
pub use setup::{open_all, parse_pids, Setup};
pub use types::{Budget, HandleSet, Outcome};
pub use types::{EXIT_INPUT, EXIT_NOT_FOUND, EXIT_TERMINATED, EXIT_TIMEOUT};

use crate::core::{Pid, WaitResult};

/// Wait for the first of the given processes to terminate, within budget.
pub fn wait_first(pids: &[Pid], budget: Budget) -> WaitResult<Outcome> {
    match setup::open_all(pids)? {
        Setup::NotFound(pid) => Ok(Outcome::NotFound(pid)),
        Setup::Ready(handles) => race::race(&handles, budget.deadline()),
    }
}
