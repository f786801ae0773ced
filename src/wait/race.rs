/*!
 * Race Coordinator
 * Arbitrates N waiters and a deadline into one outcome
 */

use crate::core::{Pid, WaitError, WaitResult};
use crate::pidfd::{Waiter, WaiterState};
use crate::wait::types::{HandleSet, Outcome};
use flume::RecvTimeoutError;
use std::time::Instant;
use tracing::debug;

/// Race every handle in the set against the others and the deadline.
///
/// One thread per handle blocks in a [`Waiter`]; the first to observe a
/// termination posts its pid into a single-assignment slot and later posts
/// are dropped. Whichever of "slot filled" and "deadline elapsed" the
/// coordinator observes first decides the outcome. On every exit path,
/// including panic, all handles are released (unblocking parked waiters)
/// and every started waiter is joined before this returns.
///
/// A deadline that has already elapsed degrades to a non-blocking sweep in
/// input order, with no waiters started.
pub fn race(handles: &HandleSet, deadline: Option<Instant>) -> WaitResult<Outcome> {
    if handles.is_empty() {
        return Err(WaitError::Invariant(
            "race started with an empty handle set".to_string(),
        ));
    }

    if let Some(d) = deadline {
        if d <= Instant::now() {
            let _release = handles.release_on_drop();
            return sweep(handles);
        }
    }

    let (slot_tx, slot_rx) = flume::bounded::<WaitResult<Pid>>(1);

    std::thread::scope(|scope| {
        // Dropped when this closure ends, before the scope joins: releasing
        // every handle is what unblocks the waiters so the join can finish.
        let _release = handles.release_on_drop();

        for handle in handles.iter() {
            let slot = slot_tx.clone();
            scope.spawn(move || {
                match Waiter::new(handle).wait() {
                    // Best-effort post: a full slot means another waiter
                    // already won, and this result is silently dropped.
                    Ok(WaiterState::Terminated) => {
                        let _ = slot.try_send(Ok(handle.pid()));
                    }
                    // Cancelled by release: exit quietly.
                    Ok(_) => {}
                    Err(err) => {
                        let _ = slot.try_send(Err(err));
                    }
                }
            });
        }
        drop(slot_tx);

        let posted = match deadline {
            None => slot_rx.recv().map_err(|_| slot_disconnected())?,
            Some(d) => match slot_rx.recv_deadline(d) {
                Ok(posted) => posted,
                Err(RecvTimeoutError::Timeout) => {
                    debug!("deadline elapsed before any termination");
                    return Ok(Outcome::TimedOut);
                }
                Err(RecvTimeoutError::Disconnected) => return Err(slot_disconnected()),
            },
        };

        let pid = posted?;
        debug!(pid, "first termination observed");
        Ok(Outcome::Terminated(pid))
    })
}

/// Non-blocking pass over the set in input order: first ready pid wins.
fn sweep(handles: &HandleSet) -> WaitResult<Outcome> {
    for handle in handles.iter() {
        if handle.is_ready()? {
            debug!(pid = handle.pid(), "already terminated at entry");
            return Ok(Outcome::Terminated(handle.pid()));
        }
    }
    Ok(Outcome::TimedOut)
}

fn slot_disconnected() -> WaitError {
    WaitError::Invariant("all waiters finished without posting a result".to_string())
}
