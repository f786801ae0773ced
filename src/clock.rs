/*!
 * Boot Clock
 * One-shot readers for the kernel's monotonic clocks
 *
 * CLOCK_BOOTTIME is the clock the kernel uses for process start times, so
 * a reading taken after starting a batch of processes can order their
 * starts against later observations.
 */

use crate::core::{WaitError, WaitResult};
use nix::time::{clock_gettime, ClockId};

/// Read a clock and return the total nanoseconds since boot.
///
/// A signed 64-bit count of nanoseconds covers 292 years, so total
/// nanoseconds is returned rather than a (sec, nsec) pair.
pub fn clock_ns(clock: ClockId) -> WaitResult<u64> {
    let ts = clock_gettime(clock).map_err(|errno| WaitError::Syscall {
        op: "clock_gettime",
        errno,
    })?;
    Ok(ts.tv_sec() as u64 * 1_000_000_000 + ts.tv_nsec() as u64)
}

/// Look up a supported clock by its C name.
#[must_use]
pub fn clock_by_name(name: &str) -> Option<ClockId> {
    match name {
        "CLOCK_BOOTTIME" => Some(ClockId::CLOCK_BOOTTIME),
        "CLOCK_MONOTONIC" => Some(ClockId::CLOCK_MONOTONIC),
        "CLOCK_MONOTONIC_COARSE" => Some(ClockId::CLOCK_MONOTONIC_COARSE),
        "CLOCK_MONOTONIC_RAW" => Some(ClockId::CLOCK_MONOTONIC_RAW),
        _ => None,
    }
}
