/*!
 * Core Types
 * Common types used across the crate
 */

/// Process ID type
///
/// Pids are positive; 0 is never a valid target and is rejected at parse
/// time.
pub type Pid = u32;

/// Common result type for wait operations
pub type WaitResult<T> = Result<T, super::errors::WaitError>;
