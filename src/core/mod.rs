/*!
 * Core Module
 * Shared types and error handling
 */

pub mod errors;
pub mod types;

pub use errors::WaitError;
pub use types::{Pid, WaitResult};
